//! Middleware for the coffee shop API server.

pub mod auth;
pub mod cors;

pub use auth::{Auth, AuthError, Authorizer, Claims, RequirePermissionLayer};
pub use cors::cors_layer;
