//! Database connection management and drink storage.

pub mod drinks;
pub mod health;
pub mod migration;
pub mod pool;

pub use drinks::DrinkRepository;
pub use health::{check_health, DbHealth};
pub use migration::{pending_migrations, run_migrations};
pub use pool::{create_pool, verify_connection};
