//! Permission-guard middleware layer.

use super::authorizer::Authorizer;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer that runs the authorization pipeline before the wrapped handler.
///
/// On success the verified [`Claims`](super::types::Claims) are inserted into
/// the request extensions, where the [`Auth`](super::extractor::Auth)
/// extractor picks them up. On failure the handler is never called and the
/// [`AuthError`](super::error::AuthError) becomes the response.
///
/// ```ignore
/// Router::new().route(
///     "/drinks",
///     get(list_drinks).post(create_drink.layer(authorizer.require("post:drinks"))),
/// );
/// ```
#[derive(Clone)]
pub struct RequirePermissionLayer {
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl RequirePermissionLayer {
    pub fn new(authorizer: Arc<Authorizer>, permission: impl Into<Arc<str>>) -> Self {
        Self {
            authorizer,
            permission: permission.into(),
        }
    }

    /// Permission this layer requires.
    pub fn permission(&self) -> &str {
        &self.permission
    }
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermission<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermission {
            inner,
            authorizer: self.authorizer.clone(),
            permission: self.permission.clone(),
        }
    }
}

/// Middleware service produced by [`RequirePermissionLayer`].
#[derive(Clone)]
pub struct RequirePermission<S> {
    inner: S,
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl<S> Service<Request<Body>> for RequirePermission<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let authorizer = self.authorizer.clone();
        let permission = self.permission.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            match authorizer.authorize(&parts.headers, &permission).await {
                Ok(claims) => {
                    parts.extensions.insert(claims);
                }
                Err(err) => return Ok(err.into_response()),
            }

            inner.call(Request::from_parts(parts, body)).await
        })
    }
}
