use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, header};
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use tracing::warn;

use super::{BasicAuthProvider, Caller};
use crate::error::ServerError;

/// Tower layer that adds authentication middleware.
#[derive(Clone)]
pub struct AuthLayer {
    provider: Option<Arc<BasicAuthProvider>>,
}

impl AuthLayer {
    pub fn new(provider: Option<Arc<BasicAuthProvider>>) -> Self {
        Self { provider }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            provider: self.provider.clone(),
        }
    }
}

/// Tower service that authenticates requests and injects a [`Caller`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    provider: Option<Arc<BasicAuthProvider>>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let provider = self.provider.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(provider) = provider else {
                req.extensions_mut().insert(Caller::anonymous());
                return inner.call(req).await;
            };

            let Some(value) = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
            else {
                return Ok(unauthorized("missing authentication credentials"));
            };

            let outcome =
                tokio::task::spawn_blocking(move || provider.authenticate(&value)).await;
            match outcome {
                Ok(Ok(caller)) => {
                    req.extensions_mut().insert(caller);
                    inner.call(req).await
                }
                Ok(Err(reason)) => {
                    warn!(reason = %reason, "rejected credentials");
                    Ok(unauthorized(&reason))
                }
                Err(e) => {
                    Ok(ServerError::Internal(format!("auth task failed: {e}")).into_response())
                }
            }
        })
    }
}

fn unauthorized(message: &str) -> Response {
    ServerError::Unauthorized(message.to_owned()).into_response()
}
