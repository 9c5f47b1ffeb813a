//! Deadline enforcement for outbound requests.
//!
//! This layer is the only place a request's `timeout` is enforced: the
//! `reqwest` transport sets no per-request timeout of its own, so custom
//! transports plugged into the pipeline get the same deadline semantics.
//! The deadline covers the metrics layer and the transport, including
//! reading the response body. Each attempt gets the full timeout, so the
//! auth retry after a 401 starts a fresh deadline.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use appcall_core::CallError;
use tower::{Layer, Service};

use crate::request::{HttpRequest, Response};

/// Wraps a transport so every request is bounded by its own `timeout`.
#[derive(Debug, Clone)]
pub struct TimeoutLayer;

impl<S> Layer<S> for TimeoutLayer {
    type Service = TimeoutService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimeoutService { inner }
    }
}

/// See [`TimeoutLayer`].
#[derive(Debug, Clone)]
pub struct TimeoutService<S> {
    inner: S,
}

fn timeout_error(deadline: Duration) -> CallError {
    CallError::Timeout {
        timeout_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
    }
}

impl<S> Service<HttpRequest> for TimeoutService<S>
where
    S: Service<HttpRequest, Response = Response, Error = CallError> + Send,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = CallError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, CallError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: HttpRequest) -> Self::Future {
        let deadline = req.timeout;
        let attempt = self.inner.call(req);
        Box::pin(async move {
            tokio::time::timeout(deadline, attempt)
                .await
                .unwrap_or_else(|_| Err(timeout_error(deadline)))
        })
    }
}
