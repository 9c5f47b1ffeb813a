//! Metrics middleware for outbound requests.
//!
//! Wraps each request in a `tracing` span and records a request counter and a
//! latency histogram through the `metrics` facade. No exporter is installed
//! here; without a recorder the `metrics` calls are no-ops.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use appcall_core::CallError;
use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::request::{HttpRequest, Response};

pub const REQUESTS_TOTAL: &str = "appcall_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "appcall_request_duration_seconds";

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments requests with timing and outcome.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

// ---------------------------------------------------------------------------
// MetricsService
// ---------------------------------------------------------------------------

/// Service wrapper that records request duration and outcome.
#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

/// Short label for a request result, used as the `outcome` metric label.
fn outcome_label(result: &Result<Response, CallError>) -> &'static str {
    match result {
        Ok(resp) if resp.is_success() => "ok",
        Ok(resp) if resp.status == 401 => "unauthorized",
        Ok(_) => "http_error",
        Err(CallError::Timeout { .. }) => "timeout",
        Err(_) => "error",
    }
}

impl<S> Service<HttpRequest> for MetricsService<S>
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
        let span = info_span!(
            "http_request",
            method = %req.method,
            path = %req.path,
            request_id = %req.request_id,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let elapsed = start.elapsed();
                let outcome = outcome_label(&result);

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = elapsed.as_millis() as u64;
                let span = tracing::Span::current();
                span.record("duration_ms", duration_ms);
                span.record("outcome", outcome);
                if let Ok(resp) = &result {
                    span.record("status", resp.status);
                }

                ::metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
                ::metrics::histogram!(REQUEST_DURATION_SECONDS).record(elapsed.as_secs_f64());

                tracing::debug!(duration_ms, outcome, "request complete");

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
