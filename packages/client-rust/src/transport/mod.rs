//! Tower transport pipeline for outbound requests.
//!
//! - [`timeout`]: Per-request timeout enforcement
//! - [`metrics`]: Request timing, outcome spans and counters
//! - [`network`]: The `reqwest` transport at the bottom of the stack

pub mod metrics;
pub mod network;
pub mod timeout;

use tower::ServiceBuilder;

pub use self::metrics::{MetricsLayer, MetricsService};
pub use network::ReqwestTransport;
pub use timeout::{TimeoutLayer, TimeoutService};

/// The composed pipeline type returned by [`build_transport_pipeline`].
pub type TransportPipeline<S> = TimeoutService<MetricsService<S>>;

/// Wrap a transport with the request middleware.
///
/// Layer order (outermost to innermost):
/// 1. `TimeoutLayer` -- enforce the request's own timeout
/// 2. `MetricsLayer` -- record timing and outcome (closest to the network)
#[must_use]
pub fn build_transport_pipeline<S>(transport: S) -> TransportPipeline<S> {
    ServiceBuilder::new()
        .layer(TimeoutLayer)
        .layer(MetricsLayer)
        .service(transport)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
