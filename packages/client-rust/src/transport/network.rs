//! `reqwest`-backed transport: the innermost service of the pipeline.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use appcall_core::CallError;
use tower::Service;

use crate::request::{HttpRequest, Response};

/// Performs `HttpRequest`s over a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given connect timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidArgument` if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(connect_timeout: Duration, user_agent: &str) -> Result<Self, CallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CallError::invalid_argument(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Maps a `reqwest` failure onto the call error taxonomy.
fn classify_reqwest_error(err: &reqwest::Error, timeout: Duration) -> CallError {
    if err.is_timeout() {
        return CallError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };
    }
    let kind = if err.is_connect() {
        "connect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else {
        "network"
    };
    CallError::transport(format!("{kind} error: {err}"))
}

impl Service<HttpRequest> for ReqwestTransport {
    type Response = Response;
    type Error = CallError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, CallError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: HttpRequest) -> Self::Future {
        let client = self.client.clone();
        Box::pin(async move {
            // The deadline is enforced by `TimeoutLayer`; `timeout` here only
            // labels connect timeouts.
            let timeout = req.timeout;
            let mut builder = client.request(req.method, &req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = req.body {
                builder = builder.body(body);
            }

            let resp = builder
                .send()
                .await
                .map_err(|e| classify_reqwest_error(&e, timeout))?;

            let status = resp.status().as_u16();
            let headers: HashMap<String, String> = resp
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = resp
                .bytes()
                .await
                .map_err(|e| classify_reqwest_error(&e, timeout))?;

            Ok(Response {
                status,
                headers,
                body: if body.is_empty() { None } else { Some(body) },
            })
        })
    }
}
