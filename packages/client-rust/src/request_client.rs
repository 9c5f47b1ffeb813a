//! The authenticated request client: the only component that touches the
//! network on behalf of the invoker.
//!
//! [`AuthenticatedRequestClient`] is the object-safe seam the invoker depends
//! on; [`RequestClientExt`] layers the "discard result" and "decode to `T`"
//! forms on top of the raw perform for every implementation, including
//! `dyn AuthenticatedRequestClient`.

use std::collections::HashMap;
use std::sync::Arc;

use appcall_core::{CallError, Codec, ServerError};
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tower::{Service, ServiceExt};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::AuthProvider;
use crate::request::{HttpRequest, RequestDescriptor, Response};

pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_REQUEST_ID: &str = "x-request-id";

const STATUS_UNAUTHORIZED: u16 = 401;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Performs request descriptors under the current auth context.
///
/// Implementations must honor `descriptor.timeout`, attach credentials, and
/// retry exactly once after re-authentication when the server rejects the
/// session. A non-2xx final response is an error, never an `Ok`.
#[async_trait]
pub trait AuthenticatedRequestClient: Send + Sync {
    /// The codec used for request and response bodies.
    fn codec(&self) -> Codec;

    /// Raw perform: no decode of the response body.
    async fn perform_request(&self, descriptor: RequestDescriptor) -> Result<Response, CallError>;
}

/// Result-shaping forms of [`AuthenticatedRequestClient::perform_request`].
#[async_trait]
pub trait RequestClientExt: AuthenticatedRequestClient {
    /// Perform and report only success or failure.
    async fn perform_request_discarding_result(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<(), CallError> {
        self.perform_request(descriptor).await.map(|_| ())
    }

    /// Perform and decode the response body into `T`.
    async fn perform_request_decoded<T>(&self, descriptor: RequestDescriptor) -> Result<T, CallError>
    where
        T: DeserializeOwned + Send,
    {
        let response = self.perform_request(descriptor).await?;
        Ok(self.codec().decode(response.body_bytes())?)
    }
}

impl<C: AuthenticatedRequestClient + ?Sized> RequestClientExt for C {}

// ---------------------------------------------------------------------------
// AuthenticatedClient
// ---------------------------------------------------------------------------

/// `AuthenticatedRequestClient` over a tower transport pipeline.
///
/// The pipeline is cloned per request, so `S` should be cheap to clone (the
/// `reqwest` transport and the middleware wrappers are).
pub struct AuthenticatedClient<S> {
    base_url: String,
    codec: Codec,
    service: S,
    auth: Arc<dyn AuthProvider>,
}

impl<S> AuthenticatedClient<S> {
    pub fn new(
        base_url: impl Into<String>,
        codec: Codec,
        service: S,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            codec,
            service,
            auth,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a descriptor into a concrete request with a fresh request id.
    fn build_http_request(&self, descriptor: &RequestDescriptor, body: Option<Bytes>) -> HttpRequest {
        let mut headers: HashMap<String, String> = descriptor
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        let content_type = self.codec.content_type().to_string();
        if body.is_some() {
            headers.insert(HEADER_CONTENT_TYPE.to_string(), content_type.clone());
        }
        headers.insert(HEADER_ACCEPT.to_string(), content_type);
        if let Some(token) = self.auth.access_token() {
            headers.insert(HEADER_AUTHORIZATION.to_string(), format!("Bearer {token}"));
        }
        let request_id = Uuid::new_v4();
        headers.insert(HEADER_REQUEST_ID.to_string(), request_id.to_string());

        HttpRequest {
            request_id,
            method: descriptor.method.clone(),
            url: format!("{}{}", self.base_url, descriptor.path),
            path: descriptor.path.clone(),
            headers,
            body,
            timeout: descriptor.timeout,
        }
    }

    /// Turn a final response into `Ok` (2xx) or `RequestFailed`.
    fn check_status(&self, response: Response) -> Result<Response, CallError> {
        if response.is_success() {
            return Ok(response);
        }
        let payload = self.codec.decode::<ServerError>(response.body_bytes()).ok();
        Err(CallError::from_status(response.status, payload))
    }
}

impl<S> AuthenticatedClient<S>
where
    S: Service<HttpRequest, Response = Response, Error = CallError> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    async fn send(&self, request: HttpRequest) -> Result<Response, CallError> {
        self.service.clone().oneshot(request).await
    }
}

#[async_trait]
impl<S> AuthenticatedRequestClient for AuthenticatedClient<S>
where
    S: Service<HttpRequest, Response = Response, Error = CallError> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    fn codec(&self) -> Codec {
        self.codec
    }

    async fn perform_request(&self, descriptor: RequestDescriptor) -> Result<Response, CallError> {
        let body = match &descriptor.body {
            Some(doc) => Some(Bytes::from(self.codec.encode(doc).map_err(|e| {
                CallError::invalid_argument(format!("cannot encode request body: {e}"))
            })?)),
            None => None,
        };

        let response = self
            .send(self.build_http_request(&descriptor, body.clone()))
            .await?;
        if response.status != STATUS_UNAUTHORIZED {
            return self.check_status(response);
        }

        if !self.auth.refresh().await? {
            debug!(path = %descriptor.path, "session rejected and no new credentials available");
            return self.check_status(response);
        }

        warn!(path = %descriptor.path, "session rejected, retrying once with refreshed credentials");
        let retried = self.send(self.build_http_request(&descriptor, body)).await?;
        self.check_status(retried)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
