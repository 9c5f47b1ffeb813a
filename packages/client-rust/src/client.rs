//! Top-level application client.
//!
//! Wires the configuration, the transport pipeline and the authenticated
//! request client together, and hands out invokers and named service clients
//! that share them.

use std::sync::Arc;

use appcall_core::{AppRoutes, CallError};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::AuthProvider;
use crate::config::ClientConfig;
use crate::invoker::{CoreServiceInvoker, FunctionCall};
use crate::request_client::{AuthenticatedClient, AuthenticatedRequestClient};
use crate::services::{MessagingServiceClient, NamedServiceClient};
use crate::transport::{build_transport_pipeline, ReqwestTransport};

/// Client for one application on the platform.
#[derive(Debug, Clone)]
pub struct AppClient {
    config: Arc<ClientConfig>,
    functions: Arc<CoreServiceInvoker>,
}

impl AppClient {
    /// Builds a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidArgument` if the configuration is invalid or
    /// the HTTP client cannot be created.
    pub fn new(config: ClientConfig, auth: Arc<dyn AuthProvider>) -> Result<Self, CallError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.connect_timeout, &config.user_agent)?;
        let request_client = AuthenticatedClient::new(
            &config.base_url,
            config.codec,
            build_transport_pipeline(transport),
            auth,
        );
        Ok(Self::with_request_client(config, Arc::new(request_client)))
    }

    /// Builds a client over any request client (custom transports, tests).
    pub fn with_request_client(
        config: ClientConfig,
        request_client: Arc<dyn AuthenticatedRequestClient>,
    ) -> Self {
        let routes = Arc::new(AppRoutes::new(config.app_id.clone()));
        let functions = Arc::new(CoreServiceInvoker::new(
            request_client,
            routes,
            config.default_request_timeout,
        ));
        info!(
            app_id = %config.app_id,
            base_url = %config.base_url,
            codec = %config.codec,
            "app client ready"
        );
        Self {
            config: Arc::new(config),
            functions,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The app-level invoker (calls carry no `service`).
    #[must_use]
    pub fn functions(&self) -> Arc<CoreServiceInvoker> {
        Arc::clone(&self.functions)
    }

    /// An invoker bound to the named service.
    #[must_use]
    pub fn service(&self, service_name: &str) -> Arc<CoreServiceInvoker> {
        Arc::new(self.functions.for_service(service_name))
    }

    /// Any named service client, bound to `service_name`.
    #[must_use]
    pub fn service_client<C: NamedServiceClient>(&self, service_name: &str) -> C {
        C::from_invoker(self.service(service_name))
    }

    #[must_use]
    pub fn messaging(&self, service_name: &str) -> MessagingServiceClient {
        self.service_client(service_name)
    }

    /// Call an app-level function and decode its result.
    ///
    /// # Errors
    ///
    /// See [`CoreServiceInvoker::call_function`].
    pub async fn call_function<T>(&self, call: FunctionCall) -> Result<T, CallError>
    where
        T: DeserializeOwned + Send,
    {
        self.functions.call_function(call).await
    }

    /// Call an app-level function, discarding its result.
    ///
    /// # Errors
    ///
    /// See [`CoreServiceInvoker::call_function_ignore_result`].
    pub async fn call_function_ignore_result(&self, call: FunctionCall) -> Result<(), CallError> {
        self.functions.call_function_ignore_result(call).await
    }
}
