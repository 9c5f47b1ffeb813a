//! Core service invoker: turns a function call into a request descriptor and
//! hands it to the authenticated request client.
//!
//! Every function call, whether made directly or through a named service
//! client, passes through [`CoreServiceInvoker::prepare`]. The invoker holds
//! no mutable state and performs no retries of its own.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use appcall_core::{function_call, AppRoutes, CallError, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::request::RequestDescriptor;
use crate::request_client::{AuthenticatedRequestClient, RequestClientExt};

/// Timeout applied when neither the call nor the client configuration sets one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// FunctionCall
// ---------------------------------------------------------------------------

/// A named function invocation: name, ordered arguments, optional timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    name: String,
    args: Vec<Value>,
    timeout: Option<Duration>,
}

impl FunctionCall {
    /// A call with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_args(name, Vec::new())
    }

    pub fn with_args(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
            timeout: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append one argument converted from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidArgument` if `value` cannot be serialized.
    pub fn serialized_arg<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, CallError> {
        let value = Value::from_serialize(value)
            .map_err(|e| CallError::invalid_argument(format!("unencodable argument: {e}")))?;
        self.args.push(value);
        Ok(self)
    }

    /// Override the client's default timeout for this call only.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// ---------------------------------------------------------------------------
// CoreServiceInvoker
// ---------------------------------------------------------------------------

/// Invokes remote functions for one application, optionally on behalf of a
/// named service.
///
/// Cloning is cheap: the request client and routes are shared.
#[derive(Clone)]
pub struct CoreServiceInvoker {
    client: Arc<dyn AuthenticatedRequestClient>,
    routes: Arc<AppRoutes>,
    service_name: Option<String>,
    default_timeout: Duration,
}

impl fmt::Debug for CoreServiceInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreServiceInvoker")
            .field("app_id", &self.routes.app_id())
            .field("service_name", &self.service_name)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl CoreServiceInvoker {
    /// An app-level invoker (calls are not scoped to any service).
    pub fn new(
        client: Arc<dyn AuthenticatedRequestClient>,
        routes: Arc<AppRoutes>,
        default_timeout: Duration,
    ) -> Self {
        Self {
            client,
            routes,
            service_name: None,
            default_timeout,
        }
    }

    /// An invoker sharing this one's client and routes, bound to `service_name`.
    #[must_use]
    pub fn for_service(&self, service_name: impl Into<String>) -> Self {
        Self {
            service_name: Some(service_name.into()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    #[must_use]
    pub fn routes(&self) -> &AppRoutes {
        &self.routes
    }

    /// Validate `call` and build the descriptor that will be sent.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidArgument` if the function name is empty or
    /// the timeout override is zero.
    pub fn prepare(&self, call: FunctionCall) -> Result<RequestDescriptor, CallError> {
        let body = function_call::build(&call.name, call.args, self.service_name.as_deref())?;
        let timeout = match call.timeout {
            Some(t) if t.is_zero() => {
                return Err(CallError::invalid_argument("request timeout must be positive"));
            }
            Some(t) => t,
            None => self.default_timeout,
        };
        Ok(RequestDescriptor::post(
            self.routes.function_call_path(),
            body,
            timeout,
        ))
    }

    /// Call a function and decode its result into `T`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for bad local input, otherwise whatever the request
    /// client reports (`RequestFailed`, `DecodeFailed`, `Timeout`).
    pub async fn call_function<T>(&self, call: FunctionCall) -> Result<T, CallError>
    where
        T: DeserializeOwned + Send,
    {
        let descriptor = self.prepare(call)?;
        debug!(
            path = %descriptor.path,
            service = self.service_name.as_deref(),
            timeout_ms = u64::try_from(descriptor.timeout.as_millis()).unwrap_or(u64::MAX),
            "calling function"
        );
        self.client.perform_request_decoded(descriptor).await
    }

    /// Call a function, reporting only success or failure.
    ///
    /// # Errors
    ///
    /// Same as [`call_function`](Self::call_function), minus `DecodeFailed`.
    pub async fn call_function_ignore_result(&self, call: FunctionCall) -> Result<(), CallError> {
        let descriptor = self.prepare(call)?;
        debug!(
            path = %descriptor.path,
            service = self.service_name.as_deref(),
            "calling function, result discarded"
        );
        self.client.perform_request_discarding_result(descriptor).await
    }

    /// [`call_function`](Self::call_function) that gives up with
    /// `CallError::Cancelled` as soon as `cancel` fires.
    ///
    /// The in-flight request is dropped; no decode is attempted.
    ///
    /// # Errors
    ///
    /// `Cancelled`, or any error of [`call_function`](Self::call_function).
    pub async fn call_function_cancellable<T>(
        &self,
        call: FunctionCall,
        cancel: &CancellationToken,
    ) -> Result<T, CallError>
    where
        T: DeserializeOwned + Send,
    {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("function call cancelled");
                Err(CallError::Cancelled)
            }
            result = self.call_function(call) => result,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
