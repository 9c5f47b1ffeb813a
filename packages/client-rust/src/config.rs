use std::time::Duration;

use appcall_core::{CallError, Codec};

use crate::invoker::DEFAULT_REQUEST_TIMEOUT;

/// Client-level configuration.
///
/// Controls where requests go, how bodies are encoded, and the timeouts
/// applied when a call does not override them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port of the platform, without a trailing path.
    pub base_url: String,
    /// Identifier of the application whose functions are called.
    pub app_id: String,
    /// Timeout for calls that do not set their own.
    pub default_request_timeout: Duration,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Wire format for request and response bodies.
    pub codec: Codec,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            app_id: String::new(),
            default_request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
            codec: Codec::Json,
            user_agent: concat!("appcall/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Default configuration for `app_id`.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_default_request_timeout(mut self, timeout: Duration) -> Self {
        self.default_request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Checks the configuration before any client is built.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidArgument` for an empty app id, a base URL
    /// that is not http(s), or a zero timeout.
    pub fn validate(&self) -> Result<(), CallError> {
        if self.app_id.is_empty() {
            return Err(CallError::invalid_argument("app_id must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CallError::invalid_argument(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.default_request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(CallError::invalid_argument("timeouts must be positive"));
        }
        Ok(())
    }
}
