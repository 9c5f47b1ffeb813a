use serde::{Deserialize, Serialize};

use crate::codec::CodecError;

/// Error payload returned by the platform alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code (e.g. `"FunctionNotFound"`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_code: Option<String>,
    /// Optional link to the platform's logs for this request.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link: Option<String>,
}

/// Every way a function call can fail.
///
/// A caller receives either a result or exactly one of these. Only
/// `InvalidArgument` is produced before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Malformed local input; the request never left the process.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    /// The server rejected the call, or the transport failed before a status
    /// arrived (`status: None`).
    #[error("request failed (status {status:?}): {message}")]
    RequestFailed {
        status: Option<u16>,
        error: Option<ServerError>,
        message: String,
    },
    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response: {source}")]
    DecodeFailed { source: CodecError },
    /// No response within the effective timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// The caller aborted the call before it completed.
    #[error("call cancelled")]
    Cancelled,
}

impl CallError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// A `RequestFailed` for a response that carried an HTTP status.
    ///
    /// The message is taken from the server payload when there is one.
    #[must_use]
    pub fn from_status(status: u16, error: Option<ServerError>) -> Self {
        let message = error
            .as_ref()
            .map_or_else(|| format!("server responded with status {status}"), |e| e.error.clone());
        Self::RequestFailed {
            status: Some(status),
            error,
            message,
        }
    }

    /// A `RequestFailed` for a transport failure with no HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: None,
            error: None,
            message: message.into(),
        }
    }

    /// The HTTP status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// The platform's machine-readable error code, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::RequestFailed {
                error: Some(ServerError {
                    error_code: Some(code),
                    ..
                }),
                ..
            } => Some(code),
            _ => None,
        }
    }
}

impl From<CodecError> for CallError {
    fn from(source: CodecError) -> Self {
        Self::DecodeFailed { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;

    #[test]
    fn server_error_parses_platform_payload() {
        let body = br#"{"error":"function not found: 'nope'","error_code":"FunctionNotFound","link":"http://logs"}"#;
        let parsed: ServerError = Codec::Json.decode(body).unwrap();
        assert_eq!(parsed.error_code.as_deref(), Some("FunctionNotFound"));
        assert_eq!(parsed.link.as_deref(), Some("http://logs"));
    }

    #[test]
    fn from_status_prefers_server_message() {
        let err = CallError::from_status(
            404,
            Some(ServerError {
                error: "function not found".to_string(),
                error_code: Some("FunctionNotFound".to_string()),
                link: None,
            }),
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.error_code(), Some("FunctionNotFound"));
        assert!(err.to_string().contains("function not found"));
    }

    #[test]
    fn from_status_without_payload() {
        let err = CallError::from_status(503, None);
        assert_eq!(err.status(), Some(503));
        assert!(err.error_code().is_none());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn transport_failure_has_no_status() {
        let err = CallError::transport("connection refused");
        assert!(err.status().is_none());
    }

    #[test]
    fn codec_errors_become_decode_failures() {
        let codec_err = Codec::Json.decode::<i64>(b"{}").unwrap_err();
        let err = CallError::from(codec_err);
        assert!(matches!(err, CallError::DecodeFailed { .. }));
    }
}
