//! Function call documents.
//!
//! A function call is sent as `{ "name", "args", "service"? }`. The `service`
//! key is present only for service-scoped calls; an unscoped call omits it
//! entirely rather than sending `null`, since the server decides scope by key
//! presence.

use crate::error::CallError;
use crate::value::{Document, Value};

pub const NAME_KEY: &str = "name";
pub const ARGS_KEY: &str = "args";
pub const SERVICE_KEY: &str = "service";

/// One function invocation, validated at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallRequest {
    name: String,
    service_name: Option<String>,
    arguments: Vec<Value>,
}

impl FunctionCallRequest {
    /// Creates an unscoped call.
    ///
    /// # Errors
    ///
    /// Returns `CallError::InvalidArgument` if `name` is empty.
    pub fn new(name: impl Into<String>, arguments: Vec<Value>) -> Result<Self, CallError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CallError::invalid_argument("function name must not be empty"));
        }
        Ok(Self {
            name,
            service_name: None,
            arguments,
        })
    }

    /// Scopes the call to a named service (or clears the scope with `None`).
    #[must_use]
    pub fn with_service(mut self, service_name: Option<String>) -> Self {
        self.service_name = service_name;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// The canonical wire document for this call.
    #[must_use]
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert(NAME_KEY.to_string(), Value::String(self.name));
        doc.insert(ARGS_KEY.to_string(), Value::Array(self.arguments));
        if let Some(service) = self.service_name {
            doc.insert(SERVICE_KEY.to_string(), Value::String(service));
        }
        doc
    }
}

/// Builds the call document for `name(args)`, optionally scoped to `service_name`.
///
/// # Errors
///
/// Returns `CallError::InvalidArgument` if `name` is empty.
pub fn build(
    name: &str,
    args: Vec<Value>,
    service_name: Option<&str>,
) -> Result<Document, CallError> {
    let request =
        FunctionCallRequest::new(name, args)?.with_service(service_name.map(str::to_string));
    tracing::trace!(
        function = request.name(),
        service = request.service_name(),
        argc = request.arguments().len(),
        "built function call document"
    );
    Ok(request.into_document())
}
