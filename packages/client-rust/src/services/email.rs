//! Email service client.

use std::sync::Arc;

use appcall_core::{CallError, Document, Value};

use super::NamedServiceClient;
use crate::invoker::{CoreServiceInvoker, FunctionCall};

/// Remote function that sends an email.
pub const SEND_FUNCTION: &str = "send";

/// Client for an email service configured on the application.
#[derive(Debug, Clone)]
pub struct EmailServiceClient {
    invoker: Arc<CoreServiceInvoker>,
}

impl EmailServiceClient {
    #[must_use]
    pub fn new(invoker: Arc<CoreServiceInvoker>) -> Self {
        Self { invoker }
    }

    /// Send a plain email.
    ///
    /// # Errors
    ///
    /// Propagates any error from the invoker unchanged.
    pub async fn send_email(
        &self,
        to: &str,
        from: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), CallError> {
        let mut doc = Document::new();
        doc.insert("toAddress".to_string(), Value::from(to));
        doc.insert("fromAddress".to_string(), Value::from(from));
        doc.insert("subject".to_string(), Value::from(subject));
        doc.insert("body".to_string(), Value::from(body));

        let call = FunctionCall::new(SEND_FUNCTION).arg(doc);
        self.invoker.call_function_ignore_result(call).await
    }
}

impl NamedServiceClient for EmailServiceClient {
    fn from_invoker(invoker: Arc<CoreServiceInvoker>) -> Self {
        Self::new(invoker)
    }
}
