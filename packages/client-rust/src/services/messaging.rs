//! Messaging (SMS/MMS) service client.

use std::sync::Arc;

use appcall_core::{CallError, Document, Value};

use super::NamedServiceClient;
use crate::invoker::{CoreServiceInvoker, FunctionCall};

/// Remote function that sends a message.
pub const SEND_FUNCTION: &str = "send";

/// Arguments of a send-message call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage {
    pub to: String,
    pub from: String,
    pub body: String,
    pub media_url: Option<String>,
}

impl SendMessage {
    pub fn new(to: impl Into<String>, from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            body: body.into(),
            media_url: None,
        }
    }

    #[must_use]
    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    /// `{ to, from, body, mediaUrl? }` -- `mediaUrl` is absent, not null,
    /// when no media was given.
    #[must_use]
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert("to".to_string(), Value::String(self.to));
        doc.insert("from".to_string(), Value::String(self.from));
        doc.insert("body".to_string(), Value::String(self.body));
        if let Some(url) = self.media_url {
            doc.insert("mediaUrl".to_string(), Value::String(url));
        }
        doc
    }
}

/// Client for a messaging service configured on the application.
#[derive(Debug, Clone)]
pub struct MessagingServiceClient {
    invoker: Arc<CoreServiceInvoker>,
}

impl MessagingServiceClient {
    /// `invoker` should be bound to the messaging service's name.
    #[must_use]
    pub fn new(invoker: Arc<CoreServiceInvoker>) -> Self {
        Self { invoker }
    }

    /// Send a text message, optionally with an attached media URL.
    ///
    /// # Errors
    ///
    /// Propagates any error from the invoker unchanged.
    pub async fn send_message(
        &self,
        to: &str,
        from: &str,
        body: &str,
        media_url: Option<&str>,
    ) -> Result<(), CallError> {
        let mut message = SendMessage::new(to, from, body);
        message.media_url = media_url.map(str::to_string);
        self.send(message).await
    }

    /// Send a prepared message.
    ///
    /// # Errors
    ///
    /// Propagates any error from the invoker unchanged.
    pub async fn send(&self, message: SendMessage) -> Result<(), CallError> {
        let call = FunctionCall::new(SEND_FUNCTION).arg(message.into_document());
        self.invoker.call_function_ignore_result(call).await
    }
}

impl NamedServiceClient for MessagingServiceClient {
    fn from_invoker(invoker: Arc<CoreServiceInvoker>) -> Self {
        Self::new(invoker)
    }
}

#[cfg(test)]
mod tests {
    use appcall_core::AppRoutes;

    use super::*;
    use crate::invoker::DEFAULT_REQUEST_TIMEOUT;
    use crate::testing::MockRequestClient;

    fn client(mock: Arc<MockRequestClient>) -> MessagingServiceClient {
        let invoker = CoreServiceInvoker::new(
            mock,
            Arc::new(AppRoutes::new("app")),
            DEFAULT_REQUEST_TIMEOUT,
        )
        .for_service("twilio1");
        MessagingServiceClient::new(Arc::new(invoker))
    }

    fn sent_message(mock: &MockRequestClient) -> Document {
        let body = mock.last_body().unwrap();
        let args = body.get("args").and_then(Value::as_array).unwrap();
        assert_eq!(args.len(), 1);
        args[0].as_document().unwrap().clone()
    }

    #[tokio::test]
    async fn send_without_media_has_exactly_three_keys() {
        let mock = MockRequestClient::replying("null");
        client(mock.clone())
            .send_message("+15551230000", "+15559870000", "hello", None)
            .await
            .unwrap();

        let msg = sent_message(&mock);
        let keys: Vec<&str> = msg.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["body", "from", "to"]);
        assert_eq!(msg.get("to"), Some(&Value::from("+15551230000")));
        assert!(!msg.contains_key("mediaUrl"));
    }

    #[tokio::test]
    async fn send_with_media_includes_media_url() {
        let mock = MockRequestClient::replying("null");
        client(mock.clone())
            .send_message("a", "b", "look", Some("https://img.example/cat.png"))
            .await
            .unwrap();

        let msg = sent_message(&mock);
        assert_eq!(msg.len(), 4);
        assert_eq!(
            msg.get("mediaUrl"),
            Some(&Value::from("https://img.example/cat.png"))
        );
    }

    #[tokio::test]
    async fn uses_fixed_function_name_service_and_default_timeout() {
        let mock = MockRequestClient::replying("null");
        client(mock.clone())
            .send(SendMessage::new("a", "b", "c"))
            .await
            .unwrap();

        let seen = mock.seen.lock();
        let desc = &seen[0];
        let body = desc.body.as_ref().unwrap();
        assert_eq!(body.get("name"), Some(&Value::from(SEND_FUNCTION)));
        assert_eq!(body.get("service"), Some(&Value::from("twilio1")));
        assert_eq!(desc.timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn errors_propagate_unchanged() {
        let mock = MockRequestClient::failing(400);
        let err = client(mock)
            .send_message("a", "b", "c", None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
}
