//! Test doubles shared by the unit tests in this crate.

use std::sync::Arc;
use std::time::Duration;

use appcall_core::{CallError, Codec};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::request::{RequestDescriptor, Response};
use crate::request_client::AuthenticatedRequestClient;

type Reply = Box<dyn Fn() -> Result<Response, CallError> + Send + Sync>;

/// Request client that records descriptors and answers with a fixed result.
pub(crate) struct MockRequestClient {
    reply: Reply,
    delay: Option<Duration>,
    pub(crate) seen: Mutex<Vec<RequestDescriptor>>,
}

impl MockRequestClient {
    fn build(reply: Reply, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            delay,
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Answers every request with 200 and `body`.
    pub(crate) fn replying(body: &'static str) -> Arc<Self> {
        Self::build(Box::new(move || Ok(Response::new(200).with_body(body))), None)
    }

    /// Fails every request with `RequestFailed { status }`.
    pub(crate) fn failing(status: u16) -> Arc<Self> {
        Self::build(Box::new(move || Err(CallError::from_status(status, None))), None)
    }

    /// Answers with 200 and `1` after sleeping for `delay`.
    pub(crate) fn slow(delay: Duration) -> Arc<Self> {
        Self::build(Box::new(|| Ok(Response::new(200).with_body("1"))), Some(delay))
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    /// The body of the most recent request.
    pub(crate) fn last_body(&self) -> Option<appcall_core::Document> {
        self.seen.lock().last().and_then(|d| d.body.clone())
    }
}

#[async_trait]
impl AuthenticatedRequestClient for MockRequestClient {
    fn codec(&self) -> Codec {
        Codec::Json
    }

    async fn perform_request(&self, descriptor: RequestDescriptor) -> Result<Response, CallError> {
        self.seen.lock().push(descriptor);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.reply)()
    }
}
