//! Named service clients.
//!
//! Each client is a thin wrapper over a service-bound [`CoreServiceInvoker`]:
//! it shapes one argument document per operation and calls a fixed remote
//! function name. Add a new wrapper by implementing [`NamedServiceClient`]
//! and obtaining it through `AppClient::service_client`.

pub mod email;
pub mod messaging;

use std::sync::Arc;

use crate::invoker::CoreServiceInvoker;

pub use email::EmailServiceClient;
pub use messaging::MessagingServiceClient;

/// A convenience client constructed from a service-bound invoker.
pub trait NamedServiceClient: Sized {
    fn from_invoker(invoker: Arc<CoreServiceInvoker>) -> Self;
}
