//! `appcall` client: authenticated remote function calls, the HTTP transport
//! pipeline, and named service clients.

pub mod auth;
pub mod client;
pub mod config;
pub mod invoker;
pub mod request;
pub mod request_client;
pub mod services;
pub mod transport;

#[cfg(test)]
mod testing;

pub use appcall_core::{CallError, Codec, Document, ServerError, Value};
pub use auth::{AuthProvider, StaticTokenProvider};
pub use client::AppClient;
pub use config::ClientConfig;
pub use invoker::{CoreServiceInvoker, FunctionCall, DEFAULT_REQUEST_TIMEOUT};
pub use request::{RequestDescriptor, Response};
pub use request_client::{AuthenticatedClient, AuthenticatedRequestClient, RequestClientExt};
pub use services::{EmailServiceClient, MessagingServiceClient, NamedServiceClient};
