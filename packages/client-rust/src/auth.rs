//! Credentials for the authenticated request client.
//!
//! Acquiring tokens (login flows, refresh-token exchange) is outside this
//! crate; an `AuthProvider` only hands out the current access token and is
//! asked to renew it when the server rejects the session.

use async_trait::async_trait;
use appcall_core::CallError;
use parking_lot::RwLock;

/// Source of the access token attached to every request.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The current access token, if the client is logged in.
    fn access_token(&self) -> Option<String>;

    /// Renew credentials after the server answered 401.
    ///
    /// Returns `Ok(true)` if new credentials are available and the request is
    /// worth retrying, `Ok(false)` if nothing changed.
    async fn refresh(&self) -> Result<bool, CallError>;
}

/// A fixed access token that can be swapped at runtime.
///
/// `refresh` never produces new credentials, so a rejected token surfaces the
/// 401 to the caller without a retry.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: RwLock<Option<String>>,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    /// Replace (or clear) the token used for subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    async fn refresh(&self) -> Result<bool, CallError> {
        Ok(false)
    }
}
