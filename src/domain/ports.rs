use crate::domain::model::{OutboundRequest, SessionState};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Sends a GET and reports the HTTP status code. The body is never needed.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: &OutboundRequest) -> Result<u16>;
}

/// Resolves the `__session` cookie value into session data, or `None` when
/// the identity provider does not recognise it.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn authenticate_cookie(&self, session: &str) -> Result<Option<SessionState>>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn github_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}
