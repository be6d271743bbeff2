use crate::domain::model::SessionState;
use crate::domain::ports::SessionAuthenticator;
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::validate_non_empty_string;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const CLERK_API_URL: &str = "https://api.clerk.com";
pub const SESSION_COOKIE: &str = "__session";

/// Thin pass-through to the Clerk Backend API. Token validation itself is
/// done by Clerk.
#[derive(Clone)]
pub struct ClerkClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ClientObject {
    id: String,
    #[serde(default)]
    sessions: Vec<SessionObject>,
    #[serde(default)]
    last_active_session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl SessionObject {
    fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "active")
    }
}

impl ClerkClient {
    /// The timeout bounds every call to the identity provider.
    pub fn new(secret_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, secret_key)
    }

    fn with_client(client: Client, secret_key: impl Into<String>) -> Result<Self> {
        let secret_key = secret_key.into();
        validate_non_empty_string("clerk.secret_key", &secret_key)?;
        Ok(Self {
            client,
            secret_key,
            base_url: CLERK_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn session_state(client: ClientObject) -> SessionState {
        let active: Vec<&SessionObject> = client.sessions.iter().filter(|s| s.is_active()).collect();

        let user_id = client
            .last_active_session_id
            .as_deref()
            .and_then(|id| active.iter().find(|s| s.id == id))
            .or_else(|| active.first())
            .and_then(|s| s.user_id.clone());

        SessionState {
            session_ids: active.iter().map(|s| s.id.clone()).collect(),
            client_id: client.id,
            user_id,
        }
    }
}

impl fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClerkClient")
            .field("base_url", &self.base_url)
            .field("secret_key", &"***")
            .finish()
    }
}

#[async_trait]
impl SessionAuthenticator for ClerkClient {
    async fn authenticate_cookie(&self, session: &str) -> Result<Option<SessionState>> {
        if session.trim().is_empty() {
            return Err(VerifyError::InvalidInput {
                field: SESSION_COOKIE.to_string(),
                reason: "Cookie session cannot be empty".to_string(),
            });
        }

        let url = format!("{}/v1/clients/verify", self.base_url);
        tracing::debug!("Verifying {} cookie via {}", SESSION_COOKIE, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&serde_json::json!({ "token": session }))
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body = response.text().await?;
                let client: ClientObject = serde_json::from_str(&body)?;
                let state = Self::session_state(client);
                tracing::debug!(
                    "Session cookie accepted (client {}, {} active sessions)",
                    state.client_id,
                    state.session_ids.len()
                );
                Ok(Some(state))
            }
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
            | StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::debug!("Session cookie rejected with {}", status);
                Ok(None)
            }
            _ => {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!("Unexpected identity provider response {}", status);
                Err(VerifyError::Identity {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
