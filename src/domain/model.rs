use serde::{Deserialize, Serialize};
use std::fmt;

/// GitHub access token. Blank values are treated as "no token".
#[derive(Clone, PartialEq, Eq)]
pub struct GithubToken(String);

impl GithubToken {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GithubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GithubToken(***)")
    }
}

/// A single outgoing GET, sent by an `HttpTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Header names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainLookup {
    pub domain: String,
    pub path: String,
    pub status: u16,
}

impl DomainLookup {
    pub fn is_verified(&self) -> bool {
        self.status == 200
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status, 403 | 429)
    }
}

/// Opaque session data handed back by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub client_id: String,
    pub session_ids: Vec<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StudentStatus {
    Unauthenticated,
    NotStudent {
        domain: String,
    },
    Verified {
        user_id: Option<String>,
        domain: String,
    },
}

impl StudentStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, StudentStatus::Verified { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_absent() {
        assert!(GithubToken::new("").is_none());
        assert!(GithubToken::new("  \n").is_none());
        assert_eq!(GithubToken::new(" ghp_abc ").unwrap().expose(), "ghp_abc");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = GithubToken::new("ghp_secret").unwrap();
        assert_eq!(format!("{:?}", token), "GithubToken(***)");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let request = OutboundRequest::new("https://example.com")
            .with_header("X-GitHub-Api-Version", "2022-11-28");
        assert_eq!(request.header("x-github-api-version"), Some("2022-11-28"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn test_student_status_serializes_with_tag() {
        let status = StudentStatus::NotStudent {
            domain: "example.com".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "not_student", "domain": "example.com"})
        );
    }
}
