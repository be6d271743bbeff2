use crate::adapters::http::ReqwestTransport;
use crate::core::{ConfigProvider, DomainLookup, GithubToken, HttpTransport, OutboundRequest};
use crate::utils::error::{Result, VerifyError};
use std::time::Duration;

/// Contents API root of the JetBrains swot dataset.
/// See <https://github.com/JetBrains/swot>.
pub const GITHUB_CONTENTS_URL: &str =
    "https://api.github.com/repos/JetBrains/swot/contents/lib/domains";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
pub const GITHUB_RAW_ACCEPT: &str = "application/vnd.github.raw+json";

/// Checks whether an email domain is school-issued by looking it up in the
/// swot dataset. One GET per check, nothing cached.
pub struct DomainVerifier<T: HttpTransport> {
    transport: T,
    token: Option<GithubToken>,
    base_url: String,
}

impl DomainVerifier<ReqwestTransport> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_seconds()))?;
        let token = config.github_token().and_then(GithubToken::new);
        Ok(Self::new(transport, token).with_base_url(config.base_url()))
    }
}

impl<T: HttpTransport> DomainVerifier<T> {
    pub fn new(transport: T, token: Option<GithubToken>) -> Self {
        Self {
            transport,
            token,
            base_url: GITHUB_CONTENTS_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    pub fn build_request(&self, domain: &str) -> OutboundRequest {
        let url = format!("{}/{}", self.base_url, lookup_path(&normalize_domain(domain)));
        let request = OutboundRequest::new(url)
            .with_header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .with_header("Accept", GITHUB_RAW_ACCEPT);

        match &self.token {
            Some(token) => {
                request.with_header("Authorization", format!("Bearer {}", token.expose()))
            }
            None => request,
        }
    }

    /// Looks the domain up and keeps the raw status. The domain is trimmed and
    /// lower-cased first, so `Gachon.AC.kr` and `gachon.ac.kr` hit the same file.
    pub async fn lookup(&self, domain: &str) -> Result<DomainLookup> {
        let domain = normalize_domain(domain);
        let domain = domain.as_str();
        let request = self.build_request(domain);
        tracing::debug!(
            "Looking up {} at {} (credential: {})",
            domain,
            request.url,
            self.has_credential()
        );

        let status = self.transport.get(&request).await?;
        let lookup = DomainLookup {
            domain: domain.to_string(),
            path: lookup_path(domain),
            status,
        };

        if lookup.is_rate_limited() {
            tracing::warn!(
                "GitHub answered {} for {}; likely rate limited, configure a token",
                status,
                domain
            );
        } else {
            tracing::debug!("Lookup for {} returned {}", domain, status);
        }

        Ok(lookup)
    }

    /// `true` only when the dataset answers exactly 200. Any other status is
    /// `false`; transport failures are returned as errors.
    pub async fn check(&self, domain: &str) -> Result<bool> {
        Ok(self.lookup(domain).await?.is_verified())
    }

    pub async fn check_email(&self, email: &str) -> Result<bool> {
        let domain = email_domain(email)?;
        self.check(&domain).await
    }
}

/// Dataset file names are lower-case.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_ascii_lowercase()
}

/// `student.gachon.ac.kr` -> `kr/ac/gachon/student`
pub fn domain_path(domain: &str) -> String {
    domain.split('.').rev().collect::<Vec<_>>().join("/")
}

pub fn lookup_path(domain: &str) -> String {
    format!("{}.txt", domain_path(domain))
}

/// Part after the last `@`, trimmed and lower-cased.
pub fn email_domain(email: &str) -> Result<String> {
    let invalid = || VerifyError::InvalidEmail {
        value: email.to_string(),
    };

    let (local, domain) = email.trim().rsplit_once('@').ok_or_else(invalid)?;
    let domain = normalize_domain(domain);
    if local.is_empty() || domain.is_empty() {
        return Err(invalid());
    }

    Ok(domain)
}
