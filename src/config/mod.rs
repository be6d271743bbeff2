#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::clerk::CLERK_API_URL;
use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::core::verifier::GITHUB_CONTENTS_URL;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use std::fmt;

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// 合併後的最終設定（預設值 < TOML 檔 < 命令列參數）
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub github_token: Option<String>,
    pub timeout_seconds: u64,
    pub concurrent_requests: usize,
    pub clerk_secret_key: Option<String>,
    pub clerk_base_url: String,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: GITHUB_CONTENTS_URL.to_string(),
            github_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            clerk_secret_key: None,
            clerk_base_url: CLERK_API_URL.to_string(),
            log_level: None,
            json_logs: false,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("github_token", &redact(&self.github_token))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("concurrent_requests", &self.concurrent_requests)
            .field("clerk_secret_key", &redact(&self.clerk_secret_key))
            .field("clerk_base_url", &self.clerk_base_url)
            .field("log_level", &self.log_level)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_url("clerk.base_url", &self.clerk_base_url)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.base_url(), GITHUB_CONTENTS_URL);
        assert_eq!(settings.github_token(), None);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let settings = Settings {
            timeout_seconds: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings {
            github_token: Some("ghp_secret".to_string()),
            clerk_secret_key: Some("sk_live_secret".to_string()),
            ..Settings::default()
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("sk_live_secret"));
    }
}
