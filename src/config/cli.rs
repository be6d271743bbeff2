use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Clone, Parser)]
#[command(name = "swot-verify")]
#[command(about = "Check whether email domains are school-issued, using the JetBrains swot dataset")]
pub struct CliConfig {
    #[arg(required = true, value_name = "DOMAIN_OR_EMAIL")]
    pub targets: Vec<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, help = "Override the dataset base URL")]
    pub base_url: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    #[arg(long, value_name = "FILE", help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Value of the __session cookie; targets must then be email addresses"
    )]
    pub session_cookie: Option<String>,

    #[arg(long, env = "CLERK_SECRET_KEY", hide_env_values = true)]
    pub clerk_secret_key: Option<String>,

    #[arg(long, help = "Print one JSON object per target")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_to(&self, mut settings: Settings) -> Settings {
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(token) = self.github_token.as_deref().filter(|t| !t.trim().is_empty()) {
            settings.github_token = Some(token.trim().to_string());
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(concurrent) = self.concurrent_requests {
            settings.concurrent_requests = concurrent;
        }
        if let Some(key) = self.clerk_secret_key.as_deref().filter(|k| !k.trim().is_empty()) {
            settings.clerk_secret_key = Some(key.trim().to_string());
        }
        settings
    }

    pub fn settings(&self) -> Result<Settings> {
        let base = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?.settings()
            }
            None => Settings::default(),
        };
        Ok(self.apply_to(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_targets_and_flags() {
        let cli = CliConfig::try_parse_from([
            "swot-verify",
            "gachon.ac.kr",
            "kim@mit.edu",
            "--timeout-seconds",
            "4",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.targets, vec!["gachon.ac.kr", "kim@mit.edu"]);
        assert_eq!(cli.timeout_seconds, Some(4));
        assert!(cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_targets_are_required() {
        assert!(CliConfig::try_parse_from(["swot-verify"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[github]\ntimeout_seconds = 7\n\n[lookup]\nconcurrent_requests = 9\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "swot-verify",
            "gachon.ac.kr",
            "--config",
            &path,
            "--concurrent-requests",
            "2",
            "--github-token",
            "ghp_cli",
        ])
        .unwrap();

        let settings = cli.settings().unwrap();
        assert_eq!(settings.timeout_seconds, 7);
        assert_eq!(settings.concurrent_requests, 2);
        assert_eq!(settings.github_token.as_deref(), Some("ghp_cli"));
    }

    #[test]
    fn test_blank_cli_token_keeps_file_token() {
        let cli = CliConfig::try_parse_from([
            "swot-verify",
            "gachon.ac.kr",
            "--github-token",
            "",
        ])
        .unwrap();

        let base = Settings {
            github_token: Some("ghp_file".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            cli.apply_to(base).github_token.as_deref(),
            Some("ghp_file")
        );
    }
}
