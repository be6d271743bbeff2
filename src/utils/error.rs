use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not an email address: {value:?}")]
    InvalidEmail { value: String },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Identity provider returned {status}: {message}")]
    Identity { status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Lookup for {input:?} did not complete: {reason}")]
    LookupAborted { input: String, reason: String },
}

pub type Result<T> = std::result::Result<T, VerifyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Identity,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VerifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            VerifyError::Transport(_) => ErrorCategory::Network,
            VerifyError::InvalidEmail { .. } | VerifyError::InvalidInput { .. } => {
                ErrorCategory::Input
            }
            VerifyError::Identity { .. } => ErrorCategory::Identity,
            VerifyError::ConfigError { .. }
            | VerifyError::ConfigValidationError { .. }
            | VerifyError::InvalidConfigValueError { .. }
            | VerifyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            VerifyError::IoError(_)
            | VerifyError::SerializationError(_)
            | VerifyError::LookupAborted { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Identity => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 網路錯誤通常可以直接重試
    pub fn is_retryable(&self) -> bool {
        match self {
            VerifyError::Transport(e) => e.is_timeout() || e.is_connect(),
            VerifyError::Identity { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            VerifyError::Transport(e) if e.is_timeout() => {
                "The remote service did not answer in time".to_string()
            }
            VerifyError::Transport(_) => "Could not reach the remote service".to_string(),
            VerifyError::InvalidEmail { value } => format!("'{}' is not an email address", value),
            VerifyError::Identity { .. } => "The identity provider rejected the request".to_string(),
            VerifyError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity, or raise --timeout-seconds and try again"
            }
            ErrorCategory::Input => "Pass a bare domain (school.ac.kr) or a full email address",
            ErrorCategory::Identity => "Verify the identity provider secret key and session cookie",
            ErrorCategory::Configuration => "Fix the configuration value and rerun",
            ErrorCategory::System => "Inspect the logs with --verbose for details",
        }
    }
}
