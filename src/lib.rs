pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::{ClerkClient, ReqwestTransport};
pub use crate::config::{toml_config::TomlConfig, Settings};
pub use crate::core::{student::StudentVerification, verifier::DomainVerifier};
pub use crate::utils::error::{Result, VerifyError};
