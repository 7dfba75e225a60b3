//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application types
//! at the wiring edge.

mod execution;
mod models;
mod output;
mod providers;
mod sources;

pub use execution::FileExecutionConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use providers::{FileOpenAiConfig, FileProvidersConfig};
pub use sources::{FileEntitlementsConfig, FileLoggingConfig, FileRegistryConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("providers.openai.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("models.{tier}: model name cannot be empty")]
    EmptyModelName { tier: &'static str },

    #[error("providers.openai.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("execution.temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("execution.max_tokens cannot be 0")]
    InvalidMaxTokens,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Tier → model id overrides
    pub models: FileModelsConfig,
    /// Model provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Generation overrides applied to every tool
    pub execution: FileExecutionConfig,
    /// Where the tool registry and schemas come from
    pub registry: FileRegistryConfig,
    /// Local entitlements store
    pub entitlements: FileEntitlementsConfig,
    /// Log and audit trail destinations
    pub logging: FileLoggingConfig,
    /// Terminal output
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.models.validate()?;
        self.providers.openai.validate()?;
        self.execution.validate()?;
        Ok(())
    }
}
