//! Configuration file loading for Ellen
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ELLEN_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./ellen.toml` or `./.ellen.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ellen/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEntitlementsConfig, FileExecutionConfig,
    FileLoggingConfig, FileModelsConfig, FileOpenAiConfig, FileOutputConfig, FileProvidersConfig,
    FileRegistryConfig,
};
pub use loader::ConfigLoader;
