//! Data source locations: `[registry]`, `[entitlements]` and `[logging]`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Registry directory holding `tool_registry.json` and `schemas/`.
/// Unset means the registry bundled into the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    pub dir: Option<PathBuf>,
}

/// JSON entitlements store consulted for requests that carry a `user_id`
/// but no entitlements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEntitlementsConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL audit trail, one record per tool call
    pub audit_log: Option<PathBuf>,
    /// Daily-rotated diagnostic log file (in addition to stderr)
    pub file: Option<PathBuf>,
}
