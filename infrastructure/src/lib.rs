//! Infrastructure layer for Ellen
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the tool registry and its JSON schemas,
//! the model provider gateway, the entitlements store, the audit trail
//! and configuration file loading.

pub mod config;
pub mod entitlements;
pub mod logging;
pub mod providers;
pub mod registry;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use entitlements::FileEntitlementsStore;
pub use logging::JsonlToolAuditLogger;
pub use providers::OpenAiCompatibleGateway;
pub use registry::{JsonSchemaValidator, LoadedRegistry, RegistryLoadError, RegistryLoader};
