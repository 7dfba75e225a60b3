//! Tool registry loading and JSON Schema validation
//!
//! The registry document and the per-tool request/response schemas are
//! loaded once at startup. Schemas compile into [`JsonSchemaValidator`],
//! the adapter behind the application's `SchemaValidator` port.

mod bundled;
mod loader;
mod validator;

pub use loader::{LoadedRegistry, RegistryLoadError, RegistryLoader};
pub use validator::JsonSchemaValidator;
