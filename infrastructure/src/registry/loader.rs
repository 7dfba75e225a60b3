//! Registry document and schema file loading

use super::bundled;
use super::validator::JsonSchemaValidator;
use ellen_domain::{DomainError, ToolRegistry};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const REGISTRY_FILE: &str = "tool_registry.json";
pub const SCHEMA_DIR: &str = "schemas";

#[derive(Error, Debug)]
pub enum RegistryLoadError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] DomainError),

    #[error("Schema {name} for tool {tool} does not compile: {message}")]
    SchemaCompile {
        tool: String,
        name: String,
        message: String,
    },
}

/// Registry plus the validator compiled from its schemas
#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    pub registry: Arc<ToolRegistry>,
    pub validator: Arc<JsonSchemaValidator>,
}

/// Loads a registry from a directory or from the bundled copy.
///
/// Directory layout:
///
/// ```text
/// <dir>/tool_registry.json
/// <dir>/schemas/<tool>.request.json
/// <dir>/schemas/<tool>.response.json
/// ```
///
/// A schema file that is referenced but absent is logged and left out;
/// validation for that tool then fails at request time.
pub struct RegistryLoader;

impl RegistryLoader {
    /// Directory if given, bundled otherwise
    pub fn load(dir: Option<&Path>) -> Result<LoadedRegistry, RegistryLoadError> {
        match dir {
            Some(dir) => Self::load_dir(dir),
            None => Self::load_bundled(),
        }
    }

    pub fn load_dir(dir: &Path) -> Result<LoadedRegistry, RegistryLoadError> {
        let registry_path = dir.join(REGISTRY_FILE);
        let text = read_file(&registry_path)?;
        let schema_dir = dir.join(SCHEMA_DIR);

        let loaded = Self::assemble(&text, |name| {
            let path = schema_dir.join(name);
            if path.exists() {
                read_file(&path).map(Some)
            } else {
                Ok(None)
            }
        })?;
        info!(
            dir = %dir.display(),
            tools = loaded.registry.tools.len(),
            "Loaded tool registry"
        );
        Ok(loaded)
    }

    pub fn load_bundled() -> Result<LoadedRegistry, RegistryLoadError> {
        let loaded = Self::assemble(bundled::REGISTRY, |name| {
            Ok(bundled::schema(name).map(str::to_string))
        })?;
        debug!(tools = loaded.registry.tools.len(), "Loaded bundled tool registry");
        Ok(loaded)
    }

    fn assemble<F>(
        registry_text: &str,
        mut read_schema: F,
    ) -> Result<LoadedRegistry, RegistryLoadError>
    where
        F: FnMut(&str) -> Result<Option<String>, RegistryLoadError>,
    {
        let registry = ToolRegistry::from_json(registry_text)?;
        let mut validator = JsonSchemaValidator::new();

        for tool in &registry.tools {
            let schemas = [(&tool.request_schema, true), (&tool.response_schema, false)];
            for (name, is_request) in schemas {
                let Some(text) = read_schema(name)? else {
                    warn!(tool = %tool.name, schema = %name, "Schema file not found");
                    continue;
                };
                let schema: Value = serde_json::from_str(&text).map_err(|source| {
                    RegistryLoadError::Json {
                        name: name.clone(),
                        source,
                    }
                })?;
                let compiled = if is_request {
                    validator.insert_request(tool.name.as_str(), &schema)
                } else {
                    validator.insert_response(tool.name.as_str(), &schema)
                };
                compiled.map_err(|message| RegistryLoadError::SchemaCompile {
                    tool: tool.name.clone(),
                    name: name.clone(),
                    message,
                })?;
            }
        }

        Ok(LoadedRegistry {
            registry: Arc::new(registry),
            validator: Arc::new(validator),
        })
    }
}

fn read_file(path: &Path) -> Result<String, RegistryLoadError> {
    std::fs::read_to_string(path).map_err(|source| RegistryLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ellen_application::SchemaValidator;
    use ellen_domain::ModelTier;
    use serde_json::json;

    #[test]
    fn test_bundled_registry_loads_all_tools() {
        let loaded = RegistryLoader::load_bundled().unwrap();
        let names: Vec<&str> = loaded.registry.tool_names().collect();

        assert_eq!(names.len(), 6);
        assert!(loaded.registry.formative_only);
        for name in names {
            assert!(loaded.validator.has_request_schema(name), "{name}");
            assert!(loaded.validator.has_response_schema(name), "{name}");
        }
    }

    #[test]
    fn test_bundled_tiers_and_loop() {
        let loaded = RegistryLoader::load_bundled().unwrap();
        let formative = loaded.registry.get_tool("formative_check.v1.0").unwrap();
        assert_eq!(formative.default_model_tier, Some(ModelTier::S));
        assert_eq!(loaded.registry.routing.default_loop.len(), 5);
    }

    #[test]
    fn test_bundled_request_schemas_leave_extra_keys_to_blocked_scan() {
        let loaded = RegistryLoader::load_bundled().unwrap();
        let outcome = loaded.validator.validate_request(
            "formative_check.v1.0",
            &json!({"user_response": "F=ma", "grade": "A"}),
        );
        assert!(outcome.valid);
    }

    #[test]
    fn test_load_dir_with_missing_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(SCHEMA_DIR)).unwrap();
        std::fs::write(
            dir.path().join(REGISTRY_FILE),
            json!({
                "tools": [{
                    "name": "echo.v1",
                    "request_schema": "echo.request.json",
                    "response_schema": "echo.response.json"
                }]
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(SCHEMA_DIR).join("echo.request.json"),
            r#"{"type": "object"}"#,
        )
        .unwrap();

        let loaded = RegistryLoader::load_dir(dir.path()).unwrap();

        assert!(loaded.validator.has_request_schema("echo.v1"));
        assert!(!loaded.validator.has_response_schema("echo.v1"));
        assert!(!loaded.validator.validate_response("echo.v1", &json!({})).valid);
    }

    #[test]
    fn test_load_dir_missing_registry_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RegistryLoader::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RegistryLoadError::Io { .. }));
    }

    #[test]
    fn test_bad_schema_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(SCHEMA_DIR)).unwrap();
        std::fs::write(
            dir.path().join(REGISTRY_FILE),
            json!({
                "tools": [{
                    "name": "echo.v1",
                    "request_schema": "e.json",
                    "response_schema": "e.json"
                }]
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(dir.path().join(SCHEMA_DIR).join("e.json"), "{not json").unwrap();

        let err = RegistryLoader::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RegistryLoadError::Json { .. }));
    }

    #[test]
    fn test_duplicate_tool_is_registry_error() {
        let text = r#"{"tools": [
            {"name": "a.v1", "request_schema": "x", "response_schema": "y"},
            {"name": "a.v1", "request_schema": "x", "response_schema": "y"}
        ]}"#;
        let err = RegistryLoader::assemble(text, |_| Ok(None)).unwrap_err();
        assert!(matches!(err, RegistryLoadError::Registry(_)));
    }
}
