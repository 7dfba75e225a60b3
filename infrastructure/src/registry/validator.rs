//! Compiled JSON Schema validators, one request and one response schema per tool

use ellen_application::SchemaValidator;
use ellen_domain::ValidationOutcome;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Draft 2020-12 validators keyed by tool name.
///
/// A tool without a compiled validator fails validation rather than
/// passing unchecked.
#[derive(Default)]
pub struct JsonSchemaValidator {
    request: HashMap<String, Validator>,
    response: HashMap<String, Validator>,
}

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a schema document; the error carries the compiler's message.
    pub fn compile(schema: &Value) -> Result<Validator, String> {
        jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| err.to_string())
    }

    pub fn insert_request(
        &mut self,
        tool: impl Into<String>,
        schema: &Value,
    ) -> Result<(), String> {
        self.request.insert(tool.into(), Self::compile(schema)?);
        Ok(())
    }

    pub fn insert_response(
        &mut self,
        tool: impl Into<String>,
        schema: &Value,
    ) -> Result<(), String> {
        self.response.insert(tool.into(), Self::compile(schema)?);
        Ok(())
    }

    pub fn has_request_schema(&self, tool: &str) -> bool {
        self.request.contains_key(tool)
    }

    pub fn has_response_schema(&self, tool: &str) -> bool {
        self.response.contains_key(tool)
    }

    fn check(
        validators: &HashMap<String, Validator>,
        tool: &str,
        direction: &str,
        value: &Value,
    ) -> ValidationOutcome {
        let Some(validator) = validators.get(tool) else {
            warn!(tool, direction, "No compiled schema, rejecting payload");
            return ValidationOutcome::missing_validator(tool, direction);
        };
        let errors: Vec<String> = validator
            .iter_errors(value)
            .map(|err| err.to_string())
            .collect();
        if errors.is_empty() {
            ValidationOutcome::valid()
        } else {
            ValidationOutcome::invalid(errors)
        }
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate_request(&self, tool_name: &str, payload: &Value) -> ValidationOutcome {
        Self::check(&self.request, tool_name, "request", payload)
    }

    fn validate_response(&self, tool_name: &str, response: &Value) -> ValidationOutcome {
        Self::check(&self.response, tool_name, "response", response)
    }
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tools: Vec<&str> = self.request.keys().map(String::as_str).collect();
        tools.sort_unstable();
        f.debug_struct("JsonSchemaValidator")
            .field("request_schemas", &tools)
            .field("response_schemas", &self.response.len())
            .finish()
    }
}
