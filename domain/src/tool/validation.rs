//! Schema validation outcome value object

use serde::{Deserialize, Serialize};

/// Result of validating a payload against a tool's JSON schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }

    /// Failure for a tool with no compiled validator
    pub fn missing_validator(tool_name: &str, direction: &str) -> Self {
        Self::invalid(vec![format!(
            "no {} validator registered for tool '{}'",
            direction, tool_name
        )])
    }

    /// Errors joined for a single-line message
    pub fn summary(&self) -> String {
        self.errors.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_validator_is_failure() {
        let outcome = ValidationOutcome::missing_validator("x.v1", "request");
        assert!(!outcome.valid);
        assert_eq!(outcome.summary(), "no request validator registered for tool 'x.v1'");
    }

    #[test]
    fn test_valid_serializes_without_errors() {
        let json = serde_json::to_value(ValidationOutcome::valid()).unwrap();
        assert_eq!(json, serde_json::json!({"valid": true}));
    }
}
