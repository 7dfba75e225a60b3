//! Tool registry entities

use crate::core::error::DomainError;
use crate::core::tier::ModelTier;
use crate::tool::blocked::find_blocked_fields;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Escalation rule attached to a tool
///
/// `condition` names one of the closed set of predicates in
/// [`EscalationCondition`](crate::routing::escalation::EscalationCondition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    pub condition: String,
    pub to_tier: ModelTier,
}

/// Definition of a tool the orchestrator can dispatch to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique, versioned name (e.g., "socratic_elenchus.v3.1")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Reference to the request JSON schema document
    pub request_schema: String,
    /// Reference to the response JSON schema document
    pub response_schema: String,
    /// Tier used when no escalation fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model_tier: Option<ModelTier>,
    /// Optional escalation to a higher tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_if: Option<EscalationRule>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        request_schema: impl Into<String>,
        response_schema: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            request_schema: request_schema.into(),
            response_schema: response_schema.into(),
            default_model_tier: None,
            escalate_if: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default_tier(mut self, tier: ModelTier) -> Self {
        self.default_model_tier = Some(tier);
        self
    }

    pub fn with_escalation(mut self, condition: impl Into<String>, to_tier: ModelTier) -> Self {
        self.escalate_if = Some(EscalationRule {
            condition: condition.into(),
            to_tier,
        });
        self
    }
}

/// Routing section of the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Default multi-turn pedagogical flow; entries may be `a|b` alternatives
    #[serde(default)]
    pub default_loop: Vec<String>,
}

/// The root registry document
///
/// Loaded once at startup and shared read-only for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRegistry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether the formative-only policy (no grades/scores) is enforced
    #[serde(default)]
    pub formative_only: bool,
    /// Key names that must never appear in a payload (case-insensitive)
    #[serde(default)]
    pub blocked_fields: Vec<String>,
    pub tools: Vec<ToolDefinition>,
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl ToolRegistry {
    /// Parse and validate a registry document
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let registry: ToolRegistry = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidRegistry(e.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Check structural invariants: unique names, resolvable routing entries
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for tool in &self.tools {
            if tool.name.trim().is_empty() {
                return Err(DomainError::InvalidRegistry(
                    "tool name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(DomainError::InvalidRegistry(format!(
                    "duplicate tool name '{}'",
                    tool.name
                )));
            }
        }

        for step in &self.routing.default_loop {
            for alternative in step.split('|').map(str::trim) {
                if !seen.contains(alternative) {
                    return Err(DomainError::InvalidRegistry(format!(
                        "routing step '{}' references unknown tool '{}'",
                        step, alternative
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up a tool by exact name. Unknown names are an error, never a default.
    pub fn get_tool(&self, name: &str) -> Result<&ToolDefinition, DomainError> {
        self.tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| DomainError::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    /// Dotted paths of every blocked key found in `payload`
    pub fn check_for_blocked_fields(&self, payload: &serde_json::Value) -> Vec<String> {
        find_blocked_fields(payload, &self.blocked_fields)
    }
}
