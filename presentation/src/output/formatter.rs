//! Output formatter trait and the JSON implementation

use ellen_domain::{TierDecision, TierModelMap, ToolRegistry, ToolResponse, ValidationOutcome};
use serde_json::{Value, json};

/// Renders every CLI result; one implementation per `--output` format
pub trait OutputFormatter {
    /// Format a tool response envelope
    fn format_response(&self, response: &ToolResponse) -> String;

    /// Format the registry listing with the model each default tier maps to
    fn format_tools(&self, registry: &ToolRegistry, models: &TierModelMap) -> String;

    /// Format a dry-run tier decision
    fn format_decision(&self, tool: &str, decision: &TierDecision, model_id: &str) -> String;

    /// Format a schema and blocked-field check
    fn format_validation(&self, tool: &str, outcome: &ValidationOutcome, blocked: &[String])
    -> String;

    /// Format the default pedagogical loop
    fn format_loop(&self, steps: &[String]) -> String;
}

/// Machine-readable output, pretty-printed
pub struct JsonFormatter;

impl JsonFormatter {
    fn pretty(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_response(&self, response: &ToolResponse) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_tools(&self, registry: &ToolRegistry, models: &TierModelMap) -> String {
        let tools: Vec<Value> = registry
            .tools()
            .map(|tool| {
                let mut entry = serde_json::to_value(tool).unwrap_or_else(|_| json!({}));
                if let (Some(tier), Value::Object(map)) = (tool.default_model_tier, &mut entry) {
                    map.insert("default_model".to_string(), json!(models.model_for(tier)));
                }
                entry
            })
            .collect();
        Self::pretty(&json!({
            "version": registry.version,
            "formative_only": registry.formative_only,
            "blocked_fields": registry.blocked_fields,
            "tools": tools,
        }))
    }

    fn format_decision(&self, tool: &str, decision: &TierDecision, model_id: &str) -> String {
        Self::pretty(&json!({
            "tool_name": tool,
            "model_tier": decision.tier,
            "model_id": model_id,
            "reason": decision.reason.as_str(),
            "escalated": decision.escalated(),
        }))
    }

    fn format_validation(
        &self,
        tool: &str,
        outcome: &ValidationOutcome,
        blocked: &[String],
    ) -> String {
        Self::pretty(&json!({
            "tool_name": tool,
            "valid": outcome.valid && blocked.is_empty(),
            "schema_errors": outcome.errors,
            "blocked_fields": blocked,
        }))
    }

    fn format_loop(&self, steps: &[String]) -> String {
        let steps: Vec<Vec<&str>> = steps
            .iter()
            .map(|step| step.split('|').map(str::trim).collect())
            .collect();
        Self::pretty(&json!({ "default_loop": steps }))
    }
}
