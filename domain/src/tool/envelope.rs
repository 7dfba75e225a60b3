//! Uniform request/response envelope for tool calls

use crate::core::tier::ModelTier;
use crate::entitlements::entities::UserEntitlements;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound tool call, constructed fresh per HTTP request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool_name: String,
    #[serde(default = "empty_object")]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlements: Option<UserEntitlements>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ToolRequest {
    pub fn new(tool_name: impl Into<String>, payload: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload,
            user_id: None,
            session_id: None,
            entitlements: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_entitlements(mut self, entitlements: UserEntitlements) -> Self {
        self.entitlements = Some(entitlements);
        self
    }
}

/// Machine-readable failure category carried alongside the error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Tool name not present in the registry
    UnknownTool,
    /// Request payload failed its schema or typed decoding
    SchemaInvalid,
    /// Payload carried a formative-only blocked key
    BlockedFieldDetected,
    /// Rate limit, plan or per-tool access denied the call
    InsufficientEntitlements,
    /// Tool is registered but no controller handles it
    NoController,
    /// Provider error, empty or unexpected model output
    ModelInvocationFailed,
    /// A parser substituted a documented default; warning only
    ParseFallback,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownTool => "unknown_tool",
            ErrorKind::SchemaInvalid => "schema_invalid",
            ErrorKind::BlockedFieldDetected => "blocked_field_detected",
            ErrorKind::InsufficientEntitlements => "insufficient_entitlements",
            ErrorKind::NoController => "no_controller",
            ErrorKind::ModelInvocationFailed => "model_invocation_failed",
            ErrorKind::ParseFallback => "parse_fallback",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution metadata for a served tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub model_tier: ModelTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub escalated: bool,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

impl ResponseMeta {
    pub fn new(model_tier: ModelTier, latency_ms: u64) -> Self {
        Self {
            model_tier,
            model_id: None,
            escalated: false,
            latency_ms,
            tokens_used: None,
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_tokens_used(mut self, tokens: Option<u32>) -> Self {
        self.tokens_used = tokens;
        self
    }
}

/// The sole shape every tool call returns, regardless of which tool ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub tool_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Non-fatal diagnostics (response schema failures, parse fallbacks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

impl ToolResponse {
    pub fn success(tool_name: impl Into<String>, response: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            response: Some(response),
            error: None,
            error_kind: None,
            warnings: Vec::new(),
            meta: None,
        }
    }

    pub fn failure(
        tool_name: impl Into<String>,
        kind: ErrorKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            response: None,
            error: Some(error.into()),
            error_kind: Some(kind),
            warnings: Vec::new(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn is_failure_of(&self, kind: ErrorKind) -> bool {
        !self.success && self.error_kind == Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults_payload() {
        let request: ToolRequest = serde_json::from_value(json!({"tool_name": "a.v1"})).unwrap();
        assert_eq!(request.payload, json!({}));
        assert!(request.entitlements.is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let response = ToolResponse::failure("a.v1", ErrorKind::UnknownTool, "Unknown tool: a.v1");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({
                "tool_name": "a.v1",
                "success": false,
                "error": "Unknown tool: a.v1",
                "error_kind": "unknown_tool"
            })
        );
        assert!(response.is_failure_of(ErrorKind::UnknownTool));
    }

    #[test]
    fn test_success_envelope_meta() {
        let response = ToolResponse::success("a.v1", json!({"ok": true})).with_meta(
            ResponseMeta::new(ModelTier::L, 120)
                .with_model_id("model-large")
                .with_tokens_used(Some(42)),
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["model_tier"], "L");
        assert_eq!(json["meta"]["latency_ms"], 120);
        assert_eq!(json["meta"]["tokens_used"], 42);
        assert!(json.get("error").is_none());
    }
}
