//! Schema validator port
//!
//! Request and response payloads are checked against per-tool JSON
//! schemas compiled once at startup. A tool without a compiled schema
//! fails validation rather than passing silently.

use ellen_domain::ValidationOutcome;
use serde_json::Value;

pub trait SchemaValidator: Send + Sync {
    fn validate_request(&self, tool_name: &str, payload: &Value) -> ValidationOutcome;

    fn validate_response(&self, tool_name: &str, payload: &Value) -> ValidationOutcome;
}
