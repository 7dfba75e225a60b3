//! Port for the structured tool-call audit trail.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port records one machine-readable
//! record per finished tool call (JSONL in the default adapter). Payloads
//! are never recorded, only routing and outcome fields.

use serde_json::Value;

/// A structured audit event.
///
/// The adapter adds the `type` and `timestamp` fields when writing.
pub struct AuditEvent {
    /// Event type identifier (e.g., "tool_call").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Synchronous and non-fallible: audit failures never disturb a request.
pub trait ToolAuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl ToolAuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
