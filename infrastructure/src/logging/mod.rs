//! Logging infrastructure: the structured tool-call audit trail.
//!
//! Provides [`JsonlToolAuditLogger`], a JSONL file writer that implements
//! the [`ToolAuditLogger`](ellen_application::ToolAuditLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlToolAuditLogger;
