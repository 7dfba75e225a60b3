//! Port definitions (interfaces for external systems)
//!
//! Ports define the boundaries between the application layer and
//! infrastructure/presentation layers.

pub mod entitlements;
pub mod llm_gateway;
pub mod progress;
pub mod schema_validator;
pub mod tool_audit;
