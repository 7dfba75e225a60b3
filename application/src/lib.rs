//! Application layer for Ellen tool orchestration
//!
//! This crate contains use cases, port definitions, tool controllers and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod controllers;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use controllers::{ControllerFactory, ControllerSet, PedagogyController, ToolController};
pub use ports::{
    entitlements::{EntitlementsError, EntitlementsProvider},
    llm_gateway::{Completion, CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, OrchestratorProgress},
    schema_validator::SchemaValidator,
    tool_audit::{AuditEvent, NoAuditLogger, ToolAuditLogger},
};
pub use use_cases::orchestrator::Orchestrator;
