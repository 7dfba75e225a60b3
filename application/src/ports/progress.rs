//! Progress notification port
//!
//! Defines the interface for reporting pipeline progress of a tool request.

use ellen_domain::{ProcessStage, ToolResponse};

/// Callback for progress updates during request processing
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, ...).
pub trait OrchestratorProgress: Send + Sync {
    /// Called each time the request passes a pipeline stage
    fn on_stage(&self, tool_name: &str, stage: ProcessStage);

    /// Called once with the final envelope
    fn on_finished(&self, _response: &ToolResponse) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl OrchestratorProgress for NoProgress {
    fn on_stage(&self, _tool_name: &str, _stage: ProcessStage) {}
}
