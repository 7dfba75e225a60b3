//! Progress reporting for tool request processing

use colored::Colorize;
use ellen_application::OrchestratorProgress;
use ellen_domain::{ProcessStage, ToolResponse};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner that walks through the pipeline stages of one request
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(ProcessStage::ALL.len() as u64);
        bar.set_style(Self::stage_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:24.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Short label shown next to the spinner
    pub fn stage_display_name(stage: ProcessStage) -> &'static str {
        match stage {
            ProcessStage::Received => "Looking up tool",
            ProcessStage::EntitlementChecked => "Entitlements checked",
            ProcessStage::SchemaValidated => "Request schema valid",
            ProcessStage::BlockedFieldChecked => "Formative-only policy checked",
            ProcessStage::TierResolved => "Model tier selected",
            ProcessStage::Dispatched => "Waiting for the model",
            ProcessStage::ResponseValidated => "Response checked",
            ProcessStage::Returned => "Done",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorProgress for ProgressReporter {
    fn on_stage(&self, tool_name: &str, stage: ProcessStage) {
        self.bar.set_prefix(tool_name.to_string());
        self.bar.set_position(stage.ordinal() as u64);
        self.bar.set_message(Self::stage_display_name(stage));
    }

    fn on_finished(&self, response: &ToolResponse) {
        if response.success {
            self.bar.finish_and_clear();
        } else {
            self.bar
                .abandon_with_message(format!("{}", "failed".red()));
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl OrchestratorProgress for SimpleProgress {
    fn on_stage(&self, tool_name: &str, stage: ProcessStage) {
        eprintln!(
            "{} {} {}",
            "->".cyan(),
            tool_name.bold(),
            ProgressReporter::stage_display_name(stage)
        );
    }

    fn on_finished(&self, response: &ToolResponse) {
        if response.success {
            eprintln!("  {} {}", "v".green(), response.tool_name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), response.tool_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_label() {
        for stage in ProcessStage::ALL {
            assert!(!ProgressReporter::stage_display_name(stage).is_empty());
        }
    }

    #[test]
    fn test_reporter_tracks_stage_position() {
        let reporter = ProgressReporter::new();
        reporter.on_stage("formative_check.v1.0", ProcessStage::TierResolved);
        assert_eq!(reporter.bar.position(), ProcessStage::TierResolved.ordinal() as u64);
        reporter.on_finished(&ToolResponse::success("formative_check.v1.0", serde_json::json!({})));
        assert!(reporter.bar.is_finished());
    }
}
