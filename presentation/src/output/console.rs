//! Console output formatter for tool responses

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use ellen_domain::{
    ModelTier, TierDecision, TierModelMap, ToolRegistry, ToolResponse, ValidationOutcome,
};

/// Formats results for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Status line, response body, then warnings
    pub fn format_response(response: &ToolResponse) -> String {
        let mut output = String::new();

        if response.success {
            output.push_str(&format!("{} {}", "v".green().bold(), response.tool_name.bold()));
        } else {
            output.push_str(&format!("{} {}", "x".red().bold(), response.tool_name.bold()));
        }
        if let Some(meta) = &response.meta {
            output.push_str(&format!("  {}", Self::tier_label(meta.model_tier)));
            if let Some(model) = &meta.model_id {
                output.push_str(&format!(" {}", format!("({})", model).dimmed()));
            }
            if meta.escalated {
                output.push_str(&format!(" {}", "escalated".magenta()));
            }
            output.push_str(&format!("  {}", format!("{} ms", meta.latency_ms).dimmed()));
            if let Some(tokens) = meta.tokens_used {
                output.push_str(&format!(" {}", format!("{} tokens", tokens).dimmed()));
            }
        }
        output.push('\n');

        if let Some(error) = &response.error {
            let kind = response
                .error_kind
                .map(|k| format!("[{}] ", k.as_str()))
                .unwrap_or_default();
            output.push_str(&format!("{}{}\n", kind.red(), error));
        }

        if let Some(body) = &response.response {
            let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            output.push('\n');
            output.push_str(&Self::indent(&pretty, "  "));
            output.push('\n');
        }

        if !response.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in &response.warnings {
                output.push_str(&format!("  ! {}\n", warning));
            }
        }

        output
    }

    pub fn format_tools(registry: &ToolRegistry, models: &TierModelMap) -> String {
        let mut output = Self::section_header(&format!(
            "Tools{}",
            registry
                .version
                .as_deref()
                .map(|v| format!(" (registry {})", v))
                .unwrap_or_default()
        ));

        for tool in registry.tools() {
            output.push_str(&format!("\n{}\n", tool.name.yellow().bold()));
            if !tool.description.is_empty() {
                output.push_str(&format!("  {}\n", tool.description));
            }
            match tool.default_model_tier {
                Some(tier) => output.push_str(&format!(
                    "  tier: {} -> {}\n",
                    Self::tier_label(tier),
                    models.model_for(tier)
                )),
                None => output.push_str(&format!("  tier: {}\n", "plan default".dimmed())),
            }
            if let Some(rule) = &tool.escalate_if {
                output.push_str(&format!(
                    "  escalates to {} if {}\n",
                    Self::tier_label(rule.to_tier),
                    rule.condition
                ));
            }
        }

        if registry.formative_only {
            output.push_str(&format!(
                "\n{} blocked fields: {}\n",
                "formative-only".green(),
                registry.blocked_fields.join(", ")
            ));
        }
        output
    }

    pub fn format_decision(tool: &str, decision: &TierDecision, model_id: &str) -> String {
        format!(
            "{} -> {} {} {}\n",
            tool.bold(),
            Self::tier_label(decision.tier),
            model_id,
            format!("({})", decision.reason.as_str()).dimmed()
        )
    }

    pub fn format_validation(
        tool: &str,
        outcome: &ValidationOutcome,
        blocked: &[String],
    ) -> String {
        let mut output = String::new();
        if outcome.valid && blocked.is_empty() {
            output.push_str(&format!("{} {} payload is valid\n", "v".green().bold(), tool.bold()));
            return output;
        }

        output.push_str(&format!("{} {} payload is invalid\n", "x".red().bold(), tool.bold()));
        for error in &outcome.errors {
            output.push_str(&format!("  schema: {}\n", error));
        }
        for path in blocked {
            output.push_str(&format!("  blocked field: {}\n", path.red()));
        }
        output
    }

    pub fn format_loop(steps: &[String]) -> String {
        let mut output = Self::section_header("Default loop");
        for (i, step) in steps.iter().enumerate() {
            let alternatives: Vec<&str> = step.split('|').map(str::trim).collect();
            output.push_str(&format!(
                "  {}. {}\n",
                i + 1,
                alternatives.join(&format!(" {} ", "or".dimmed()))
            ));
        }
        output
    }

    fn tier_label(tier: ModelTier) -> String {
        let label = format!("[{}]", tier);
        match tier {
            ModelTier::S => label.green().to_string(),
            ModelTier::M => label.cyan().to_string(),
            ModelTier::L => label.blue().to_string(),
            ModelTier::F => label.magenta().bold().to_string(),
        }
    }

    fn section_header(title: &str) -> String {
        format!("{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_response(&self, response: &ToolResponse) -> String {
        Self::format_response(response)
    }

    fn format_tools(&self, registry: &ToolRegistry, models: &TierModelMap) -> String {
        Self::format_tools(registry, models)
    }

    fn format_decision(&self, tool: &str, decision: &TierDecision, model_id: &str) -> String {
        Self::format_decision(tool, decision, model_id)
    }

    fn format_validation(
        &self,
        tool: &str,
        outcome: &ValidationOutcome,
        blocked: &[String],
    ) -> String {
        Self::format_validation(tool, outcome, blocked)
    }

    fn format_loop(&self, steps: &[String]) -> String {
        Self::format_loop(steps)
    }
}
