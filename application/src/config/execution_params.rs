//! Execution parameters — per-call generation control.
//!
//! Each tool declares its own [`GenerationParams`]; [`ExecutionParams`]
//! lets operators override them globally from the `[execution]` config
//! section. These are application-layer concerns, not domain policy.

use ellen_domain::GenerationParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Overrides every tool's `max_tokens` when set.
    pub max_tokens: Option<u32>,
    /// Overrides every tool's `temperature` when set.
    pub temperature: Option<f32>,
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Apply the overrides on top of a tool's own parameters
    pub fn resolve(&self, tool: GenerationParams) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens.unwrap_or(tool.max_tokens),
            temperature: self.temperature.unwrap_or(tool.temperature),
        }
    }
}
