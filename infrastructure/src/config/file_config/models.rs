//! Tier-based model configuration from TOML (`[models]` section)

use super::ConfigValidationError;
use ellen_domain::{ModelTier, TierModelMap};
use serde::{Deserialize, Serialize};

/// Model id per tier; unset tiers keep the built-in table
///
/// # Example
///
/// ```toml
/// [models]
/// small = "gpt-4o-mini"     # S: short structured answers
/// medium = "gpt-4o"         # M: default tutoring
/// large = "gpt-4.1"         # L: long context
/// frontier = "o3"           # F: entitlement-gated
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub frontier: Option<String>,
}

impl FileModelsConfig {
    fn entries(&self) -> [(ModelTier, &'static str, Option<&String>); 4] {
        [
            (ModelTier::S, "small", self.small.as_ref()),
            (ModelTier::M, "medium", self.medium.as_ref()),
            (ModelTier::L, "large", self.large.as_ref()),
            (ModelTier::F, "frontier", self.frontier.as_ref()),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (_, field, value) in self.entries() {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyModelName { tier: field });
            }
        }
        Ok(())
    }

    /// Built-in table with the configured overrides applied
    pub fn to_model_map(&self) -> TierModelMap {
        self.entries()
            .into_iter()
            .fold(TierModelMap::default(), |map, (tier, _, value)| match value {
                Some(model) if !model.trim().is_empty() => map.with_model(tier, model.trim()),
                _ => map,
            })
    }
}
