//! Tier → concrete model identifier lookup table.

use crate::core::tier::ModelTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed lookup table from [`ModelTier`] to a provider model id
///
/// Built from configuration at startup; never computed per request.
///
/// # Example
///
/// ```
/// use ellen_domain::{ModelTier, TierModelMap};
///
/// let map = TierModelMap::default().with_model(ModelTier::F, "frontier-model");
/// assert_eq!(map.model_for(ModelTier::F), "frontier-model");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierModelMap {
    models: BTreeMap<ModelTier, String>,
}

impl Default for TierModelMap {
    fn default() -> Self {
        let models = BTreeMap::from([
            (ModelTier::S, "gpt-4o-mini".to_string()),
            (ModelTier::M, "gpt-4o".to_string()),
            (ModelTier::L, "gpt-4.1".to_string()),
            (ModelTier::F, "o3".to_string()),
        ]);
        Self { models }
    }
}

impl TierModelMap {
    pub fn with_model(mut self, tier: ModelTier, model_id: impl Into<String>) -> Self {
        self.models.insert(tier, model_id.into());
        self
    }

    /// Model id for `tier`; the default table covers every tier
    pub fn model_for(&self, tier: ModelTier) -> &str {
        self.models
            .get(&tier)
            .map(String::as_str)
            .unwrap_or_else(|| Self::fallback(tier))
    }

    pub fn entries(&self) -> impl Iterator<Item = (ModelTier, &str)> {
        self.models.iter().map(|(t, m)| (*t, m.as_str()))
    }

    fn fallback(tier: ModelTier) -> &'static str {
        match tier {
            ModelTier::S => "gpt-4o-mini",
            ModelTier::M => "gpt-4o",
            ModelTier::L => "gpt-4.1",
            ModelTier::F => "o3",
        }
    }
}
