//! Entitlement entities consumed from the external entitlements store

use crate::core::tier::ModelTier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Plan-level rate limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimits {
    pub requests_per_minute: u64,
    pub tokens_per_day: u64,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            requests_per_minute: 20,
            tokens_per_day: 100,
        }
    }
}

/// Plan-level model access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelAccess {
    pub default_tier: ModelTier,
    pub frontier_enabled: bool,
}

impl Default for ModelAccess {
    fn default() -> Self {
        Self {
            default_tier: ModelTier::M,
            frontier_enabled: false,
        }
    }
}

/// Subscription plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub name: String,
    pub rate_limits: RateLimits,
    pub model_access: ModelAccess,
    /// Tools whose name contains "advanced" must be listed here to be usable
    pub advanced_tools: Vec<String>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            name: "free".to_string(),
            rate_limits: RateLimits::default(),
            model_access: ModelAccess::default(),
            advanced_tools: Vec::new(),
        }
    }
}

/// Usage counters, maintained by the external store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub requests_today: u64,
    pub tokens_today: u64,
}

/// A caller's plan-derived permissions, limits and usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEntitlements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub plan: Plan,
    pub usage: Usage,
    /// Per-tool access overrides; an explicit `false` denies the tool
    pub tool_access: HashMap<String, bool>,
    pub available_tiers: Vec<ModelTier>,
    /// Whether tier escalation is permitted at all
    pub can_escalate: bool,
}

impl Default for UserEntitlements {
    fn default() -> Self {
        Self {
            user_id: None,
            plan: Plan::default(),
            usage: Usage::default(),
            tool_access: HashMap::new(),
            available_tiers: vec![ModelTier::S, ModelTier::M],
            can_escalate: false,
        }
    }
}

impl UserEntitlements {
    pub fn has_tier(&self, tier: ModelTier) -> bool {
        self.available_tiers.contains(&tier)
    }

    /// Frontier is usable only when offered by tiers, plan and escalation flag
    pub fn allows_frontier(&self) -> bool {
        self.has_tier(ModelTier::F) && self.plan.model_access.frontier_enabled && self.can_escalate
    }

    /// Highest available tier not above `tier`
    pub fn clamp_tier(&self, tier: ModelTier) -> Option<ModelTier> {
        self.available_tiers.iter().copied().filter(|t| *t <= tier).max()
    }

    // ==================== Builder Methods ====================

    pub fn with_tiers(mut self, tiers: Vec<ModelTier>) -> Self {
        self.available_tiers = tiers;
        self
    }

    pub fn with_frontier(mut self) -> Self {
        if !self.has_tier(ModelTier::F) {
            self.available_tiers.push(ModelTier::F);
        }
        self.plan.model_access.frontier_enabled = true;
        self.can_escalate = true;
        self
    }

    pub fn with_usage(mut self, requests_today: u64) -> Self {
        self.usage.requests_today = requests_today;
        self
    }

    pub fn with_tool_access(mut self, tool: impl Into<String>, allowed: bool) -> Self {
        self.tool_access.insert(tool.into(), allowed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_partial_document() {
        let ent: UserEntitlements = serde_json::from_value(json!({
            "plan": { "name": "pro", "model_access": { "default_tier": "L" } },
            "available_tiers": ["S", "M", "L", "F"],
            "can_escalate": true
        }))
        .unwrap();

        assert_eq!(ent.plan.name, "pro");
        assert_eq!(ent.plan.model_access.default_tier, ModelTier::L);
        assert!(!ent.plan.model_access.frontier_enabled);
        assert_eq!(ent.plan.rate_limits.tokens_per_day, 100);
        assert!(!ent.allows_frontier());
    }

    #[test]
    fn test_allows_frontier_requires_all_three() {
        let ent = UserEntitlements::default().with_frontier();
        assert!(ent.allows_frontier());

        let mut no_flag = ent.clone();
        no_flag.can_escalate = false;
        assert!(!no_flag.allows_frontier());

        let no_tier = ent.with_tiers(vec![ModelTier::S, ModelTier::M]);
        assert!(!no_tier.allows_frontier());
    }

    #[test]
    fn test_clamp_tier() {
        let ent = UserEntitlements::default().with_tiers(vec![ModelTier::S, ModelTier::L]);
        assert_eq!(ent.clamp_tier(ModelTier::F), Some(ModelTier::L));
        assert_eq!(ent.clamp_tier(ModelTier::M), Some(ModelTier::S));

        let empty = UserEntitlements::default().with_tiers(vec![]);
        assert_eq!(empty.clamp_tier(ModelTier::F), None);
    }
}
