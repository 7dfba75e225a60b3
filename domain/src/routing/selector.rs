//! Tier selection for a single request.
//!
//! # Algorithm
//!
//! 1. No entitlements: no gating. Escalation is evaluated; otherwise the
//!    tool's `default_model_tier`, or [`ModelTier::M`].
//! 2. Entitlements without frontier access (`F` missing from
//!    `available_tiers`, plan has frontier disabled, or escalation not
//!    permitted): escalation is skipped. The tool's `default_model_tier`
//!    wins over the plan's `model_access.default_tier`.
//! 3. Frontier permitted and the tool has `escalate_if`: the named predicate
//!    is evaluated against the payload; unknown names are false.
//! 4. A firing predicate returns `escalate_if.to_tier`.
//!
//! With entitlements present the result is finally clamped to the highest
//! available tier not above it (or `S` when none is), so a caller without
//! `F` is never served `F`.

use crate::core::tier::ModelTier;
use crate::entitlements::entities::UserEntitlements;
use crate::routing::escalation::evaluate_condition;
use crate::tool::entities::ToolDefinition;
use serde_json::Value;

/// Why a tier was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierReason {
    /// Escalation predicate fired
    Escalated,
    /// Tool-declared default tier
    ToolDefault,
    /// Plan default tier (tool declares none)
    PlanDefault,
    /// Built-in fallback for trusted callers
    Fallback,
    /// Lowered to the caller's highest available tier
    Clamped,
}

impl TierReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierReason::Escalated => "escalated",
            TierReason::ToolDefault => "tool_default",
            TierReason::PlanDefault => "plan_default",
            TierReason::Fallback => "fallback",
            TierReason::Clamped => "clamped",
        }
    }
}

/// Outcome of [`select_tier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDecision {
    pub tier: ModelTier,
    pub reason: TierReason,
}

impl TierDecision {
    fn new(tier: ModelTier, reason: TierReason) -> Self {
        Self { tier, reason }
    }

    pub fn escalated(&self) -> bool {
        self.reason == TierReason::Escalated
    }
}

/// Choose the tier that serves `payload` for `tool`
pub fn select_tier(
    tool: &ToolDefinition,
    payload: &Value,
    entitlements: Option<&UserEntitlements>,
) -> TierDecision {
    let Some(entitlements) = entitlements else {
        if let Some(tier) = escalation_target(tool, payload) {
            return TierDecision::new(tier, TierReason::Escalated);
        }
        return match tool.default_model_tier {
            Some(tier) => TierDecision::new(tier, TierReason::ToolDefault),
            None => TierDecision::new(ModelTier::default(), TierReason::Fallback),
        };
    };

    let default = match tool.default_model_tier {
        Some(tier) => TierDecision::new(tier, TierReason::ToolDefault),
        None => TierDecision::new(
            entitlements.plan.model_access.default_tier,
            TierReason::PlanDefault,
        ),
    };

    let decision = if entitlements.allows_frontier() {
        match escalation_target(tool, payload) {
            Some(tier) => TierDecision::new(tier, TierReason::Escalated),
            None => default,
        }
    } else {
        default
    };

    clamp_to_available(decision, entitlements)
}

fn escalation_target(tool: &ToolDefinition, payload: &Value) -> Option<ModelTier> {
    let rule = tool.escalate_if.as_ref()?;
    evaluate_condition(&rule.condition, payload).then_some(rule.to_tier)
}

fn clamp_to_available(decision: TierDecision, entitlements: &UserEntitlements) -> TierDecision {
    if entitlements.has_tier(decision.tier) {
        return decision;
    }
    let tier = entitlements.clamp_tier(decision.tier).unwrap_or(ModelTier::S);
    TierDecision::new(tier, TierReason::Clamped)
}
