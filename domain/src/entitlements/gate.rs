//! Rate and plan gating, evaluated before any tier selection

use crate::entitlements::entities::UserEntitlements;
use thiserror::Error;

/// Why a request was denied by entitlements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementDenial {
    #[error("daily limit reached ({requests_today} requests against a limit of {limit})")]
    RateLimitExceeded { requests_today: u64, limit: u64 },

    #[error("tool '{tool}' is not included in plan '{plan}'")]
    AdvancedToolNotInPlan { tool: String, plan: String },

    #[error("tool '{0}' is disabled for this user")]
    ToolDisabled(String),
}

/// Decide whether `tool_name` may be called under `entitlements`.
///
/// The daily check compares `usage.requests_today` against
/// `plan.rate_limits.tokens_per_day`. The units differ (requests vs tokens);
/// the comparison is kept as-is for compatibility with existing plans.
pub fn check_entitlements(
    entitlements: &UserEntitlements,
    tool_name: &str,
) -> Result<(), EntitlementDenial> {
    let limit = entitlements.plan.rate_limits.tokens_per_day;
    if entitlements.usage.requests_today >= limit {
        return Err(EntitlementDenial::RateLimitExceeded {
            requests_today: entitlements.usage.requests_today,
            limit,
        });
    }

    if tool_name.contains("advanced")
        && !entitlements
            .plan
            .advanced_tools
            .iter()
            .any(|t| t == tool_name)
    {
        return Err(EntitlementDenial::AdvancedToolNotInPlan {
            tool: tool_name.to_string(),
            plan: entitlements.plan.name.clone(),
        });
    }

    if entitlements.tool_access.get(tool_name) == Some(&false) {
        return Err(EntitlementDenial::ToolDisabled(tool_name.to_string()));
    }

    Ok(())
}
