//! Model tier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Ordered cost/capability band a request is served at (Value Object)
///
/// Ordering follows cost: `S < M < L < F`. Each tier maps to exactly one
/// concrete model identifier per deployment; see
/// [`TierModelMap`](crate::routing::model_map::TierModelMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelTier {
    /// Simple: cheapest model, short structured answers
    S,
    /// Medium: default tutoring model
    M,
    /// Large: long context and multi-step reasoning
    L,
    /// Frontier: most capable model, gated by entitlements
    F,
}

impl ModelTier {
    /// All tiers in ascending order
    pub const ALL: [ModelTier; 4] = [ModelTier::S, ModelTier::M, ModelTier::L, ModelTier::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::S => "S",
            ModelTier::M => "M",
            ModelTier::L => "L",
            ModelTier::F => "F",
        }
    }

    pub fn is_frontier(&self) -> bool {
        matches!(self, ModelTier::F)
    }
}

impl Default for ModelTier {
    /// Returns the default tier (M)
    fn default() -> Self {
        ModelTier::M
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(ModelTier::S),
            "M" => Ok(ModelTier::M),
            "L" => Ok(ModelTier::L),
            "F" => Ok(ModelTier::F),
            _ => Err(DomainError::InvalidTier(s.to_string())),
        }
    }
}
