//! Named escalation predicates.
//!
//! The registry refers to conditions by string; behavior lives here in a
//! closed set. Unknown names never escalate.

use serde_json::Value;

/// Prior-turn count above which `long_context` fires
pub const LONG_CONTEXT_TURNS: usize = 5;

/// Closed set of escalation predicates keyed by their registry identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscalationCondition {
    /// `payload.domain == "mathematics"`
    ComplexMath,
    /// more than [`LONG_CONTEXT_TURNS`] entries in `payload.prior_turns`
    LongContext,
}

impl EscalationCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationCondition::ComplexMath => "complex_math",
            EscalationCondition::LongContext => "long_context",
        }
    }

    /// Resolve a registry condition string
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "complex_math" => Some(EscalationCondition::ComplexMath),
            "long_context" => Some(EscalationCondition::LongContext),
            _ => None,
        }
    }

    pub fn evaluate(&self, payload: &Value) -> bool {
        match self {
            EscalationCondition::ComplexMath => {
                payload.get("domain").and_then(Value::as_str) == Some("mathematics")
            }
            EscalationCondition::LongContext => payload
                .get("prior_turns")
                .and_then(Value::as_array)
                .is_some_and(|turns| turns.len() > LONG_CONTEXT_TURNS),
        }
    }
}

impl std::fmt::Display for EscalationCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluate a condition by name; unknown names evaluate to `false`
pub fn evaluate_condition(name: &str, payload: &Value) -> bool {
    EscalationCondition::from_name(name).is_some_and(|c| c.evaluate(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complex_math() {
        assert!(evaluate_condition("complex_math", &json!({"domain": "mathematics"})));
        assert!(!evaluate_condition("complex_math", &json!({"domain": "physics"})));
        assert!(!evaluate_condition("complex_math", &json!({})));
    }

    #[test]
    fn test_long_context_threshold() {
        let five = json!({"prior_turns": [1, 2, 3, 4, 5]});
        let six = json!({"prior_turns": [1, 2, 3, 4, 5, 6]});
        assert!(!evaluate_condition("long_context", &five));
        assert!(evaluate_condition("long_context", &six));
    }

    #[test]
    fn test_unknown_condition_fails_closed() {
        assert!(!evaluate_condition("always", &json!({"domain": "mathematics"})));
        assert!(EscalationCondition::from_name("").is_none());
    }

    #[test]
    fn test_name_round_trip() {
        for c in [EscalationCondition::ComplexMath, EscalationCondition::LongContext] {
            assert_eq!(EscalationCondition::from_name(c.as_str()), Some(c));
        }
    }
}
