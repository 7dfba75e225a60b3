//! Routing domain module
//!
//! Decides *which tier* serves a request and *which tool* comes next in the
//! default pedagogical flow.
//!
//! | Concern | Type |
//! |---------|------|
//! | Named escalation predicates | [`escalation::EscalationCondition`] |
//! | Tier decision per request | [`selector::select_tier`] → [`selector::TierDecision`] |
//! | Tier → concrete model id | [`model_map::TierModelMap`] |
//! | Default multi-turn flow cursor | [`default_loop::RoutingLoop`] |

pub mod default_loop;
pub mod escalation;
pub mod model_map;
pub mod selector;

pub use default_loop::RoutingLoop;
pub use escalation::EscalationCondition;
pub use model_map::TierModelMap;
pub use selector::{TierDecision, TierReason, select_tier};
