//! Entitlements domain module
//!
//! [`UserEntitlements`] is owned by an external entitlements store; the
//! orchestrator reads it and never mutates it. [`gate::check_entitlements`]
//! decides whether a request may proceed at all, before any tier logic runs.

pub mod entities;
pub mod gate;

pub use entities::{ModelAccess, Plan, RateLimits, Usage, UserEntitlements};
pub use gate::{EntitlementDenial, check_entitlements};
