//! Domain layer for Ellen tool orchestration
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A **tool** is one pedagogical capability (Socratic questioning, formative
//! check, ...) registered under a versioned name in the [`ToolRegistry`].
//! Every call travels in a [`ToolRequest`] / [`ToolResponse`] envelope.
//!
//! ## Tiers
//!
//! Models are chosen by [`ModelTier`] (S < M < L < F), never by name.
//! [`select_tier`] applies tool defaults, the caller's entitlements and
//! named escalation rules; [`TierModelMap`] resolves the concrete model.
//!
//! ## Formative-only policy
//!
//! No grade or score ever leaves the system: blocked keys are rejected at
//! any depth, and every tool prompt forbids grading language.

pub mod core;
pub mod entitlements;
pub mod orchestration;
pub mod parsing;
pub mod pedagogy;
pub mod routing;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, tier::ModelTier};
pub use entitlements::{
    EntitlementDenial, ModelAccess, Plan, RateLimits, Usage, UserEntitlements, check_entitlements,
};
pub use orchestration::ProcessStage;
pub use parsing::{Parsed, ResponseParser};
pub use pedagogy::{
    ConceptMapper, DiagnosticProbe, FormativeCheck, GenerationParams, Pedagogy, RevisionScheduler,
    SocraticQuestioning, WorkedExample,
};
pub use routing::{
    EscalationCondition, RoutingLoop, TierDecision, TierModelMap, TierReason, select_tier,
};
pub use tool::{
    ErrorKind, EscalationRule, ResponseMeta, RoutingConfig, ToolDefinition, ToolRegistry,
    ToolRequest, ToolResponse, ValidationOutcome,
};
