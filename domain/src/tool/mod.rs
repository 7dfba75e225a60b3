//! Tool domain module
//!
//! This module defines the declarative **Tool Registry**, the static catalog
//! of pedagogical capabilities the orchestrator can dispatch to, and the
//! uniform request/response envelope every tool call travels in.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ ToolRequest  │───▶│ ToolResponse │
//! │ (catalog)    │    │ (inbound)    │    │ (envelope)   │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ tools:          "socratic_elenchus.v3.1" → ToolDefinition
//!        ├─ blocked_fields: ["grade", "score", ...]
//!        └─ routing:        default_loop = ["a", "b|c", ...]
//! ```
//!
//! # Formative-only policy
//!
//! When the registry is `formative_only`, no payload travelling through the
//! orchestrator may carry a key listed in `blocked_fields`, at any object
//! depth. [`blocked::find_blocked_fields`] reports every offending dotted path.
//!
//! # Key Types
//!
//! - [`ToolRegistry`]: the root registry document, immutable after load
//! - [`ToolDefinition`]: one tool with its schemas, default tier and escalation rule
//! - [`ToolRequest`] / [`ToolResponse`]: transient per-call envelope
//! - [`ValidationOutcome`]: result of a JSON-schema check

pub mod blocked;
pub mod entities;
pub mod envelope;
pub mod validation;

pub use entities::{EscalationRule, RoutingConfig, ToolDefinition, ToolRegistry};
pub use envelope::{ErrorKind, ResponseMeta, ToolRequest, ToolResponse};
pub use validation::ValidationOutcome;
