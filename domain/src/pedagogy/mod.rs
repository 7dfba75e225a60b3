//! Pedagogical tools.
//!
//! Each tool pairs a typed request/response contract with the prompts that
//! encode its teaching policy and a [`ResponseParser`] for the model's
//! free-text answer. The application layer drives every tool through the
//! same [`Pedagogy`] trait, so adding a tool never touches orchestration.
//!
//! | Tool | Type | Model contributes |
//! |------|------|-------------------|
//! | `socratic_elenchus.v3.1` | [`SocraticQuestioning`] | answer, questions, empathy |
//! | `formative_check.v1.0` | [`FormativeCheck`] | feed up / back / forward |
//! | `diagnostic_probe.v1.0` | [`DiagnosticProbe`] | probes, hypothesis |
//! | `revision_scheduler.v1.0` | [`RevisionScheduler`] | study tips only |
//! | `worked_example.v1.0` | [`WorkedExample`] | steps, practice problem |
//! | `concept_mapper.v1.0` | [`ConceptMapper`] | links, gaps |

pub mod concept_map;
pub mod diagnostic;
pub mod formative;
pub mod revision;
pub mod socratic;
pub mod worked_example;

pub use concept_map::ConceptMapper;
pub use diagnostic::DiagnosticProbe;
pub use formative::FormativeCheck;
pub use revision::RevisionScheduler;
pub use socratic::SocraticQuestioning;
pub use worked_example::WorkedExample;

use crate::core::error::DomainError;
use crate::parsing::ResponseParser;
use serde::{Deserialize, Serialize};

pub const SOCRATIC_ELENCHUS: &str = "socratic_elenchus.v3.1";
pub const FORMATIVE_CHECK: &str = "formative_check.v1.0";
pub const DIAGNOSTIC_PROBE: &str = "diagnostic_probe.v1.0";
pub const REVISION_SCHEDULER: &str = "revision_scheduler.v1.0";
pub const WORKED_EXAMPLE: &str = "worked_example.v1.0";
pub const CONCEPT_MAPPER: &str = "concept_mapper.v1.0";

/// Sampling parameters a tool asks the model for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationParams {
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Shared instruction appended to every system prompt
pub(crate) const FORMATIVE_ONLY_RULE: &str = "Never give grades, scores, marks, percentages \
or pass/fail verdicts. Feedback is formative only: describe what the learner did \
and what to do next.";

/// A pedagogical capability the orchestrator can dispatch to.
pub trait Pedagogy: ResponseParser + Send + Sync + 'static {
    /// Versioned registry name this tool answers to
    fn tool_name(&self) -> &'static str;

    fn generation(&self) -> GenerationParams;

    /// Semantic checks the request schema cannot express.
    fn prepare(&self, _request: &Self::Request) -> Result<(), DomainError> {
        Ok(())
    }

    fn system_prompt(&self, request: &Self::Request) -> String;

    fn user_prompt(&self, request: &Self::Request) -> String;
}

/// Bullet list block for prompts, `(none)` when empty
pub(crate) fn bullet_block(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
