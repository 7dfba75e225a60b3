//! Worked example (`worked_example.v1.0`) with completion-problem fading.

use super::{FORMATIVE_ONLY_RULE, GenerationParams, Pedagogy, WORKED_EXAMPLE};
use crate::parsing::{FallbackLog, Parsed, ResponseParser, Sections, list_items};
use serde::{Deserialize, Serialize};

const HEADINGS: &[&str] = &["STEPS", "SELF-EXPLANATION PROMPT", "PRACTICE PROBLEM"];

/// How much of the worked solution is left for the learner to complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadingLevel {
    /// Every step explained
    #[default]
    Full,
    /// The second half of the explanations is left blank
    Partial,
    /// Only the first step is explained
    Minimal,
}

impl FadingLevel {
    /// Number of leading steps that keep their explanation
    pub fn explained_steps(&self, total: usize) -> usize {
        match self {
            FadingLevel::Full => total,
            FadingLevel::Partial => total.div_ceil(2),
            FadingLevel::Minimal => total.min(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkedExampleRequest {
    pub problem: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub fading: FadingLevel,
    #[serde(default)]
    pub learner_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub number: usize,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Explanation withheld for the learner to supply
    #[serde(default)]
    pub learner_completes: bool,
}

impl Step {
    /// Parse `description — explanation`; ` - ` and ` -- ` also separate.
    fn from_line(number: usize, line: &str) -> Self {
        let split = ["—", " -- ", " – ", " - "]
            .iter()
            .find_map(|sep| line.split_once(sep));
        let (description, explanation) = match split {
            Some((d, e)) => (d.trim(), Some(e.trim()).filter(|e| !e.is_empty())),
            None => (line.trim(), None),
        };
        Self {
            number,
            description: description.to_string(),
            explanation: explanation.map(str::to_string),
            learner_completes: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedExampleResponse {
    pub steps: Vec<Step>,
    pub self_explanation_prompt: String,
    pub practice_problem: String,
    pub fading: FadingLevel,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkedExample;

impl Pedagogy for WorkedExample {
    fn tool_name(&self) -> &'static str {
        WORKED_EXAMPLE
    }

    fn generation(&self) -> GenerationParams {
        GenerationParams::new(900, 0.2)
    }

    fn system_prompt(&self, _request: &WorkedExampleRequest) -> String {
        format!(
            "You are Ellen, a tutor modelling how an expert solves a problem.\n\
Solve it in short numbered steps. Each step states what is done, then why, \
separated by an em dash.\n\
{}\n\n\
Reply using these headings:\n\
STEPS: numbered list, `1. description — explanation`.\n\
SELF-EXPLANATION PROMPT: one question asking the learner to explain a step.\n\
PRACTICE PROBLEM: a similar problem for the learner to try.",
            FORMATIVE_ONLY_RULE
        )
    }

    fn user_prompt(&self, request: &WorkedExampleRequest) -> String {
        let mut prompt = String::new();
        if let Some(topic) = &request.topic {
            prompt.push_str(&format!("Topic: {}\n", topic));
        }
        if let Some(level) = &request.learner_level {
            prompt.push_str(&format!("Learner level: {}\n", level));
        }
        prompt.push_str(&format!("Problem: {}", request.problem));
        prompt
    }
}

impl ResponseParser for WorkedExample {
    type Request = WorkedExampleRequest;
    type Response = WorkedExampleResponse;

    fn parse(
        &self,
        completion: &str,
        request: &WorkedExampleRequest,
    ) -> Parsed<WorkedExampleResponse> {
        let sections = Sections::parse(completion, HEADINGS);
        let mut log = FallbackLog::new();

        let mut steps: Vec<Step> = sections
            .get("STEPS")
            .map(list_items)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, line)| Step::from_line(i + 1, line))
            .collect();
        if steps.is_empty() {
            log.record("steps", "no STEPS section");
            steps.push(Step {
                number: 1,
                description: format!("Work through the problem: {}", request.problem),
                explanation: None,
                learner_completes: false,
            });
        }
        apply_fading(&mut steps, request.fading);

        let self_explanation_prompt = log.section_or(
            &sections,
            "SELF-EXPLANATION PROMPT",
            "self_explanation_prompt",
            || "Why does each step follow from the one before it?".to_string(),
        );
        let practice_problem =
            log.section_or(&sections, "PRACTICE PROBLEM", "practice_problem", || {
                format!(
                    "Change one value in \"{}\" and solve the new problem using the same steps.",
                    request.problem
                )
            });

        log.finish(WorkedExampleResponse {
            steps,
            self_explanation_prompt,
            practice_problem,
            fading: request.fading,
        })
    }
}

/// Blank out explanations after the explained prefix
fn apply_fading(steps: &mut [Step], fading: FadingLevel) {
    let keep = fading.explained_steps(steps.len());
    for step in steps.iter_mut().skip(keep) {
        step.explanation = None;
        step.learner_completes = true;
    }
}
