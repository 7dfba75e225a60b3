//! Diagnostic probe (`diagnostic_probe.v1.0`).
//!
//! Asks a handful of short probing questions designed to surface the
//! misconception behind a learner's answer, plus a working hypothesis.

use super::{DIAGNOSTIC_PROBE, FORMATIVE_ONLY_RULE, GenerationParams, Pedagogy, bullet_block};
use crate::parsing::{FallbackLog, Parsed, ResponseParser, Sections, list_items, question_sentences};
use serde::{Deserialize, Serialize};

const HEADINGS: &[&str] = &["PROBES", "HYPOTHESIS", "FOLLOW UP"];

fn default_max_probes() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRequest {
    pub topic: String,
    #[serde(default)]
    pub learner_response: Option<String>,
    #[serde(default)]
    pub suspected_misconceptions: Vec<String>,
    #[serde(default = "default_max_probes")]
    pub max_probes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub question: String,
    /// Misconception the question is meant to expose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<String>,
}

impl Probe {
    /// Parse `question (targets: misconception)`
    fn from_line(line: &str) -> Self {
        let lower = line.to_ascii_lowercase();
        if let Some(start) = lower.find("(targets:") {
            let question = line[..start].trim().to_string();
            let target = line[start + "(targets:".len()..]
                .trim()
                .trim_end_matches(')')
                .trim();
            return Self {
                question,
                targets: (!target.is_empty()).then(|| target.to_string()),
            };
        }
        Self {
            question: line.trim().to_string(),
            targets: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResponse {
    pub probes: Vec<Probe>,
    pub hypothesis: String,
    pub follow_up: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticProbe;

impl Pedagogy for DiagnosticProbe {
    fn tool_name(&self) -> &'static str {
        DIAGNOSTIC_PROBE
    }

    fn generation(&self) -> GenerationParams {
        GenerationParams::new(400, 0.4)
    }

    fn system_prompt(&self, request: &DiagnosticRequest) -> String {
        format!(
            "You are Ellen, a tutor diagnosing how a learner is thinking.\n\
Write at most {} short probing questions. Each probe should expose one possible \
misconception without revealing the answer.\n\
{}\n\n\
Reply using these headings:\n\
PROBES: a numbered list, each line formatted as `question (targets: misconception)`.\n\
HYPOTHESIS: your best guess at the learner's mental model.\n\
FOLLOW UP: what the tutor should do after hearing the answers.",
            request.max_probes.max(1),
            FORMATIVE_ONLY_RULE
        )
    }

    fn user_prompt(&self, request: &DiagnosticRequest) -> String {
        let mut prompt = format!("Topic: {}\n", request.topic);
        if let Some(response) = &request.learner_response {
            prompt.push_str(&format!("Learner's answer: {}\n", response));
        }
        prompt.push_str(&format!(
            "Suspected misconceptions:\n{}",
            bullet_block(&request.suspected_misconceptions)
        ));
        prompt
    }
}

impl ResponseParser for DiagnosticProbe {
    type Request = DiagnosticRequest;
    type Response = DiagnosticResponse;

    fn parse(&self, completion: &str, request: &DiagnosticRequest) -> Parsed<DiagnosticResponse> {
        let sections = Sections::parse(completion, HEADINGS);
        let mut log = FallbackLog::new();
        let limit = request.max_probes.max(1);

        let mut probes: Vec<Probe> = sections
            .get("PROBES")
            .map(list_items)
            .unwrap_or_default()
            .iter()
            .map(|line| Probe::from_line(line))
            .filter(|probe| !probe.question.is_empty())
            .collect();

        if probes.is_empty() {
            probes = question_sentences(completion)
                .into_iter()
                .map(|question| Probe {
                    question,
                    targets: None,
                })
                .collect();
            if probes.is_empty() {
                log.record("probes", "generic probes");
                probes = generic_probes(request);
            } else {
                log.record("probes", "question sentences in completion");
            }
        }
        probes.truncate(limit);

        let hypothesis = log.section_or(&sections, "HYPOTHESIS", "hypothesis", || {
            match request.suspected_misconceptions.first() {
                Some(m) => format!("The learner may believe that {}.", m),
                None => "Not enough evidence yet to name a specific misconception.".to_string(),
            }
        });
        let follow_up = log.section_or(&sections, "FOLLOW UP", "follow_up", || {
            "Ask the learner to explain their reasoning step by step, \
then revisit the idea they hesitate on."
                .to_string()
        });

        log.finish(DiagnosticResponse {
            probes,
            hypothesis,
            follow_up,
        })
    }
}

fn generic_probes(request: &DiagnosticRequest) -> Vec<Probe> {
    if request.suspected_misconceptions.is_empty() {
        return vec![Probe {
            question: format!(
                "How would you explain {} to a friend who has never heard of it?",
                request.topic
            ),
            targets: None,
        }];
    }
    request
        .suspected_misconceptions
        .iter()
        .map(|m| Probe {
            question: format!("What makes you think that {}? Can you give an example?", m),
            targets: Some(m.clone()),
        })
        .collect()
}
