//! Socratic questioning (`socratic_elenchus.v3.1`).
//!
//! The model answers specific questions first, then asks exactly one focus
//! question, optionally one extension question, and an assumption probe
//! only when misconceptions were flagged. The question budget is enforced
//! after parsing: the assumption probe is dropped first, then the
//! extension question. The focus question is never dropped.

use super::{FORMATIVE_ONLY_RULE, GenerationParams, Pedagogy, SOCRATIC_ELENCHUS, bullet_block};
use crate::parsing::{FallbackLog, Parsed, ResponseParser, Sections, first_question};
use serde::{Deserialize, Serialize};

const HEADINGS: &[&str] = &[
    "ANSWER",
    "FOCUS QUESTION",
    "EXTENSION QUESTION",
    "ASSUMPTION PROBE",
    "EMPATHY",
];

/// Emotion signals that switch on empathetic framing
const DISTRESS_SIGNALS: &[&str] = &["frustrat", "anxi", "stress", "confus", "overwhelm"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

/// Retrieved passage the answer may cite as `[n]` (1-based)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub citation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocraticPolicy {
    pub max_questions: usize,
    pub answer_first: bool,
}

impl Default for SocraticPolicy {
    fn default() -> Self {
        Self {
            max_questions: 2,
            answer_first: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocraticRequest {
    pub topic: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub learner_question: Option<String>,
    #[serde(default)]
    pub prior_turns: Vec<Turn>,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
    #[serde(default)]
    pub misconceptions: Vec<String>,
    #[serde(default)]
    pub emotion_signals: Vec<String>,
    #[serde(default)]
    pub require_grounding: bool,
    #[serde(default)]
    pub policy: SocraticPolicy,
}

impl SocraticRequest {
    /// A concrete question deserves a direct answer before any questioning.
    pub fn wants_answer_first(&self) -> bool {
        self.policy.answer_first
            && self
                .learner_question
                .as_deref()
                .is_some_and(|q| q.trim_end().ends_with('?') && q.split_whitespace().count() >= 3)
    }

    pub fn shows_distress(&self) -> bool {
        self.emotion_signals.iter().any(|signal| {
            let signal = signal.to_lowercase();
            DISTRESS_SIGNALS.iter().any(|s| signal.contains(s))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub marker: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocraticResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub focus_question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumption_probe: Option<String>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empathy_note: Option<String>,
}

impl SocraticResponse {
    pub fn question_count(&self) -> usize {
        1 + usize::from(self.extension_question.is_some())
            + usize::from(self.assumption_probe.is_some())
    }

    /// Drop optional questions until at most `max_questions` remain.
    ///
    /// The focus question is never dropped, so a budget below one is
    /// treated as one. Returns the names of the dropped fields in drop order.
    pub fn enforce_question_budget(&mut self, max_questions: usize) -> Vec<&'static str> {
        let max_questions = max_questions.max(1);
        let mut dropped = Vec::new();
        if self.question_count() > max_questions && self.assumption_probe.take().is_some() {
            dropped.push("assumption_probe");
        }
        if self.question_count() > max_questions && self.extension_question.take().is_some() {
            dropped.push("extension_question");
        }
        dropped
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SocraticQuestioning;

impl SocraticQuestioning {
    fn fallback_question(request: &SocraticRequest) -> String {
        format!(
            "What do you already know about {}, and where does your understanding get stuck?",
            request.topic
        )
    }
}

impl Pedagogy for SocraticQuestioning {
    fn tool_name(&self) -> &'static str {
        SOCRATIC_ELENCHUS
    }

    fn generation(&self) -> GenerationParams {
        GenerationParams::new(600, 0.7)
    }

    fn system_prompt(&self, request: &SocraticRequest) -> String {
        let mut prompt = String::from(
            "You are Ellen, a Socratic tutor. You help learners reason their way to understanding \
instead of handing out conclusions.\n\nRules:\n",
        );

        if request.wants_answer_first() {
            prompt.push_str(
                "- The learner asked a specific question: answer it directly and briefly first.\n",
            );
        }
        prompt.push_str(
            "- Ask exactly one focus question that moves the learner's thinking forward.\n",
        );
        prompt.push_str("- You may ask at most one extension question.\n");
        if request.misconceptions.is_empty() {
            prompt.push_str("- Do not include an assumption probe.\n");
        } else {
            prompt.push_str(
                "- The learner may hold the misconceptions listed below: add one assumption probe \
that invites them to test the assumption.\n",
            );
        }
        if request.shows_distress() {
            prompt.push_str(
                "- The learner seems frustrated or anxious: \
open with a short, warm, empathetic note.\n",
            );
        }
        if request.require_grounding {
            prompt.push_str(
                "- Ground every factual claim in the numbered sources \
and cite them inline as [1], [2].\n",
            );
        }
        prompt.push_str("- ");
        prompt.push_str(FORMATIVE_ONLY_RULE);
        prompt.push_str(
            "\n\nFormat your reply with these headings, omitting any that do not apply:\n\
ANSWER:\nFOCUS QUESTION:\nEXTENSION QUESTION:\nASSUMPTION PROBE:\nEMPATHY:",
        );
        prompt
    }

    fn user_prompt(&self, request: &SocraticRequest) -> String {
        let mut prompt = format!("Topic: {}\n", request.topic);
        if let Some(domain) = &request.domain {
            prompt.push_str(&format!("Domain: {}\n", domain));
        }
        if let Some(question) = &request.learner_question {
            prompt.push_str(&format!("Learner question: {}\n", question));
        }

        if !request.prior_turns.is_empty() {
            prompt.push_str("\nConversation so far:\n");
            for turn in &request.prior_turns {
                prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
            }
        }

        if !request.snippets.is_empty() {
            prompt.push_str("\nSources:\n");
            for (i, snippet) in request.snippets.iter().enumerate() {
                prompt.push_str(&format!("[{}] {} ({})\n", i + 1, snippet.text, snippet.citation));
            }
        }

        prompt.push_str(&format!(
            "\nFlagged misconceptions:\n{}\n",
            bullet_block(&request.misconceptions)
        ));
        if !request.emotion_signals.is_empty() {
            prompt.push_str(&format!(
                "Emotion signals: {}\n",
                request.emotion_signals.join(", ")
            ));
        }
        prompt
    }
}

impl ResponseParser for SocraticQuestioning {
    type Request = SocraticRequest;
    type Response = SocraticResponse;

    fn parse(&self, completion: &str, request: &SocraticRequest) -> Parsed<SocraticResponse> {
        let sections = Sections::parse(completion, HEADINGS);
        let mut log = FallbackLog::new();

        let focus_question = match sections.take("FOCUS QUESTION") {
            Some(question) => question,
            None => match first_question(completion) {
                Some(question) => {
                    log.record("focus_question", "first question sentence in completion");
                    question
                }
                None => {
                    log.record("focus_question", "generic question");
                    Self::fallback_question(request)
                }
            },
        };

        let empathy_note = match sections.take("EMPATHY") {
            Some(note) => Some(note),
            None if request.shows_distress() => {
                log.record("empathy_note", "no EMPATHY section");
                Some(
                    "It's completely normal to find this tricky. \
Let's take it one step at a time."
                        .to_string(),
                )
            }
            None => None,
        };

        let mut response = SocraticResponse {
            answer: sections.take("ANSWER"),
            focus_question,
            extension_question: sections.take("EXTENSION QUESTION"),
            // A probe is only warranted when something was flagged
            assumption_probe: sections
                .take("ASSUMPTION PROBE")
                .filter(|_| !request.misconceptions.is_empty()),
            citations: Vec::new(),
            empathy_note,
        };

        response.enforce_question_budget(request.policy.max_questions);
        response.citations = collect_citations(&response, &request.snippets);

        if request.require_grounding
            && !request.snippets.is_empty()
            && response.citations.is_empty()
        {
            log.record("citations", "no [n] markers matched the supplied sources");
        }

        log.finish(response)
    }
}

/// Map `[n]` markers in the response text back to the supplied snippets.
fn collect_citations(response: &SocraticResponse, snippets: &[Snippet]) -> Vec<Citation> {
    let text = [
        response.answer.as_deref(),
        Some(response.focus_question.as_str()),
        response.extension_question.as_deref(),
        response.assumption_probe.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n");

    let mut citations: Vec<Citation> = Vec::new();
    for index in citation_markers(&text) {
        let Some(snippet) = index.checked_sub(1).and_then(|i| snippets.get(i)) else {
            continue;
        };
        let marker = format!("[{}]", index);
        if citations.iter().all(|c| c.marker != marker) {
            citations.push(Citation {
                marker,
                source: snippet.citation.clone(),
            });
        }
    }
    citations
}

fn citation_markers(text: &str) -> Vec<usize> {
    let mut markers = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        if let Some(close) = rest.find(']')
            && let Ok(n) = rest[..close].trim().parse::<usize>()
        {
            markers.push(n);
        }
    }
    markers
}
