//! Formative check (`formative_check.v1.0`).
//!
//! Feedback follows the feed up / feed back / feed forward model. The
//! response type has no numeric field of any kind.

use super::{FORMATIVE_CHECK, FORMATIVE_ONLY_RULE, GenerationParams, Pedagogy};
use crate::parsing::{FallbackLog, Parsed, ResponseParser, Sections, list_items};
use crate::util::preview;
use serde::{Deserialize, Serialize};

const HEADINGS: &[&str] = &[
    "FEED UP",
    "FEED BACK",
    "FEED FORWARD",
    "MISCONCEPTIONS",
    "NEXT STEPS",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    #[default]
    Conceptual,
    Procedural,
    Application,
}

impl CheckType {
    fn focus(&self) -> &'static str {
        match self {
            CheckType::Conceptual => "whether the learner understands the underlying idea",
            CheckType::Procedural => {
                "whether the learner carried out the steps correctly and in order"
            }
            CheckType::Application => "whether the learner can apply the idea to a new situation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormativeRequest {
    pub user_response: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub check_type: CheckType,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub learning_goal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Where the learner is going
    pub feed_up: String,
    /// How the learner is doing
    pub feed_back: String,
    /// What to do next
    pub feed_forward: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormativeResponse {
    pub feedback: Feedback,
    #[serde(default)]
    pub misconceptions: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormativeCheck;

impl Pedagogy for FormativeCheck {
    fn tool_name(&self) -> &'static str {
        FORMATIVE_CHECK
    }

    fn generation(&self) -> GenerationParams {
        GenerationParams::new(500, 0.3)
    }

    fn system_prompt(&self, request: &FormativeRequest) -> String {
        format!(
            "You are Ellen, a tutor giving formative feedback on a learner's answer.\n\
This is a {} check: focus on {}.\n\
{}\n\n\
Reply using these headings:\n\
FEED UP: the learning goal in one sentence.\n\
FEED BACK: what the answer shows, naming strengths and gaps.\n\
FEED FORWARD: one concrete next move.\n\
MISCONCEPTIONS: a bullet list, or nothing if none.\n\
NEXT STEPS: a short bullet list of practice suggestions.",
            match request.check_type {
                CheckType::Conceptual => "conceptual",
                CheckType::Procedural => "procedural",
                CheckType::Application => "application",
            },
            request.check_type.focus(),
            FORMATIVE_ONLY_RULE
        )
    }

    fn user_prompt(&self, request: &FormativeRequest) -> String {
        let mut prompt = String::new();
        if let Some(topic) = &request.topic {
            prompt.push_str(&format!("Topic: {}\n", topic));
        }
        if let Some(goal) = &request.learning_goal {
            prompt.push_str(&format!("Learning goal: {}\n", goal));
        }
        if let Some(expected) = &request.expected {
            prompt.push_str(&format!("Expected idea: {}\n", expected));
        }
        prompt.push_str(&format!("Learner's answer: {}", request.user_response));
        prompt
    }
}

impl ResponseParser for FormativeCheck {
    type Request = FormativeRequest;
    type Response = FormativeResponse;

    fn parse(&self, completion: &str, request: &FormativeRequest) -> Parsed<FormativeResponse> {
        let sections = Sections::parse(completion, HEADINGS);
        let mut log = FallbackLog::new();

        let feed_up = log.section_or(&sections, "FEED UP", "feedback.feed_up", || {
            match (&request.learning_goal, &request.topic) {
                (Some(goal), _) => goal.clone(),
                (None, Some(topic)) => {
                    format!("The goal is to explain {} in your own words.", topic)
                }
                (None, None) => "The goal is to explain this idea in your own words.".to_string(),
            }
        });
        let feed_back = log.section_or(&sections, "FEED BACK", "feedback.feed_back", || {
            format!(
                "You wrote: \"{}\". Compare it with the key idea and look for what is missing.",
                preview(&request.user_response, 120)
            )
        });
        let feed_forward = log.section_or(&sections, "FEED FORWARD", "feedback.feed_forward", || {
            "Restate your answer in your own words and support it with one concrete example."
                .to_string()
        });

        let items = |heading: &str| {
            sections
                .get(heading)
                .map(list_items)
                .unwrap_or_default()
                .into_iter()
                .filter(|item| !is_none_marker(item))
                .collect::<Vec<_>>()
        };

        log.finish(FormativeResponse {
            feedback: Feedback {
                feed_up,
                feed_back,
                feed_forward,
            },
            misconceptions: items("MISCONCEPTIONS"),
            next_steps: items("NEXT STEPS"),
        })
    }
}

fn is_none_marker(item: &str) -> bool {
    matches!(
        item.trim_end_matches('.').to_ascii_lowercase().as_str(),
        "none" | "n/a" | "nothing"
    )
}
