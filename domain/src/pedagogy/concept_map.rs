//! Concept mapper (`concept_mapper.v1.0`).
//!
//! Builds a labelled concept graph from the model's `A -> relation -> B`
//! lines and names the gaps in the learner's map.

use super::{CONCEPT_MAPPER, FORMATIVE_ONLY_RULE, GenerationParams, Pedagogy, bullet_block};
use crate::parsing::{FallbackLog, Parsed, ResponseParser, Sections, first_question, list_items};
use serde::{Deserialize, Serialize};

const HEADINGS: &[&str] = &["LINKS", "GAPS", "FOCUS QUESTION"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptMapRequest {
    pub topic: String,
    #[serde(default)]
    pub concepts: Vec<String>,
    /// Links the learner already drew, as `A -> relation -> B`
    #[serde(default)]
    pub learner_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptLink {
    pub from: String,
    pub relation: String,
    pub to: String,
}

impl ConceptLink {
    /// Parse `A -> relation -> B` (`→` is accepted too)
    pub fn parse(line: &str) -> Option<Self> {
        let normalized = line.replace('→', "->");
        let parts: Vec<&str> = normalized.split("->").map(str::trim).collect();
        match parts.as_slice() {
            [from, relation, to] if !from.is_empty() && !relation.is_empty() && !to.is_empty() => {
                Some(Self {
                    from: from.to_string(),
                    relation: relation.to_string(),
                    to: to.to_string(),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptMapResponse {
    pub nodes: Vec<String>,
    pub links: Vec<ConceptLink>,
    pub gaps: Vec<String>,
    pub focus_question: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptMapper;

impl Pedagogy for ConceptMapper {
    fn tool_name(&self) -> &'static str {
        CONCEPT_MAPPER
    }

    fn generation(&self) -> GenerationParams {
        GenerationParams::new(600, 0.3)
    }

    fn system_prompt(&self, _request: &ConceptMapRequest) -> String {
        format!(
            "You are Ellen, a tutor helping a learner organise ideas into a concept map.\n\
Connect the concepts with short, precise relations and point out missing connections.\n\
{}\n\n\
Reply using these headings:\n\
LINKS: one link per line as `concept -> relation -> concept`.\n\
GAPS: bullet list of important connections or concepts the learner is missing.\n\
FOCUS QUESTION: one question the finished map should answer.",
            FORMATIVE_ONLY_RULE
        )
    }

    fn user_prompt(&self, request: &ConceptMapRequest) -> String {
        format!(
            "Topic: {}\nConcepts:\n{}\nLearner's links:\n{}",
            request.topic,
            bullet_block(&request.concepts),
            bullet_block(&request.learner_links)
        )
    }
}

impl ResponseParser for ConceptMapper {
    type Request = ConceptMapRequest;
    type Response = ConceptMapResponse;

    fn parse(&self, completion: &str, request: &ConceptMapRequest) -> Parsed<ConceptMapResponse> {
        let sections = Sections::parse(completion, HEADINGS);
        let mut log = FallbackLog::new();

        let links: Vec<ConceptLink> = sections
            .get("LINKS")
            .map(list_items)
            .unwrap_or_default()
            .iter()
            .filter_map(|line| ConceptLink::parse(line))
            .collect();
        if links.is_empty() {
            log.record("links", "no parsable LINKS lines");
        }

        let nodes = collect_nodes(&request.concepts, &links);

        let mut gaps = sections.get("GAPS").map(list_items).unwrap_or_default();
        if gaps.is_empty() {
            log.record("gaps", "unlinked requested concepts");
            gaps = unlinked_concepts(&request.concepts, &links)
                .into_iter()
                .map(|c| format!("'{}' is not yet connected to any other concept", c))
                .collect();
        }

        let focus_question = match sections.take("FOCUS QUESTION") {
            Some(question) => question,
            None => {
                log.record("focus_question", "no FOCUS QUESTION section");
                first_question(completion).unwrap_or_else(|| match nodes.as_slice() {
                    [a, b, ..] => format!("How does {} relate to {}?", a, b),
                    _ => format!("What is the most important idea in {}?", request.topic),
                })
            }
        };

        log.finish(ConceptMapResponse {
            nodes,
            links,
            gaps,
            focus_question,
        })
    }
}

/// Requested concepts first, then linked ones, without case-insensitive duplicates
fn collect_nodes(concepts: &[String], links: &[ConceptLink]) -> Vec<String> {
    let mut nodes: Vec<String> = Vec::new();
    let candidates = concepts
        .iter()
        .chain(links.iter().flat_map(|l| [&l.from, &l.to]));
    for candidate in candidates {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        if !nodes.iter().any(|n| n.eq_ignore_ascii_case(candidate)) {
            nodes.push(candidate.to_string());
        }
    }
    nodes
}

fn unlinked_concepts<'a>(concepts: &'a [String], links: &[ConceptLink]) -> Vec<&'a str> {
    concepts
        .iter()
        .map(|c| c.as_str())
        .filter(|c| {
            !links
                .iter()
                .any(|l| l.from.eq_ignore_ascii_case(c) || l.to.eq_ignore_ascii_case(c))
        })
        .collect()
}
