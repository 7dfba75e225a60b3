//! Revision scheduler (`revision_scheduler.v1.0`).
//!
//! The schedule itself is computed locally; the model only contributes
//! study tips. One session per day from the start date (today unless given)
//! up to the day before the exam: the first third of the days introduce new
//! material, the middle third review it and the final third practise.
//! Topics rotate round-robin.
//!
//! The interleaved practice order is shuffled. The RNG and the "today"
//! date are injectable so tests can pin both.

use super::{FORMATIVE_ONLY_RULE, GenerationParams, Pedagogy, REVISION_SCHEDULER};
use crate::core::error::DomainError;
use crate::parsing::{FallbackLog, Parsed, ResponseParser, Sections, list_items};
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Review offsets in days suggested for every topic
pub const SPACED_INTERVALS: [u32; 5] = [1, 3, 7, 14, 30];

/// Longest schedule produced for a single request
pub const MAX_SCHEDULE_DAYS: i64 = 120;

const INTERLEAVE_REPEATS: usize = 3;

const FALLBACK_TIPS: &[&str] = &[
    "Close your notes and write down everything you remember before checking.",
    "Mix topics within a session instead of finishing one before starting the next.",
    "Sleep well before the exam: memory consolidates overnight.",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionRequest {
    pub topics: Vec<String>,
    pub exam_date: NaiveDate,
    pub study_hours_per_day: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    New,
    Review,
    Practice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub topic: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionResponse {
    pub schedule: Vec<ScheduleEntry>,
    pub spaced_intervals: BTreeMap<String, Vec<u32>>,
    pub interleaved_practice: Vec<String>,
    pub study_tips: Vec<String>,
}

pub struct RevisionScheduler {
    rng: Mutex<StdRng>,
    today: Option<NaiveDate>,
}

impl RevisionScheduler {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            today: None,
        }
    }

    /// Deterministic shuffle for reproducible output
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Pin the date used when a request has no `start_date`
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn start_date(&self, request: &RevisionRequest) -> NaiveDate {
        request
            .start_date
            .or(self.today)
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn build_schedule(&self, request: &RevisionRequest) -> Vec<ScheduleEntry> {
        let start = self.start_date(request);
        let days = (request.exam_date - start).num_days().clamp(0, MAX_SCHEDULE_DAYS) as usize;
        if request.topics.is_empty() {
            return Vec::new();
        }

        start
            .iter_days()
            .take(days)
            .enumerate()
            .map(|(i, date)| ScheduleEntry {
                date,
                topic: request.topics[i % request.topics.len()].clone(),
                session_type: phase(i, days),
                hours: request.study_hours_per_day,
            })
            .collect()
    }

    pub fn interleave(&self, topics: &[String]) -> Vec<String> {
        let mut order: Vec<String> = topics
            .iter()
            .flat_map(|topic| std::iter::repeat_n(topic.clone(), INTERLEAVE_REPEATS))
            .collect();
        match self.rng.lock() {
            Ok(mut rng) => order.shuffle(&mut *rng),
            Err(poisoned) => order.shuffle(&mut *poisoned.into_inner()),
        }
        order
    }
}

impl Default for RevisionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RevisionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionScheduler")
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

fn phase(index: usize, days: usize) -> SessionType {
    if index * 3 < days {
        SessionType::New
    } else if index * 3 < days * 2 {
        SessionType::Review
    } else {
        SessionType::Practice
    }
}

impl Pedagogy for RevisionScheduler {
    fn tool_name(&self) -> &'static str {
        REVISION_SCHEDULER
    }

    fn generation(&self) -> GenerationParams {
        GenerationParams::new(300, 0.5)
    }

    fn prepare(&self, request: &RevisionRequest) -> Result<(), DomainError> {
        if request.topics.iter().all(|t| t.trim().is_empty()) {
            return Err(DomainError::InvalidRequest(
                "at least one topic is required".to_string(),
            ));
        }
        if !request.study_hours_per_day.is_finite() || request.study_hours_per_day <= 0.0 {
            return Err(DomainError::InvalidRequest(
                "study_hours_per_day must be positive".to_string(),
            ));
        }
        let start = self.start_date(request);
        if request.exam_date <= start {
            return Err(DomainError::InvalidRequest(format!(
                "exam_date {} must be after start date {}",
                request.exam_date, start
            )));
        }
        Ok(())
    }

    fn system_prompt(&self, _request: &RevisionRequest) -> String {
        format!(
            "You are Ellen, a study coach helping a learner revise for an exam.\n\
Give three to five short, practical study tips grounded in retrieval practice, \
spacing and interleaving.\n\
{}\n\n\
Reply under the heading TIPS: as a bullet list.",
            FORMATIVE_ONLY_RULE
        )
    }

    fn user_prompt(&self, request: &RevisionRequest) -> String {
        let start = self.start_date(request);
        format!(
            "Topics: {}\nDays until the exam: {}\nStudy hours per day: {}",
            request.topics.join(", "),
            (request.exam_date - start).num_days(),
            request.study_hours_per_day
        )
    }
}

impl ResponseParser for RevisionScheduler {
    type Request = RevisionRequest;
    type Response = RevisionResponse;

    fn parse(&self, completion: &str, request: &RevisionRequest) -> Parsed<RevisionResponse> {
        let sections = Sections::parse(completion, &["TIPS"]);
        let mut log = FallbackLog::new();

        let mut study_tips = sections.get("TIPS").map(list_items).unwrap_or_default();
        if study_tips.is_empty() {
            log.record("study_tips", "no TIPS section");
            study_tips = FALLBACK_TIPS.iter().map(|tip| tip.to_string()).collect();
        }

        let spaced_intervals = request
            .topics
            .iter()
            .map(|topic| (topic.clone(), SPACED_INTERVALS.to_vec()))
            .collect();

        log.finish(RevisionResponse {
            schedule: self.build_schedule(request),
            spaced_intervals,
            interleaved_practice: self.interleave(&request.topics),
            study_tips,
        })
    }
}
