//! Completion → typed response contract

use super::sections::Sections;
use crate::tool::envelope::ErrorKind;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A parsed value plus the fallbacks that were needed to build it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    /// One note per field that was filled from a documented fallback
    pub fallbacks: Vec<String>,
}

impl<T> Parsed<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            fallbacks: Vec::new(),
        }
    }

    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Turns a model completion into a tool's typed response.
///
/// Implementations never fail: a missing section is replaced by its
/// fallback and recorded, so a successful call never carries an empty
/// required field.
pub trait ResponseParser {
    type Request: DeserializeOwned + Send + Sync;
    type Response: Serialize + Send;

    fn parse(&self, completion: &str, request: &Self::Request) -> Parsed<Self::Response>;
}

/// Collects fallback notes while a response is assembled
#[derive(Debug, Default)]
pub struct FallbackLog {
    notes: Vec<String>,
}

impl FallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field: &str, reason: impl AsRef<str>) {
        self.notes
            .push(format!("{}: {} ({})", ErrorKind::ParseFallback, field, reason.as_ref()));
    }

    /// Section text for `heading`, or `fallback()` with a note for `field`
    pub fn section_or(
        &mut self,
        sections: &Sections,
        heading: &str,
        field: &str,
        fallback: impl FnOnce() -> String,
    ) -> String {
        match sections.take(heading) {
            Some(text) => text,
            None => {
                self.record(field, format!("no {} section", heading));
                fallback()
            }
        }
    }

    pub fn finish<T>(self, value: T) -> Parsed<T> {
        Parsed {
            value,
            fallbacks: self.notes,
        }
    }
}
