//! Free-text model output parsing.
//!
//! Pure text pattern matching shared by every tool's [`ResponseParser`]:
//! heading-delimited sections, bullet/numbered list items, and
//! question-sentence extraction. No I/O happens here.

pub mod parser;
pub mod sections;

pub use parser::{FallbackLog, Parsed, ResponseParser};
pub use sections::{Sections, first_question, list_items, question_sentences};
