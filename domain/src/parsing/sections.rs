//! Heading-delimited section extraction.
//!
//! Models are prompted to answer under fixed uppercase headings such as
//! `FOCUS QUESTION:`. A section runs from its heading to the next known
//! heading or the end of the text. Markdown decoration around headings
//! (`## `, `**`, `- `) is tolerated and matching is case-insensitive.

use std::collections::HashMap;

/// Sections of a completion keyed by heading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: HashMap<&'static str, String>,
}

impl Sections {
    /// Split `text` on the given headings (written without the colon).
    ///
    /// The first occurrence of a heading wins; empty sections are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ellen_domain::parsing::Sections;
    ///
    /// let text = "FOCUS QUESTION: Why?\n**EXTENSION QUESTION:** What if?";
    /// let sections = Sections::parse(text, &["FOCUS QUESTION", "EXTENSION QUESTION"]);
    /// assert_eq!(sections.get("FOCUS QUESTION"), Some("Why?"));
    /// assert_eq!(sections.get("EXTENSION QUESTION"), Some("What if?"));
    /// ```
    pub fn parse(text: &str, headings: &[&'static str]) -> Self {
        let mut ordered: Vec<&'static str> = headings.to_vec();
        ordered.sort_by_key(|h| std::cmp::Reverse(h.len()));

        let mut sections: HashMap<&'static str, String> = HashMap::new();
        let mut current: Option<(&'static str, Vec<&str>)> = None;

        for line in text.lines() {
            if let Some((heading, rest)) = match_heading(line, &ordered) {
                if let Some((prev, body)) = current.take() {
                    store(&mut sections, prev, &body);
                }
                current = Some((heading, vec![rest]));
            } else if let Some((_, body)) = current.as_mut() {
                body.push(line);
            }
        }
        if let Some((prev, body)) = current.take() {
            store(&mut sections, prev, &body);
        }

        Self { sections }
    }

    pub fn get(&self, heading: &str) -> Option<&str> {
        self.sections.get(heading).map(String::as_str)
    }

    /// Section content as an owned string
    pub fn take(&self, heading: &str) -> Option<String> {
        self.get(heading).map(str::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn store(sections: &mut HashMap<&'static str, String>, heading: &'static str, body: &[&str]) {
    let content = body.join("\n").trim().to_string();
    if !content.is_empty() && !sections.contains_key(heading) {
        sections.insert(heading, content);
    }
}

fn match_heading<'a>(line: &'a str, headings: &[&'static str]) -> Option<(&'static str, &'a str)> {
    let stripped = line
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '*' | '-' | '>'));
    let upper = stripped.to_ascii_uppercase();

    for heading in headings {
        if !upper.starts_with(heading) {
            continue;
        }
        let rest = stripped[heading.len()..].trim_start_matches(|c: char| c == '*' || c == ' ');
        if let Some(after) = rest.strip_prefix(':') {
            let after = after.trim_start_matches(|c: char| c == '*' || c.is_whitespace());
            return Some((heading, after));
        }
    }
    None
}

/// Bullet or numbered list entries of a section
///
/// Strips `-`, `*`, `•` and `1.` / `1)` markers; blank lines are skipped.
pub fn list_items(section: &str) -> Vec<String> {
    section
        .lines()
        .map(strip_list_marker)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim();
    let trimmed = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix('•'))
        .unwrap_or(trimmed);

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(after) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return after.trim();
        }
    }
    trimmed.trim()
}

/// Every sentence in `text` that ends with a question mark
pub fn question_sentences(text: &str) -> Vec<String> {
    let mut questions = Vec::new();
    let mut sentence = String::new();

    for c in text.chars() {
        match c {
            '?' => {
                sentence.push(c);
                let candidate = clean_sentence(&sentence);
                if candidate.len() > 1 {
                    questions.push(candidate);
                }
                sentence.clear();
            }
            '.' | '!' | '\n' => sentence.clear(),
            _ => sentence.push(c),
        }
    }

    questions
}

/// First sentence of `text` containing a question mark
pub fn first_question(text: &str) -> Option<String> {
    question_sentences(text).into_iter().next()
}

fn clean_sentence(sentence: &str) -> String {
    sentence
        .trim()
        .trim_start_matches(|c: char| matches!(c, '*' | '-' | '#' | '>' | '"'))
        .trim()
        .to_string()
}
