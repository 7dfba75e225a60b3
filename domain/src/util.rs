//! Shared utility functions.

/// Single-line preview of model text for log fields.
///
/// Newlines collapse to spaces and the result is cut to at most
/// `max_bytes` on a UTF-8 character boundary, with `…` appended when cut.
pub fn preview(text: &str, max_bytes: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= max_bytes {
        return flat;
    }
    let mut end = max_bytes;
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &flat[..end])
}
