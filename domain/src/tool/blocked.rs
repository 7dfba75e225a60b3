//! Formative-only blocked-field scan.
//!
//! Walks every own key of a JSON object and recurses into values that are
//! themselves objects. Arrays are not descended into, so objects nested
//! inside arrays are outside the scan. Matching is on key name only and is
//! case-insensitive; the value is never inspected (a `"grade": null` key is
//! still reported).

use serde_json::Value;

/// Return the dotted path of every key in `payload` that matches `blocked`.
///
/// Non-object payloads (including an empty object) yield an empty list.
///
/// # Examples
///
/// ```
/// use ellen_domain::tool::blocked::find_blocked_fields;
/// use serde_json::json;
///
/// let blocked = vec!["grade".to_string()];
/// let found = find_blocked_fields(&json!({"meta": {"Grade": null}}), &blocked);
/// assert_eq!(found, vec!["meta.Grade".to_string()]);
/// ```
pub fn find_blocked_fields(payload: &Value, blocked: &[String]) -> Vec<String> {
    let blocked: Vec<String> = blocked.iter().map(|f| f.to_lowercase()).collect();
    let mut found = Vec::new();
    walk(payload, "", &blocked, &mut found);
    found
}

fn walk(value: &Value, prefix: &str, blocked: &[String], found: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };

    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        if blocked.contains(&key.to_lowercase()) {
            found.push(path.clone());
        }

        if child.is_object() {
            walk(child, &path, blocked, found);
        }
    }
}
