//! Recovery of JSON from free-form model output.
//!
//! Small models wrap JSON in markdown fences, prepend chatter, or emit
//! unbalanced brackets. [`extract_json`] is purely structural: it finds the
//! JSON text, it never edits values or fills in fields.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::AnalysisError;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid fence regex"));

/// Recover the best-effort JSON array or object from raw model text.
///
/// 1. Strip fenced code-block markers.
/// 2. Bracket-match from each `[` or `{` in turn (string literals are
///    skipped) and return the first balanced substring that parses. Prose
///    such as "posts [1-50]" before the real answer is passed over.
/// 3. At the first start whose brackets never balance, stop scanning and
///    return the longest prefix from there that parses as JSON.
/// 4. Failing that, return the first balanced substring seen, or else the
///    cleaned text unchanged so the caller's parse fails explicitly.
///
/// Returns `None` only when the text contains no `[` or `{` at all.
#[must_use]
pub fn extract_json(raw: &str) -> Option<String> {
    let cleaned = FENCE_RE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    cleaned.find(['[', '{'])?;

    let mut first_balanced: Option<&str> = None;
    for (start, _) in cleaned.match_indices(['[', '{']) {
        let candidate = &cleaned[start..];
        let Some(end) = matching_close(candidate) else {
            if let Some(prefix) = longest_parseable_prefix(candidate) {
                return Some(prefix.to_string());
            }
            break;
        };
        let balanced = &candidate[..=end];
        if serde_json::from_str::<Value>(balanced).is_ok() {
            return Some(balanced.to_string());
        }
        first_balanced.get_or_insert(balanced);
    }

    if let Some(balanced) = first_balanced {
        return Some(balanced.to_string());
    }

    Some(cleaned.to_string())
}

/// Extract and parse the JSON value in `raw`.
///
/// # Errors
///
/// Returns [`AnalysisError::Extraction`] if no JSON text can be found or the
/// recovered text does not parse.
pub fn parse_json_response(raw: &str) -> Result<Value, AnalysisError> {
    let candidate = extract_json(raw)
        .ok_or_else(|| AnalysisError::Extraction("no JSON array or object in response".to_string()))?;
    serde_json::from_str(&candidate).map_err(|e| AnalysisError::Extraction(e.to_string()))
}

/// Byte index of the bracket closing the one at index 0 of `text`.
///
/// Returns `None` when the brackets are unbalanced or mismatched.
fn matching_close(text: &str) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => stack.push(']'),
            '{' => stack.push('}'),
            ']' | '}' => {
                if stack.pop() != Some(ch) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// Shrink `text` from the end, one closing bracket at a time, until what
/// remains parses as JSON.
fn longest_parseable_prefix(text: &str) -> Option<&str> {
    text.char_indices()
        .rev()
        .filter(|&(_, ch)| ch == ']' || ch == '}')
        .map(|(idx, _)| &text[..=idx])
        .find(|prefix| serde_json::from_str::<Value>(prefix).is_ok())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
