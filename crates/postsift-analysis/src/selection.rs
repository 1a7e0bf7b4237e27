//! Mapping oracle index answers back onto input posts.
//!
//! The oracle only ever returns 1-based positions into the list it was
//! shown. Posts are selected by position, so an output can never contain a
//! post that was not in the input.

use std::collections::HashSet;

use postsift_core::Post;
use serde_json::Value;

use crate::error::AnalysisError;

/// Read a JSON array of indices.
///
/// Accepts integers, integral floats, and numeric strings; other elements
/// are skipped. Returns `None` if `value` is not an array.
pub(crate) fn index_list(value: &Value) -> Option<Vec<usize>> {
    let items = value.as_array()?;
    Some(items.iter().filter_map(index_value).collect())
}

fn index_value(item: &Value) -> Option<usize> {
    match item {
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                usize::try_from(i).ok()
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f >= 1.0 && f <= 1e9 {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    Some(f as usize)
                } else {
                    None
                }
            }
        }
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

/// Indices from a `{"relevant": [...]}` answer.
///
/// A bare array is accepted as the index list.
pub(crate) fn relevant_indices(value: &Value) -> Result<Vec<usize>, AnalysisError> {
    if let Some(indices) = index_list(value) {
        return Ok(indices);
    }
    value
        .get("relevant")
        .and_then(index_list)
        .ok_or_else(|| AnalysisError::Validation("expected a \"relevant\" index array".to_string()))
}

/// Posts at the given 1-based positions, in answer order.
///
/// Indices outside `1..=posts.len()` and repeats are dropped.
pub(crate) fn select_by_indices(posts: &[Post], indices: &[usize]) -> Vec<Post> {
    let mut seen = HashSet::new();
    indices
        .iter()
        .filter(|&&i| (1..=posts.len()).contains(&i))
        .filter(|&&i| seen.insert(i))
        .map(|&i| posts[i - 1].clone())
        .collect()
}

/// Like [`select_by_indices`] but in input order.
pub(crate) fn select_in_input_order(posts: &[Post], indices: &[usize]) -> Vec<Post> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    select_by_indices(posts, &sorted)
}
