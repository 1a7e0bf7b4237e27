//! Guarantees that no bucket of a three-way split is empty.

use std::collections::HashSet;

use postsift_core::Post;

use crate::types::{CategorizedPosts, ContentCategory};

/// Refill empty buckets of `result` so that every bucket is non-empty whenever
/// `original` is.
///
/// An empty bucket receives the first `max(1, original.len() / 10)` posts of
/// the other two buckets in category order, deduplicated by id. When both of
/// those are empty too, it draws from `original` instead. Buckets that are
/// already non-empty are never touched, so the function is idempotent.
#[must_use]
pub fn rebalance(mut result: CategorizedPosts, original: &[Post]) -> CategorizedPosts {
    if original.is_empty() {
        return result;
    }
    let refill_count = (original.len() / 10).max(1);

    for category in ContentCategory::ALL {
        if !result.get(category).is_empty() {
            continue;
        }

        let borrowed: Vec<Post> = {
            let mut seen = HashSet::new();
            ContentCategory::ALL
                .into_iter()
                .filter(|other| *other != category)
                .flat_map(|other| result.get(other))
                .filter(|post| seen.insert(post.id.as_str()))
                .take(refill_count)
                .cloned()
                .collect()
        };

        let (refill, from): (Vec<Post>, &str) = if borrowed.is_empty() {
            (
                original.iter().take(refill_count).cloned().collect(),
                "original posts",
            )
        } else {
            (borrowed, "other categories")
        };

        tracing::warn!(
            %category,
            refilled = refill.len(),
            from,
            "category empty after categorization, refilling"
        );
        *result.get_mut(category) = refill;
    }
    result
}
