//! Keyword and engagement classifier substituted when bulk categorization fails.

use postsift_core::Post;

use crate::prompt::mean_engagement;
use crate::types::{CategorizedPosts, ContentCategory};

/// Words signalling a complaint or unmet need. Lowercase single words.
pub(crate) const PAIN_KEYWORDS: &[&str] = &[
    "problem",
    "problems",
    "issue",
    "issues",
    "struggle",
    "struggling",
    "frustrated",
    "frustrating",
    "annoying",
    "hate",
    "broken",
    "fail",
    "failed",
    "failing",
    "worst",
    "difficult",
    "stuck",
    "complaint",
    "disappointed",
    "waste",
    "expensive",
    "bug",
    "help",
];

/// Words signalling novelty or momentum.
pub(crate) const TRENDING_KEYWORDS: &[&str] = &[
    "trend",
    "trending",
    "viral",
    "new",
    "launch",
    "launched",
    "released",
    "announced",
    "popular",
    "hype",
    "growing",
    "rising",
    "everyone",
    "latest",
    "booming",
    "exploding",
];

/// Words signalling material someone could turn into content.
pub(crate) const CONTENT_KEYWORDS: &[&str] = &[
    "how",
    "tutorial",
    "guide",
    "tips",
    "tip",
    "idea",
    "ideas",
    "tried",
    "review",
    "recommend",
    "learned",
    "lesson",
    "lessons",
    "story",
    "checklist",
    "beginner",
    "explain",
    "example",
];

/// Extra score given to trending when a post's engagement exceeds twice the mean.
const HIGH_ENGAGEMENT_TRENDING_BONUS: f64 = 2.0;

/// Split `posts` into three buckets without the oracle.
///
/// Each post is scored against three disjoint keyword lists, every score gets
/// `ln(engagement + 1)`, and trending gets a bonus for posts above twice the
/// mean engagement. A post goes to its strictly highest score; ties resolve
/// pain points, then trending ideas, then content ideas. Buckets are sorted
/// by engagement (highest first, stable) and capped at `bucket_cap`.
#[must_use]
pub fn heuristic_categorize(posts: &[Post], bucket_cap: usize) -> CategorizedPosts {
    let high_engagement = 2.0 * mean_engagement(posts);
    let mut result = CategorizedPosts::default();

    for post in posts {
        let category = classify(post, high_engagement);
        result.get_mut(category).push(post.clone());
    }

    for category in ContentCategory::ALL {
        let bucket = result.get_mut(category);
        bucket.sort_by(|a, b| b.engagement.total_cmp(&a.engagement));
        bucket.truncate(bucket_cap);
    }
    result
}

fn classify(post: &Post, high_engagement: f64) -> ContentCategory {
    let (mut pain, mut trending, mut content) = (0.0_f64, 0.0_f64, 0.0_f64);
    for word in post.content.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if PAIN_KEYWORDS.contains(&w.as_str()) {
            pain += 1.0;
        } else if TRENDING_KEYWORDS.contains(&w.as_str()) {
            trending += 1.0;
        } else if CONTENT_KEYWORDS.contains(&w.as_str()) {
            content += 1.0;
        }
    }

    let boost = (post.engagement.max(0.0) + 1.0).ln();
    pain += boost;
    trending += boost;
    content += boost;
    if post.engagement > high_engagement {
        trending += HIGH_ENGAGEMENT_TRENDING_BONUS;
    }

    if pain >= trending && pain >= content {
        ContentCategory::PainPoints
    } else if trending >= content {
        ContentCategory::TrendingIdeas
    } else {
        ContentCategory::ContentIdeas
    }
}
