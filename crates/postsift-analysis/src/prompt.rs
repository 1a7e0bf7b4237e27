//! Post listings embedded in prompts.

use std::fmt::Write as _;

use postsift_core::Post;

/// Render posts as a 1-based numbered list the oracle can answer by index.
///
/// Posts whose engagement exceeds `high_engagement_above` are tagged so the
/// model can weigh them.
pub(crate) fn numbered_posts(
    posts: &[Post],
    excerpt_chars: usize,
    high_engagement_above: Option<f64>,
) -> String {
    let mut out = String::new();
    for (i, post) in posts.iter().enumerate() {
        let hot = high_engagement_above.is_some_and(|t| post.engagement > t);
        let _ = writeln!(
            out,
            "{}. [{}]{} (engagement {:.0}) {}",
            i + 1,
            post.platform,
            if hot { " [HIGH ENGAGEMENT]" } else { "" },
            post.engagement,
            post.excerpt(excerpt_chars)
        );
    }
    out
}

/// Mean engagement of `posts`, `0.0` when empty.
pub(crate) fn mean_engagement(posts: &[Post]) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = posts.len() as f64;
    posts.iter().map(|p| p.engagement).sum::<f64>() / count
}

#[cfg(test)]
mod tests {
    use postsift_core::Platform;

    use super::*;

    fn post(id: &str, engagement: f64, content: &str) -> Post {
        Post {
            id: id.to_string(),
            content: content.to_string(),
            source: "s".to_string(),
            platform: Platform::Youtube,
            engagement,
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn lists_are_numbered_from_one_and_tag_hot_posts() {
        let posts = vec![post("a", 10.0, "first\npost"), post("b", 500.0, "second")];
        let listing = numbered_posts(&posts, 100, Some(100.0));
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "1. [youtube] (engagement 10) first post");
        assert_eq!(
            lines[1],
            "2. [youtube] [HIGH ENGAGEMENT] (engagement 500) second"
        );
    }

    #[test]
    fn mean_engagement_handles_empty_input() {
        assert_eq!(mean_engagement(&[]), 0.0);
        let posts = vec![post("a", 2.0, ""), post("b", 4.0, "")];
        assert!((mean_engagement(&posts) - 3.0).abs() < f64::EPSILON);
    }
}
