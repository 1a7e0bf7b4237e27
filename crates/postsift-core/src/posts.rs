use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Content platform a post was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    X,
    Youtube,
    Linkedin,
    Threads,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Reddit,
        Platform::X,
        Platform::Youtube,
        Platform::Linkedin,
        Platform::Threads,
    ];
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Reddit => write!(f, "reddit"),
            Platform::X => write!(f, "x"),
            Platform::Youtube => write!(f, "youtube"),
            Platform::Linkedin => write!(f, "linkedin"),
            Platform::Threads => write!(f, "threads"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reddit" => Ok(Platform::Reddit),
            "x" | "twitter" => Ok(Platform::X),
            "youtube" => Ok(Platform::Youtube),
            "linkedin" => Ok(Platform::Linkedin),
            "threads" => Ok(Platform::Threads),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// A normalized content record returned by acquisition.
///
/// Posts are never modified by the analysis pipeline; stages only select
/// and label them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique within one search run.
    pub id: String,
    pub content: String,
    /// Author or channel label.
    pub source: String,
    pub platform: Platform,
    /// Non-negative engagement score (likes, upvotes, views, ...).
    pub engagement: f64,
    /// ISO-8601 timestamp as reported by the platform.
    pub timestamp: String,
    pub url: String,
}

impl Post {
    /// Returns at most `max_chars` characters of the content, collapsed to a
    /// single line and suffixed with `...` when cut.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let flattened = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        if flattened.chars().count() <= max_chars {
            return flattened;
        }
        let cut: String = flattened.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }

    /// Parses [`Post::timestamp`] as RFC 3339. Returns `None` when the
    /// platform reported something unparseable.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Recency window accepted by acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    /// Oldest timestamp that still passes the filter, relative to `now`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let window = match self {
            TimeFilter::Day => Duration::days(1),
            TimeFilter::Week => Duration::weeks(1),
            TimeFilter::Month => Duration::days(30),
            TimeFilter::Year => Duration::days(365),
            TimeFilter::All => return None,
        };
        Some(now - window)
    }
}

impl std::fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFilter::Day => write!(f, "day"),
            TimeFilter::Week => write!(f, "week"),
            TimeFilter::Month => write!(f, "month"),
            TimeFilter::Year => write!(f, "year"),
            TimeFilter::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" => Ok(TimeFilter::All),
            other => Err(format!(
                "unknown time filter '{other}'; expected day, week, month, year or all"
            )),
        }
    }
}

/// Parameters of one acquisition call.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    /// Empty means every platform.
    pub platforms: Vec<Platform>,
    pub language: String,
    pub time_filter: TimeFilter,
    pub max_results: usize,
}

/// Posts exported from a previous acquisition run, loaded from a JSON array.
#[derive(Debug, Clone, Default)]
pub struct PostArchive {
    pub posts: Vec<Post>,
}

impl PostArchive {
    /// Select the archived posts matching `request`.
    ///
    /// Keeps posts from the requested platforms whose timestamp falls inside
    /// the time filter (posts with unparseable timestamps are kept only for
    /// [`TimeFilter::All`]), orders them by engagement descending, and
    /// truncates to `max_results`. The language is not recorded on posts and
    /// is ignored.
    #[must_use]
    pub fn search(&self, request: &SearchRequest, now: DateTime<Utc>) -> Vec<Post> {
        let cutoff = request.time_filter.cutoff(now);
        let mut matched: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| request.platforms.is_empty() || request.platforms.contains(&p.platform))
            .filter(|p| match cutoff {
                None => true,
                Some(cutoff) => p.published_at().is_some_and(|at| at >= cutoff),
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.engagement.total_cmp(&a.engagement));
        matched.truncate(request.max_results);
        matched
    }
}

/// Load a post archive from a JSON file containing an array of posts.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains
/// posts with duplicate ids or negative engagement.
pub fn load_post_archive(path: &Path) -> Result<PostArchive, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let posts: Vec<Post> =
        serde_json::from_str(&content).map_err(|e| ConfigError::PostArchiveParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_posts(&posts)?;

    Ok(PostArchive { posts })
}

fn validate_posts(posts: &[Post]) -> Result<(), ConfigError> {
    let mut seen_ids = std::collections::HashSet::new();

    for post in posts {
        if post.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "post id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(post.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate post id: '{}'",
                post.id
            )));
        }
        if !post.engagement.is_finite() || post.engagement < 0.0 {
            return Err(ConfigError::Validation(format!(
                "post '{}' has invalid engagement {}",
                post.id, post.engagement
            )));
        }
    }

    Ok(())
}
