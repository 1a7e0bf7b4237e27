use postsift_core::Post;
use serde::{Deserialize, Serialize};

/// Angle a focus area takes on the user's query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusCategory {
    Problems,
    Experiences,
    Questions,
    Success,
    Tools,
    Trends,
    Custom,
}

impl FocusCategory {
    /// Categories assigned to generated focus areas, in canonical order.
    pub const GENERATED: [FocusCategory; 6] = [
        FocusCategory::Problems,
        FocusCategory::Experiences,
        FocusCategory::Questions,
        FocusCategory::Success,
        FocusCategory::Tools,
        FocusCategory::Trends,
    ];

    /// Parse a category label emitted by the oracle. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "problems" | "problem" => Some(FocusCategory::Problems),
            "experiences" | "experience" => Some(FocusCategory::Experiences),
            "questions" | "question" => Some(FocusCategory::Questions),
            "success" | "successes" => Some(FocusCategory::Success),
            "tools" | "tool" => Some(FocusCategory::Tools),
            "trends" | "trend" => Some(FocusCategory::Trends),
            "custom" => Some(FocusCategory::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for FocusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FocusCategory::Problems => "problems",
            FocusCategory::Experiences => "experiences",
            FocusCategory::Questions => "questions",
            FocusCategory::Success => "success",
            FocusCategory::Tools => "tools",
            FocusCategory::Trends => "trends",
            FocusCategory::Custom => "custom",
        };
        f.write_str(label)
    }
}

/// A labeled sub-query produced by query expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusArea {
    pub title: String,
    pub description: String,
    /// Search string used by the later stages.
    pub expanded_query: String,
    pub category: FocusCategory,
    pub is_custom: bool,
    /// Set when the entry came from the keyword template bank instead of the oracle.
    pub is_fallback: bool,
}

impl FocusArea {
    /// The user-definable slot that echoes the raw query.
    #[must_use]
    pub fn custom(query: &str) -> Self {
        Self {
            title: "Custom Search".to_string(),
            description: "Search using your exact query".to_string(),
            expanded_query: query.to_string(),
            category: FocusCategory::Custom,
            is_custom: true,
            is_fallback: false,
        }
    }
}

/// One of the three output buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentCategory {
    PainPoints,
    TrendingIdeas,
    ContentIdeas,
}

impl ContentCategory {
    /// Bucket order, which is also the tie-break priority of the heuristic classifier.
    pub const ALL: [ContentCategory; 3] = [
        ContentCategory::PainPoints,
        ContentCategory::TrendingIdeas,
        ContentCategory::ContentIdeas,
    ];

    /// Human-readable label used in prompts and messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ContentCategory::PainPoints => "pain points",
            ContentCategory::TrendingIdeas => "trending ideas",
            ContentCategory::ContentIdeas => "content ideas",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentCategory::PainPoints => write!(f, "pain-points"),
            ContentCategory::TrendingIdeas => write!(f, "trending-ideas"),
            ContentCategory::ContentIdeas => write!(f, "content-ideas"),
        }
    }
}

impl std::str::FromStr for ContentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "pain-points" | "painpoints" | "pain" => Ok(ContentCategory::PainPoints),
            "trending-ideas" | "trendingideas" | "trending" => Ok(ContentCategory::TrendingIdeas),
            "content-ideas" | "contentideas" | "content" => Ok(ContentCategory::ContentIdeas),
            other => Err(format!(
                "unknown category '{other}'; expected pain-points, trending-ideas or content-ideas"
            )),
        }
    }
}

/// Three-way split of posts produced by bulk categorization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedPosts {
    pub pain_points: Vec<Post>,
    pub trending_ideas: Vec<Post>,
    pub content_ideas: Vec<Post>,
}

impl CategorizedPosts {
    #[must_use]
    pub fn get(&self, category: ContentCategory) -> &[Post] {
        match category {
            ContentCategory::PainPoints => &self.pain_points,
            ContentCategory::TrendingIdeas => &self.trending_ideas,
            ContentCategory::ContentIdeas => &self.content_ideas,
        }
    }

    pub fn get_mut(&mut self, category: ContentCategory) -> &mut Vec<Post> {
        match category {
            ContentCategory::PainPoints => &mut self.pain_points,
            ContentCategory::TrendingIdeas => &mut self.trending_ideas,
            ContentCategory::ContentIdeas => &mut self.content_ideas,
        }
    }

    /// Total number of entries across buckets, counting duplicates.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pain_points.len() + self.trending_ideas.len() + self.content_ideas.len()
    }
}

/// How much of the original input survived relevance filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceAnalysis {
    pub total_relevant_posts: usize,
    /// `relevant / total` in `[0.0, 1.0]`; `0.0` for an empty input.
    pub relevance_score: f64,
    pub excluded_irrelevant_posts: usize,
}

impl RelevanceAnalysis {
    #[must_use]
    pub fn new(total_posts: usize, relevant_posts: usize) -> Self {
        let relevant_posts = relevant_posts.min(total_posts);
        #[allow(clippy::cast_precision_loss)]
        let relevance_score = if total_posts == 0 {
            0.0
        } else {
            relevant_posts as f64 / total_posts as f64
        };
        Self {
            total_relevant_posts: relevant_posts,
            relevance_score,
            excluded_irrelevant_posts: total_posts - relevant_posts,
        }
    }
}

/// Result of a bulk analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAnalysis {
    #[serde(flatten)]
    pub categories: CategorizedPosts,
    pub relevance_analysis: RelevanceAnalysis,
    /// `true` when the keyword classifier replaced the oracle's split.
    pub used_fallback: bool,
}

/// Focused categorization found nothing worth showing.
///
/// This is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoRelevantContent {
    pub message: String,
    pub category: ContentCategory,
    pub total_posts_analyzed: usize,
    pub relevant_posts_found: usize,
}

/// Outcome of focused categorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FocusedOutcome {
    Found { posts: Vec<Post> },
    NoRelevantContent(NoRelevantContent),
}

impl FocusedOutcome {
    /// Selected posts, empty for [`FocusedOutcome::NoRelevantContent`].
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        match self {
            FocusedOutcome::Found { posts } => posts,
            FocusedOutcome::NoRelevantContent(_) => &[],
        }
    }
}
