//! AI analysis pipeline for postsift.
//!
//! Turns a pile of platform posts into three buckets (pain points, trending
//! ideas, content ideas) for a user query, using a small local language model
//! as an unreliable oracle. Every stage degrades to a deterministic result
//! when the oracle fails; cancellation is the only error that escapes.

pub mod categorize;
pub mod context;
pub mod error;
pub mod expansion;
pub mod extract;
pub mod oracle;
pub mod pipeline;
pub mod rebalance;
pub mod relevance;
pub mod retry;
pub mod sources;
pub mod types;

mod prompt;
mod selection;

#[cfg(test)]
pub(crate) mod testing;

pub use categorize::{categorize_all, categorize_focused, heuristic_categorize};
pub use context::{PipelineSettings, StageContext};
pub use error::{AnalysisError, OracleError};
pub use expansion::expand_query;
pub use extract::{extract_json, parse_json_response};
pub use oracle::{
    call_oracle, GenerateOptions, ModelProfile, OllamaClient, Oracle, OracleSettings,
    ProfileSettings,
};
pub use pipeline::{analyze, analyze_focused};
pub use rebalance::rebalance;
pub use relevance::filter_relevant;
pub use retry::{retry_with_policy, Backoff, RetryPolicy};
pub use sources::{collect_posts, FeedbackSource, PostSource};
pub use types::{
    BulkAnalysis, CategorizedPosts, ContentCategory, FocusArea, FocusCategory, FocusedOutcome,
    NoRelevantContent, RelevanceAnalysis,
};
