//! Analysis orchestration.

use postsift_core::Post;
use tracing::Instrument;
use uuid::Uuid;

use crate::categorize::{categorize_all, categorize_focused, heuristic_categorize};
use crate::context::StageContext;
use crate::error::AnalysisError;
use crate::oracle::Oracle;
use crate::rebalance::rebalance;
use crate::relevance::filter_relevant;
use crate::types::{BulkAnalysis, ContentCategory, FocusedOutcome, RelevanceAnalysis};

/// Run the bulk analysis for one request.
///
/// 1. Filter `posts` for relevance to `query` (fails open per batch).
/// 2. Split the relevant posts three ways with one oracle call.
/// 3. On failure, substitute the keyword classifier.
/// 4. Refill empty buckets from the relevant posts.
/// 5. Attach the relevance summary against the original input.
///
/// Empty input produces empty buckets and a relevance score of `0.0`.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the request is cancelled. Every
/// other failure is absorbed by a stage fallback.
pub async fn analyze<O: Oracle>(
    ctx: &StageContext<'_, O>,
    posts: &[Post],
    query: &str,
) -> Result<BulkAnalysis, AnalysisError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id, query, posts = posts.len());

    async move {
        let relevant = filter_relevant(ctx, posts, query).await?;

        let (categories, used_fallback) = match categorize_all(ctx, &relevant, query).await {
            Ok(categories) => (categories, false),
            Err(err) if err.is_cancelled() => return Err(err),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    relevant = relevant.len(),
                    "bulk categorization failed, using keyword classifier"
                );
                (
                    heuristic_categorize(&relevant, ctx.settings.fallback_bucket_cap),
                    true,
                )
            }
        };

        let categories = rebalance(categories, &relevant);
        let relevance_analysis = RelevanceAnalysis::new(posts.len(), relevant.len());

        tracing::info!(
            relevant = relevant.len(),
            pain_points = categories.pain_points.len(),
            trending_ideas = categories.trending_ideas.len(),
            content_ideas = categories.content_ideas.len(),
            used_fallback,
            "analysis complete"
        );

        Ok(BulkAnalysis {
            categories,
            relevance_analysis,
            used_fallback,
        })
    }
    .instrument(span)
    .await
}

/// Filter `posts` for `expanded_query` and pick the best ones for `category`.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the request is cancelled.
pub async fn analyze_focused<O: Oracle>(
    ctx: &StageContext<'_, O>,
    posts: &[Post],
    expanded_query: &str,
    category: ContentCategory,
) -> Result<FocusedOutcome, AnalysisError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "analyze_focused",
        %request_id,
        query = expanded_query,
        %category,
        posts = posts.len()
    );

    async move {
        let relevant = filter_relevant(ctx, posts, expanded_query).await?;
        categorize_focused(ctx, &relevant, expanded_query, category).await
    }
    .instrument(span)
    .await
}
