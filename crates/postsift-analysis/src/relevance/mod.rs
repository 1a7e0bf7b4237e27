//! Relevance filtering in fixed-size batches.
//!
//! Each batch is one oracle call answered with `{"relevant": [indices]}`.
//! A batch whose call or parse fails keeps all of its posts, so the filter
//! can only ever remove posts the oracle positively left out.

mod gloss;

use std::fmt::Write as _;

use postsift_core::Post;

use crate::context::StageContext;
use crate::error::AnalysisError;
use crate::extract::parse_json_response;
use crate::oracle::{GenerateOptions, ModelProfile, Oracle};
use crate::prompt::numbered_posts;
use crate::retry::pause;
use crate::selection::{relevant_indices, select_in_input_order};

const FILTER_TEMPERATURE: f32 = 0.1;

/// Keep the posts in `posts` that are relevant to `query`, in input order.
///
/// Batches run sequentially with the configured pause between them. The
/// query gloss is computed once per call. Empty input returns an empty
/// result without calling the oracle.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the request is cancelled. Oracle
/// and parse failures never escape.
pub async fn filter_relevant<O: Oracle>(
    ctx: &StageContext<'_, O>,
    posts: &[Post],
    query: &str,
) -> Result<Vec<Post>, AnalysisError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let gloss = gloss::query_gloss(ctx, query).await?;
    let hints = feedback_hints(ctx, query);

    let batch_size = ctx.settings.filter_batch_size.max(1);
    let batch_count = posts.len().div_ceil(batch_size);
    let mut relevant = Vec::with_capacity(posts.len());

    for (i, batch) in posts.chunks(batch_size).enumerate() {
        if i > 0 {
            pause(ctx.settings.inter_batch_delay, ctx.cancel).await?;
        }

        let batch_number = i + 1;
        match filter_batch(ctx, batch, query, &gloss, hints.as_deref()).await {
            Ok(kept) => {
                tracing::debug!(
                    batch = batch_number,
                    batch_count,
                    size = batch.len(),
                    kept = kept.len(),
                    "relevance batch filtered"
                );
                relevant.extend(kept);
            }
            Err(err) if err.is_cancelled() => return Err(err),
            Err(err) => {
                tracing::warn!(
                    batch = batch_number,
                    batch_count,
                    size = batch.len(),
                    error = %err,
                    "relevance batch failed, keeping all of its posts"
                );
                relevant.extend_from_slice(batch);
            }
        }
    }

    tracing::info!(
        query,
        total = posts.len(),
        relevant = relevant.len(),
        "relevance filtering complete"
    );
    Ok(relevant)
}

async fn filter_batch<O: Oracle>(
    ctx: &StageContext<'_, O>,
    batch: &[Post],
    query: &str,
    gloss: &str,
    hints: Option<&str>,
) -> Result<Vec<Post>, AnalysisError> {
    let prompt = batch_prompt(batch, query, gloss, hints, ctx.settings.excerpt_chars);
    let options = GenerateOptions::new(ModelProfile::Segregation, FILTER_TEMPERATURE);
    let raw = ctx.call(&prompt, &options).await?;
    let value = parse_json_response(&raw)?;
    let indices = relevant_indices(&value)?;
    Ok(select_in_input_order(batch, &indices))
}

fn batch_prompt(
    batch: &[Post],
    query: &str,
    gloss: &str,
    hints: Option<&str>,
    excerpt_chars: usize,
) -> String {
    let mut prompt = format!(
        "You decide which social media posts are relevant to a research topic.\n\n\
         Topic: \"{query}\"\n\
         What relevant posts look like: {gloss}\n"
    );
    if let Some(hints) = hints {
        let _ = write!(
            prompt,
            "\nPast users rated results for similar topics like this:\n{hints}\
             Be stricter on platforms with low ratings.\n"
        );
    }
    let _ = write!(
        prompt,
        "\nPosts:\n{}\n\
         A post is relevant if it is actually about the topic, not merely using one of its words.\n\
         Respond with only JSON in this form: {{\"relevant\": [1, 4, 7]}}\n\
         listing the numbers of the relevant posts. Use {{\"relevant\": []}} if none are relevant.",
        numbered_posts(batch, excerpt_chars, None)
    );
    prompt
}

/// Per-platform rating lines from the feedback read model, if any.
fn feedback_hints<O>(ctx: &StageContext<'_, O>, query: &str) -> Option<String> {
    let insights = ctx.feedback?.rating_insights(query)?;
    if insights.is_empty() {
        return None;
    }

    let mut hints = String::new();
    for insight in &insights {
        let _ = write!(
            hints,
            "- {}: average rating {:.1}/5 from {} ratings",
            insight.platform, insight.avg_rating, insight.total_ratings
        );
        if !insight.improvement_suggestions.is_empty() {
            let _ = write!(
                hints,
                "; users asked for: {}",
                insight.improvement_suggestions.join("; ")
            );
        }
        hints.push('\n');
    }
    Some(hints)
}

#[cfg(test)]
#[path = "relevance_test.rs"]
mod tests;
