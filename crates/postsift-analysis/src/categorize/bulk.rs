use postsift_core::Post;
use serde_json::Value;

use crate::context::StageContext;
use crate::error::AnalysisError;
use crate::extract::parse_json_response;
use crate::oracle::{GenerateOptions, ModelProfile, Oracle};
use crate::prompt::{mean_engagement, numbered_posts};
use crate::selection::{index_list, select_by_indices};
use crate::types::{CategorizedPosts, ContentCategory};

use super::CATEGORIZE_TEMPERATURE;

/// Split posts into pain points, trending ideas and content ideas in one call.
///
/// Only the first `bulk_input_cap` posts are shown. Posts above twice the
/// mean engagement are tagged `[HIGH ENGAGEMENT]` in the prompt.
///
/// # Errors
///
/// Returns the oracle, extraction or validation error so the caller can
/// substitute [`heuristic_categorize`](super::heuristic_categorize).
pub async fn categorize_all<O: Oracle>(
    ctx: &StageContext<'_, O>,
    posts: &[Post],
    query: &str,
) -> Result<CategorizedPosts, AnalysisError> {
    let input = &posts[..posts.len().min(ctx.settings.bulk_input_cap)];
    if input.is_empty() {
        return Ok(CategorizedPosts::default());
    }

    let high_engagement = 2.0 * mean_engagement(input);
    let prompt = bulk_prompt(input, query, high_engagement, ctx.settings.excerpt_chars);
    let options = GenerateOptions::new(ModelProfile::Segregation, CATEGORIZE_TEMPERATURE);

    let raw = ctx.call(&prompt, &options).await?;
    let value = parse_json_response(&raw)?;
    let result = categories_from_value(&value, input)?;

    tracing::debug!(
        posts = input.len(),
        pain_points = result.pain_points.len(),
        trending_ideas = result.trending_ideas.len(),
        content_ideas = result.content_ideas.len(),
        "bulk categorization parsed"
    );
    Ok(result)
}

fn bulk_prompt(input: &[Post], query: &str, high_engagement: f64, excerpt_chars: usize) -> String {
    format!(
        "Sort social media posts about \"{query}\" into three groups.\n\n\
         - painPoints: problems, frustrations, complaints and unmet needs\n\
         - trendingIdeas: new, growing or widely discussed topics; posts marked \
         [HIGH ENGAGEMENT] are strong candidates\n\
         - contentIdeas: questions, how-to requests, stories and lessons that could \
         inspire useful content\n\n\
         Posts:\n{}\n\
         Respond with only one JSON object of post numbers in this form:\n\
         {{\"painPoints\": [1, 4], \"trendingIdeas\": [2], \"contentIdeas\": [3, 5]}}\n\
         Leave a post out if it fits no group.",
        numbered_posts(input, excerpt_chars, Some(high_engagement))
    )
}

fn category_keys(category: ContentCategory) -> [&'static str; 2] {
    match category {
        ContentCategory::PainPoints => ["painPoints", "pain_points"],
        ContentCategory::TrendingIdeas => ["trendingIdeas", "trending_ideas"],
        ContentCategory::ContentIdeas => ["contentIdeas", "content_ideas"],
    }
}

/// Map the three index arrays onto `input`.
///
/// A missing key is an empty bucket; a key holding anything but an array,
/// or an object with none of the three keys, is a validation error.
fn categories_from_value(value: &Value, input: &[Post]) -> Result<CategorizedPosts, AnalysisError> {
    let object = value
        .as_object()
        .ok_or_else(|| AnalysisError::Validation("expected a JSON object of categories".to_string()))?;

    let mut result = CategorizedPosts::default();
    let mut found = 0;
    for category in ContentCategory::ALL {
        let Some(raw) = category_keys(category).iter().find_map(|k| object.get(*k)) else {
            continue;
        };
        let indices = index_list(raw).ok_or_else(|| {
            AnalysisError::Validation(format!("{} is not an index array", category_keys(category)[0]))
        })?;
        *result.get_mut(category) = select_by_indices(input, &indices);
        found += 1;
    }

    if found == 0 {
        return Err(AnalysisError::Validation(
            "response has none of painPoints, trendingIdeas, contentIdeas".to_string(),
        ));
    }
    Ok(result)
}
