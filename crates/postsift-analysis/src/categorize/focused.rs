use std::fmt::Write as _;

use postsift_core::Post;

use crate::context::StageContext;
use crate::error::AnalysisError;
use crate::extract::parse_json_response;
use crate::oracle::{GenerateOptions, ModelProfile, Oracle};
use crate::prompt::numbered_posts;
use crate::selection::{relevant_indices, select_by_indices};
use crate::types::{ContentCategory, FocusedOutcome, NoRelevantContent};

use super::CATEGORIZE_TEMPERATURE;

/// Pick the posts that best match `expanded_query` for one `category`.
///
/// Only the first `focused_input_cap` posts are shown to the oracle; the
/// answer's order is kept and capped at `focused_result_cap`. Fewer than
/// `min_focused_results` selected posts, or an oracle or parse failure,
/// yields [`FocusedOutcome::NoRelevantContent`].
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the request is cancelled.
pub async fn categorize_focused<O: Oracle>(
    ctx: &StageContext<'_, O>,
    posts: &[Post],
    expanded_query: &str,
    category: ContentCategory,
) -> Result<FocusedOutcome, AnalysisError> {
    let settings = ctx.settings;
    let input = &posts[..posts.len().min(settings.focused_input_cap)];
    if input.is_empty() {
        return Ok(no_relevant_content(expanded_query, category, 0, 0));
    }

    let selected = match select_focused(ctx, input, expanded_query, category).await {
        Ok(selected) => selected,
        Err(err) if err.is_cancelled() => return Err(err),
        Err(err) => {
            tracing::warn!(
                %category,
                posts = input.len(),
                error = %err,
                "focused categorization failed, reporting no relevant content"
            );
            return Ok(no_relevant_content(expanded_query, category, input.len(), 0));
        }
    };

    if selected.len() < settings.min_focused_results.max(1) {
        tracing::info!(%category, posts = input.len(), found = selected.len(), "no relevant content");
        return Ok(no_relevant_content(
            expanded_query,
            category,
            input.len(),
            selected.len(),
        ));
    }

    Ok(FocusedOutcome::Found { posts: selected })
}

async fn select_focused<O: Oracle>(
    ctx: &StageContext<'_, O>,
    input: &[Post],
    expanded_query: &str,
    category: ContentCategory,
) -> Result<Vec<Post>, AnalysisError> {
    let cap = ctx.settings.focused_result_cap;
    let prompt = focused_prompt(input, expanded_query, category, cap, ctx.settings.excerpt_chars);
    let options = GenerateOptions::new(ModelProfile::Segregation, CATEGORIZE_TEMPERATURE);
    let raw = ctx.call(&prompt, &options).await?;
    let value = parse_json_response(&raw)?;
    let indices = relevant_indices(&value)?;
    let mut selected = select_by_indices(input, &indices);
    selected.truncate(cap);
    Ok(selected)
}

fn instructions(category: ContentCategory) -> &'static str {
    match category {
        ContentCategory::PainPoints => {
            "Select posts where someone describes a problem, frustration, complaint or unmet need. \
             Prefer specific, first-hand pain over general negativity. Skip jokes and promotions."
        }
        ContentCategory::TrendingIdeas => {
            "Select posts about something new, growing or widely discussed: launches, shifts in \
             behavior, viral discussions and emerging opinions. Prefer posts with high engagement."
        }
        ContentCategory::ContentIdeas => {
            "Select posts that could inspire useful content: questions people keep asking, \
             how-to requests, personal stories, lessons learned and detailed reviews."
        }
    }
}

fn focused_prompt(
    input: &[Post],
    expanded_query: &str,
    category: ContentCategory,
    cap: usize,
    excerpt_chars: usize,
) -> String {
    let mut prompt = format!(
        "You are finding {} in social media posts about \"{expanded_query}\".\n\n",
        category.label()
    );
    let _ = write!(
        prompt,
        "Posts:\n{}\n{}\n\n\
         Respond with only JSON in this form: {{\"relevant\": [3, 1, 8]}}\n\
         listing at most {cap} post numbers, most relevant first. \
         Use {{\"relevant\": []}} if no post fits.",
        numbered_posts(input, excerpt_chars, None),
        instructions(category)
    );
    prompt
}

fn no_relevant_content(
    expanded_query: &str,
    category: ContentCategory,
    total_posts_analyzed: usize,
    relevant_posts_found: usize,
) -> FocusedOutcome {
    FocusedOutcome::NoRelevantContent(NoRelevantContent {
        message: format!(
            "No {} found for \"{expanded_query}\" in {total_posts_analyzed} posts. \
             Try a broader focus area or a longer time range.",
            category.label()
        ),
        category,
        total_posts_analyzed,
        relevant_posts_found,
    })
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::context::PipelineSettings;
    use crate::testing::{fast_settings, ids, posts, ScriptedOracle};

    #[tokio::test]
    async fn keeps_oracle_order_and_caps_results() {
        let answer = format!(
            "{{\"relevant\": [{}]}}",
            (1..=20).rev().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
        );
        let oracle = ScriptedOracle::new().answer(answer);
        let settings = fast_settings();
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let outcome = categorize_focused(&ctx, &posts(30), "desk pain", ContentCategory::PainPoints)
            .await
            .unwrap();

        let selected = outcome.posts();
        assert_eq!(selected.len(), 15);
        assert_eq!(selected[0].id, "p20");
        assert_eq!(selected[14].id, "p6");
    }

    #[tokio::test]
    async fn out_of_range_indices_mean_no_relevant_content() {
        let oracle = ScriptedOracle::new().answer(r#"{"relevant": [0, 11, 42]}"#);
        let settings = fast_settings();
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let outcome = categorize_focused(&ctx, &posts(10), "desk pain", ContentCategory::ContentIdeas)
            .await
            .unwrap();

        let FocusedOutcome::NoRelevantContent(signal) = outcome else {
            panic!("expected NoRelevantContent, got {outcome:?}");
        };
        assert_eq!(signal.category, ContentCategory::ContentIdeas);
        assert_eq!(signal.total_posts_analyzed, 10);
        assert_eq!(signal.relevant_posts_found, 0);
        assert!(signal.message.contains("content ideas"));
    }

    #[tokio::test]
    async fn oracle_failure_means_no_relevant_content() {
        let oracle = ScriptedOracle::new().fail();
        let settings = fast_settings();
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let outcome = categorize_focused(&ctx, &posts(3), "q", ContentCategory::TrendingIdeas)
            .await
            .unwrap();

        assert!(matches!(outcome, FocusedOutcome::NoRelevantContent(_)));
    }

    #[tokio::test]
    async fn input_is_capped_before_prompting() {
        let oracle = ScriptedOracle::new().answer(r#"{"relevant": [1]}"#);
        let settings = PipelineSettings {
            focused_input_cap: 5,
            ..fast_settings()
        };
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let outcome = categorize_focused(&ctx, &posts(12), "q", ContentCategory::PainPoints)
            .await
            .unwrap();

        assert_eq!(ids(outcome.posts()), vec!["p1"]);
        let prompt = &oracle.prompts()[0];
        assert!(prompt.contains("\n5. [reddit]"));
        assert!(!prompt.contains("\n6. [reddit]"));
        assert!(prompt.contains(instructions(ContentCategory::PainPoints)));
    }

    #[tokio::test]
    async fn empty_input_skips_the_oracle() {
        let oracle = ScriptedOracle::new();
        let settings = fast_settings();
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let outcome = categorize_focused(&ctx, &[], "q", ContentCategory::PainPoints)
            .await
            .unwrap();

        assert!(matches!(outcome, FocusedOutcome::NoRelevantContent(_)));
        assert_eq!(oracle.call_count(), 0);
    }
}
