//! Short semantic description of a query, shown to the filter model.

use crate::context::StageContext;
use crate::error::AnalysisError;
use crate::oracle::{GenerateOptions, ModelProfile, Oracle};

const GLOSS_TEMPERATURE: f32 = 0.3;
const GLOSS_MAX_TOKENS: u32 = 200;

/// Topic glosses keyed by trigger words. First match wins.
const STATIC_GLOSSES: &[(&[&str], &str)] = &[
    (
        &["sales", "marketing", "leads", "crm", "outreach", "advertising", "seo"],
        "selling, finding customers, running campaigns and measuring what converts",
    ),
    (
        &["plant", "plants", "houseplant", "houseplants", "garden", "gardening", "succulent", "succulents"],
        "growing, watering, feeding and keeping plants healthy",
    ),
    (
        &["fitness", "workout", "workouts", "gym", "running", "exercise", "training"],
        "exercise routines, training progress, equipment and staying motivated",
    ),
    (
        &["recipe", "recipes", "cooking", "baking", "meal", "meals", "diet", "vegan"],
        "preparing food, ingredients, recipes and eating habits",
    ),
    (
        &["software", "app", "apps", "saas", "startup", "startups", "coding", "developer"],
        "building, choosing and using software products",
    ),
    (
        &["money", "budget", "budgeting", "investing", "savings", "debt", "finance"],
        "managing personal money, saving, spending and investing",
    ),
];

/// Describe what posts relevant to `query` talk about.
///
/// Uses one oracle call; falls back to [`static_gloss`] when the call fails
/// or returns nothing usable.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the request is cancelled.
pub(crate) async fn query_gloss<O: Oracle>(
    ctx: &StageContext<'_, O>,
    query: &str,
) -> Result<String, AnalysisError> {
    let prompt = format!(
        "In two or three plain sentences, describe what a social media post that is genuinely \
         about \"{query}\" would discuss. Mention the typical subtopics and the kind of people \
         writing them. Do not use lists or JSON."
    );
    let options = GenerateOptions::new(ModelProfile::Analysis, GLOSS_TEMPERATURE)
        .with_max_tokens(GLOSS_MAX_TOKENS);

    match ctx.call(&prompt, &options).await {
        Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Ok(_) => {
            tracing::warn!(query, "query gloss was empty, using static gloss");
            Ok(static_gloss(query))
        }
        Err(err) => {
            let err = AnalysisError::from(err);
            if err.is_cancelled() {
                return Err(err);
            }
            tracing::warn!(query, error = %err, "query gloss failed, using static gloss");
            Ok(static_gloss(query))
        }
    }
}

/// Template gloss picked by keyword.
#[must_use]
pub(crate) fn static_gloss(query: &str) -> String {
    let lower = query.to_lowercase();
    let topic = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .find_map(|word| {
            STATIC_GLOSSES
                .iter()
                .find(|(triggers, _)| triggers.contains(&word))
                .map(|(_, gloss)| *gloss)
        });

    match topic {
        Some(gloss) => format!(
            "Posts about \"{query}\" discuss {gloss}. They mention the topic directly or describe \
             first-hand experience with it."
        ),
        None => format!(
            "Posts about \"{query}\" mention it directly and share problems, experiences, \
             questions or opinions about it."
        ),
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::testing::{fast_settings, ScriptedOracle};

    #[test]
    fn static_gloss_uses_topic_keywords() {
        let gloss = static_gloss("Best CRM for freelancers");
        assert!(gloss.contains("finding customers"), "got: {gloss}");
    }

    #[test]
    fn static_gloss_falls_back_to_generic_wording() {
        let gloss = static_gloss("mechanical keyboards");
        assert!(gloss.starts_with("Posts about \"mechanical keyboards\" mention it directly"));
    }

    #[tokio::test]
    async fn oracle_gloss_is_trimmed() {
        let oracle = ScriptedOracle::new().answer("  People comparing desks.\n");
        let settings = fast_settings();
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let gloss = query_gloss(&ctx, "standing desks").await.unwrap();

        assert_eq!(gloss, "People comparing desks.");
        let options = oracle.options()[0];
        assert_eq!(options.profile, ModelProfile::Analysis);
        assert_eq!(options.max_tokens, Some(GLOSS_MAX_TOKENS));
    }

    #[tokio::test]
    async fn failed_or_blank_gloss_uses_static_text() {
        let oracle = ScriptedOracle::new().fail().answer("   ");
        let settings = fast_settings();
        let cancel = CancellationToken::new();
        let ctx = StageContext::new(&oracle, &settings, &cancel);

        let first = query_gloss(&ctx, "garden pests").await.unwrap();
        let second = query_gloss(&ctx, "garden pests").await.unwrap();

        assert_eq!(first, static_gloss("garden pests"));
        assert_eq!(second, first);
    }
}
