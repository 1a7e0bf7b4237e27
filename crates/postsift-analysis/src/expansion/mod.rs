//! Query expansion: raw query to six labeled focus areas plus the custom slot.

mod templates;

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::context::StageContext;
use crate::error::AnalysisError;
use crate::extract::parse_json_response;
use crate::oracle::{GenerateOptions, ModelProfile, Oracle};
use crate::retry::retry_with_policy;
use crate::types::{FocusArea, FocusCategory};

pub use templates::fallback_focus_areas;

/// Generated focus areas per expansion, excluding the custom slot.
pub const GENERATED_FOCUS_AREAS: usize = 6;

const EXPANSION_TEMPERATURE: f32 = 0.7;

/// Expand `query` into focus areas.
///
/// Asks the oracle for six focus areas, retrying per the configured policy.
/// If every attempt fails, the keyword template bank is used instead and
/// every returned entry, the custom slot included, is marked as a fallback.
/// The custom slot echoing `query` is always appended last.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the request is cancelled. No
/// other failure escapes.
pub async fn expand_query<O: Oracle>(
    ctx: &StageContext<'_, O>,
    query: &str,
) -> Result<Vec<FocusArea>, AnalysisError> {
    let prompt = expansion_prompt(query);
    let options = GenerateOptions::new(ModelProfile::Analysis, EXPANSION_TEMPERATURE);

    let outcome = retry_with_policy(&ctx.settings.expansion_retry, ctx.cancel, |attempt| {
        let prompt = prompt.as_str();
        async move {
            tracing::debug!(attempt, "requesting focus areas");
            let raw = ctx.call(prompt, &options).await?;
            let value = parse_json_response(&raw)?;
            focus_areas_from_value(&value)
        }
    })
    .await;

    let mut custom = FocusArea::custom(query);
    let mut areas = match outcome {
        Ok(areas) => areas,
        Err(err) if err.is_cancelled() => return Err(err),
        Err(err) => {
            tracing::warn!(
                query,
                error = %err,
                "query expansion exhausted its attempts, using template focus areas"
            );
            custom.is_fallback = true;
            fallback_focus_areas(query)
        }
    };

    areas.push(custom);
    Ok(areas)
}

fn expansion_prompt(query: &str) -> String {
    format!(
        r#"You help a researcher explore social media conversations about a topic.

Topic: "{query}"

Suggest exactly {GENERATED_FOCUS_AREAS} distinct focus areas for searching posts about this topic.
Each focus area is a JSON object with these fields:
- "title": a short label (2-5 words)
- "description": one sentence on what posts in this area discuss
- "expandedQuery": a search query of 3-8 words
- "category": one of "problems", "experiences", "questions", "success", "tools", "trends"

Use each category once. Respond with only a JSON array of {GENERATED_FOCUS_AREAS} objects and no other text."#
    )
}

/// Validate an oracle answer into exactly [`GENERATED_FOCUS_AREAS`] entries.
///
/// Entries missing a required string field are dropped, as are repeats of an
/// earlier entry's `expandedQuery` (case-insensitive). When between one and
/// five survive, the last survivor is cloned with an "(Alternate)" title
/// suffix until six are present.
fn focus_areas_from_value(value: &Value) -> Result<Vec<FocusArea>, AnalysisError> {
    let items = value
        .as_array()
        .or_else(|| value.get("focusAreas").and_then(Value::as_array))
        .ok_or_else(|| AnalysisError::Validation("expected a JSON array of focus areas".to_string()))?;

    if items.is_empty() {
        return Err(AnalysisError::Validation("focus area array is empty".to_string()));
    }

    let mut seen = HashSet::new();
    let mut areas: Vec<FocusArea> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(parse_entry)
        .filter(|(area, _)| seen.insert(area.expanded_query.to_lowercase()))
        .take(GENERATED_FOCUS_AREAS)
        .enumerate()
        .map(|(position, (mut area, labeled))| {
            if labeled.is_none() {
                area.category = FocusCategory::GENERATED[position % GENERATED_FOCUS_AREAS];
            }
            area
        })
        .collect();

    let Some(last) = areas.last().cloned() else {
        return Err(AnalysisError::Validation(format!(
            "none of {} focus areas had title, description and expandedQuery",
            items.len()
        )));
    };

    let valid = areas.len();
    for n in 1..=GENERATED_FOCUS_AREAS.saturating_sub(valid) {
        let suffix = if n == 1 {
            "(Alternate)".to_string()
        } else {
            format!("(Alternate {n})")
        };
        let mut clone = last.clone();
        clone.title = format!("{} {suffix}", last.title);
        areas.push(clone);
    }
    if valid < GENERATED_FOCUS_AREAS {
        tracing::debug!(valid, "padded focus areas with alternates");
    }

    Ok(areas)
}

/// Parse one entry. The second element is the recognized category label, if any.
fn parse_entry(object: &Map<String, Value>) -> Option<(FocusArea, Option<FocusCategory>)> {
    let title = required_str(object, &["title"])?;
    let description = required_str(object, &["description"])?;
    let expanded_query = required_str(object, &["expandedQuery", "expanded_query"])?;
    let category = object
        .get("category")
        .and_then(Value::as_str)
        .and_then(FocusCategory::from_label)
        .filter(|c| *c != FocusCategory::Custom);

    let area = FocusArea {
        title,
        description,
        expanded_query,
        category: category.unwrap_or(FocusCategory::Problems),
        is_custom: false,
        is_fallback: false,
    };
    Some((area, category))
}

fn required_str(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| object.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "expansion_test.rs"]
mod tests;
