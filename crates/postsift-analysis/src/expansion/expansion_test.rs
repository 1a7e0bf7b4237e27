use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::context::StageContext;
use crate::testing::{fast_settings, ScriptedOracle};

fn six_areas() -> String {
    json!([
        {"title": "Desk Pain", "description": "Back pain at desks", "expandedQuery": "standing desk back pain", "category": "problems"},
        {"title": "Owner Stories", "description": "Stories", "expandedQuery": "standing desk review", "category": "experiences"},
        {"title": "Buyer Questions", "description": "Questions", "expandedQuery": "which standing desk", "category": "questions"},
        {"title": "Wins", "description": "Wins", "expandedQuery": "standing desk helped", "category": "success"},
        {"title": "Gear", "description": "Gear", "expandedQuery": "standing desk mat", "category": "tools"},
        {"title": "Trends", "description": "Trends", "expandedQuery": "walking pad desk", "category": "trends"}
    ])
    .to_string()
}

#[tokio::test]
async fn valid_answer_yields_six_plus_custom() {
    let oracle = ScriptedOracle::new().answer(format!("Sure! Here you go:\n```json\n{}\n```", six_areas()));
    let settings = fast_settings();
    let cancel = CancellationToken::new();
    let ctx = StageContext::new(&oracle, &settings, &cancel);

    let areas = expand_query(&ctx, "standing desks").await.unwrap();

    assert_eq!(areas.len(), 7);
    assert_eq!(areas[0].expanded_query, "standing desk back pain");
    assert!(areas[..6].iter().all(|a| !a.is_fallback && !a.is_custom));
    let custom = &areas[6];
    assert_eq!(custom.category, FocusCategory::Custom);
    assert!(custom.is_custom);
    assert_eq!(custom.expanded_query, "standing desks");
    assert_eq!(oracle.call_count(), 1);
    assert_eq!(oracle.options()[0].profile, ModelProfile::Analysis);
}

#[tokio::test]
async fn partial_answer_is_padded_with_alternates() {
    let answer = json!([
        {"title": "A", "description": "a", "expandedQuery": "qa"},
        {"title": "B", "description": "b", "expanded_query": "qb", "category": "weird"},
        {"title": "", "description": "dropped", "expandedQuery": "qc"},
        {"description": "no title", "expandedQuery": "qd"}
    ])
    .to_string();
    let oracle = ScriptedOracle::new().answer(answer);
    let settings = fast_settings();
    let cancel = CancellationToken::new();
    let ctx = StageContext::new(&oracle, &settings, &cancel);

    let areas = expand_query(&ctx, "q").await.unwrap();

    assert_eq!(areas.len(), 7);
    let titles: Vec<&str> = areas.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "A",
            "B",
            "B (Alternate)",
            "B (Alternate 2)",
            "B (Alternate 3)",
            "B (Alternate 4)",
            "Custom Search"
        ]
    );
    // unlabeled and unknown categories follow canonical order by position
    assert_eq!(areas[0].category, FocusCategory::Problems);
    assert_eq!(areas[1].category, FocusCategory::Experiences);
    assert_eq!(areas[2].expanded_query, "qb");
}

#[test]
fn repeated_queries_are_dropped_before_padding() {
    let value = json!([
        {"title": "Desk Pain", "description": "a", "expandedQuery": "standing desk back pain", "category": "problems"},
        {"title": "Desk Pain Again", "description": "b", "expandedQuery": "Standing Desk Back Pain", "category": "experiences"},
        {"title": "Gear", "description": "c", "expandedQuery": "standing desk mat", "category": "tools"}
    ]);

    let areas = focus_areas_from_value(&value).unwrap();

    assert_eq!(areas.len(), 6);
    assert!(areas.iter().all(|a| a.title != "Desk Pain Again"));
    assert_eq!(areas[1].title, "Gear");
    assert_eq!(areas[2].title, "Gear (Alternate)");
}

#[tokio::test]
async fn surplus_entries_are_truncated() {
    let mut items: Vec<serde_json::Value> = serde_json::from_str(&six_areas()).unwrap();
    items.push(json!({"title": "Extra", "description": "x", "expandedQuery": "x"}));
    let oracle = ScriptedOracle::new().answer(serde_json::Value::Array(items).to_string());
    let settings = fast_settings();
    let cancel = CancellationToken::new();
    let ctx = StageContext::new(&oracle, &settings, &cancel);

    let areas = expand_query(&ctx, "standing desks").await.unwrap();

    assert_eq!(areas.len(), 7);
    assert!(areas.iter().all(|a| a.title != "Extra"));
}

#[tokio::test]
async fn retries_until_a_valid_answer() {
    let oracle = ScriptedOracle::new()
        .fail()
        .answer("I cannot help with that.")
        .answer(six_areas());
    let settings = fast_settings();
    let cancel = CancellationToken::new();
    let ctx = StageContext::new(&oracle, &settings, &cancel);

    let areas = expand_query(&ctx, "standing desks").await.unwrap();

    assert_eq!(oracle.call_count(), 3);
    assert!(areas.iter().all(|a| !a.is_fallback));
}

#[tokio::test]
async fn exhausted_attempts_fall_back_to_templates() {
    let oracle = ScriptedOracle::new()
        .answer("[]")
        .answer(r#"[{"title": "only title"}]"#)
        .answer("{not json");
    let settings = fast_settings();
    let cancel = CancellationToken::new();
    let ctx = StageContext::new(&oracle, &settings, &cancel);

    let areas = expand_query(&ctx, "indoor plant care").await.unwrap();

    assert_eq!(oracle.call_count(), 3);
    assert_eq!(areas.len(), 6, "plant bank has five entries plus custom");
    assert!(areas.iter().all(|a| a.is_fallback));
    assert!(areas[5].is_custom);
    assert_eq!(areas[5].expanded_query, "indoor plant care");
}

#[tokio::test]
async fn cancellation_escapes_instead_of_falling_back() {
    let oracle = ScriptedOracle::new().answer(six_areas());
    let settings = fast_settings();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let ctx = StageContext::new(&oracle, &settings, &cancel);

    let result = expand_query(&ctx, "standing desks").await;

    assert!(matches!(result, Err(AnalysisError::Cancelled)));
    assert_eq!(oracle.call_count(), 0);
}

#[test]
fn object_wrapped_array_is_accepted() {
    let value = json!({"focusAreas": [{"title": "T", "description": "D", "expandedQuery": "Q", "category": "tools"}]});
    let areas = focus_areas_from_value(&value).unwrap();
    assert_eq!(areas.len(), 6);
    assert!(areas.iter().all(|a| a.category == FocusCategory::Tools));
}

#[test]
fn non_array_answer_is_a_validation_error() {
    let err = focus_areas_from_value(&json!({"title": "T"})).unwrap_err();
    assert!(matches!(err, AnalysisError::Validation(_)));
}

#[test]
fn prompt_names_the_query_and_shape() {
    let prompt = expansion_prompt("vegan protein");
    assert!(prompt.contains("\"vegan protein\""));
    assert!(prompt.contains("expandedQuery"));
    assert!(prompt.contains("exactly 6"));
}
