use super::*;

#[test]
fn bare_array_is_returned_unchanged() {
    assert_eq!(extract_json("[1, 2, 3]").as_deref(), Some("[1, 2, 3]"));
}

#[test]
fn prose_before_object_is_dropped() {
    let raw = r#"Sure! Here are the relevant posts: {"relevant": [1, 4, 7]}"#;
    assert_eq!(
        extract_json(raw).as_deref(),
        Some(r#"{"relevant": [1, 4, 7]}"#)
    );
}

#[test]
fn prose_after_json_is_dropped() {
    let raw = r#"{"relevant": [2]} Let me know if you need anything else."#;
    assert_eq!(extract_json(raw).as_deref(), Some(r#"{"relevant": [2]}"#));
}

#[test]
fn json_fence_is_stripped() {
    let raw = "```json\n[{\"title\": \"A\"}]\n```";
    assert_eq!(extract_json(raw).as_deref(), Some("[{\"title\": \"A\"}]"));
}

#[test]
fn bare_fence_with_prose_is_stripped() {
    let raw = "Here you go:\n```\n{\"painPoints\": [1], \"trendingIdeas\": [], \"contentIdeas\": [2]}\n```\nHope this helps";
    assert_eq!(
        extract_json(raw).as_deref(),
        Some("{\"painPoints\": [1], \"trendingIdeas\": [], \"contentIdeas\": [2]}")
    );
}

#[test]
fn nested_structures_are_matched_to_outer_bracket() {
    let raw = r#"[{"a": {"b": [1, {"c": 2}]}}, {"d": []}] trailing"#;
    assert_eq!(
        extract_json(raw).as_deref(),
        Some(r#"[{"a": {"b": [1, {"c": 2}]}}, {"d": []}]"#)
    );
}

#[test]
fn brackets_inside_strings_are_ignored() {
    let raw = r#"{"title": "Fixing [broken] } builds", "note": "say \"]\" twice"} extra ]"#;
    assert_eq!(
        extract_json(raw).as_deref(),
        Some(r#"{"title": "Fixing [broken] } builds", "note": "say \"]\" twice"}"#)
    );
}

#[test]
fn extra_trailing_bracket_yields_valid_prefix() {
    let raw = r#"{"relevant": [3, 5]}}"#;
    let extracted = extract_json(raw).unwrap();
    assert_eq!(extracted, r#"{"relevant": [3, 5]}"#);
    assert!(serde_json::from_str::<Value>(&extracted).is_ok());
}

#[test]
fn extra_trailing_array_bracket_yields_valid_prefix() {
    let raw = "[1, 2, 3]]";
    assert_eq!(extract_json(raw).as_deref(), Some("[1, 2, 3]"));
}

#[test]
fn truncated_json_returns_cleaned_text() {
    let raw = "```json\n{\"relevant\": [1, 2\n```";
    assert_eq!(extract_json(raw).as_deref(), Some("{\"relevant\": [1, 2"));
}

#[test]
fn mismatched_brackets_return_cleaned_text() {
    let raw = "Result: [1, 2}";
    assert_eq!(extract_json(raw).as_deref(), Some("Result: [1, 2}"));
}

#[test]
fn text_without_brackets_returns_none() {
    assert!(extract_json("I could not find any relevant posts.").is_none());
    assert!(extract_json("").is_none());
}

#[test]
fn object_before_array_wins_when_it_comes_first() {
    let raw = r#"{"relevant": [1]} and also [9, 9]"#;
    assert_eq!(extract_json(raw).as_deref(), Some(r#"{"relevant": [1]}"#));
}

#[test]
fn longest_parseable_prefix_shrinks_from_the_end() {
    assert_eq!(
        longest_parseable_prefix("[1, [2]] junk ] more }"),
        Some("[1, [2]]")
    );
    assert_eq!(longest_parseable_prefix("{\"a\": [1"), None);
}

#[test]
fn matching_close_reports_unbalanced_input() {
    assert_eq!(matching_close("[[1]"), None);
    assert_eq!(matching_close("[1]"), Some(2));
    assert_eq!(matching_close("{]"), None);
}

#[test]
fn parse_json_response_parses_extracted_value() {
    let value = parse_json_response("```json\n{\"relevant\": [1, 2]}\n```").unwrap();
    assert_eq!(value["relevant"][1], 2);
}

#[test]
fn parse_json_response_reports_extraction_failure() {
    let err = parse_json_response("nothing to see here").unwrap_err();
    assert!(matches!(err, AnalysisError::Extraction(_)));

    let err = parse_json_response("{\"relevant\": [1,").unwrap_err();
    assert!(matches!(err, AnalysisError::Extraction(_)));
}

#[test]
fn bracketed_prose_before_the_answer_is_skipped() {
    let raw = r#"Looking at posts [1-50], the relevant ones are: {"relevant": [2, 5]}"#;
    assert_eq!(
        extract_json(raw).as_deref(),
        Some(r#"{"relevant": [2, 5]}"#)
    );
}

#[test]
fn balanced_text_that_never_parses_is_returned_as_is() {
    let raw = "See section [a-b] for details";
    assert_eq!(extract_json(raw).as_deref(), Some("[a-b]"));
}
