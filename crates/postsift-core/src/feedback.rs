//! Historical rating feedback read model.
//!
//! Users rate past analysis results; the aggregated per-platform averages are
//! exported to a YAML file that the relevance filter consults for prompt
//! hints. The pipeline only ever reads this data.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::posts::Platform;
use crate::ConfigError;

/// Aggregated rating history for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingInsight {
    pub platform: Platform,
    /// Mean rating on a 1–5 scale.
    pub avg_rating: f64,
    pub total_ratings: u32,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
}

/// One row of the feedback file: the insight plus the query keyword it was
/// recorded for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub query: String,
    #[serde(flatten)]
    pub insight: RatingInsight,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackFile {
    #[serde(default)]
    pub insights: Vec<FeedbackEntry>,
}

impl FeedbackFile {
    /// Insights recorded for queries that overlap `query`.
    ///
    /// An entry matches when either query contains the other,
    /// case-insensitively. Returns `None` when nothing matches so callers can
    /// treat "no history" and "no feedback store" the same way.
    #[must_use]
    pub fn insights_for(&self, query: &str) -> Option<Vec<RatingInsight>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let matched: Vec<RatingInsight> = self
            .insights
            .iter()
            .filter(|entry| {
                let recorded = entry.query.trim().to_lowercase();
                needle.contains(&recorded) || recorded.contains(&needle)
            })
            .map(|entry| entry.insight.clone())
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(matched)
        }
    }
}

/// Load and validate the feedback read model from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feedback(path: &Path) -> Result<FeedbackFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let feedback: FeedbackFile = serde_yaml::from_str(&content)?;

    validate_feedback(&feedback)?;

    Ok(feedback)
}

fn validate_feedback(feedback: &FeedbackFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &feedback.insights {
        if entry.query.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feedback query must be non-empty".to_string(),
            ));
        }

        let rating = entry.insight.avg_rating;
        if !(1.0..=5.0).contains(&rating) {
            return Err(ConfigError::Validation(format!(
                "feedback for '{}' on {} has avg_rating {rating}; must be between 1 and 5",
                entry.query, entry.insight.platform
            )));
        }

        let key = (entry.query.trim().to_lowercase(), entry.insight.platform);
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate feedback entry for '{}' on {}",
                entry.query, entry.insight.platform
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
insights:
  - query: cold email
    platform: reddit
    avg_rating: 4.5
    total_ratings: 12
    improvement_suggestions:
      - more B2B founders
  - query: cold email
    platform: linkedin
    avg_rating: 2.1
    total_ratings: 7
  - query: houseplants
    platform: youtube
    avg_rating: 3.8
    total_ratings: 4
";

    #[test]
    fn parses_sample_file() {
        let file: FeedbackFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(file.insights.len(), 3);
        assert_eq!(file.insights[0].insight.platform, Platform::Reddit);
        assert_eq!(
            file.insights[0].insight.improvement_suggestions,
            vec!["more B2B founders".to_string()]
        );
        assert!(file.insights[1].insight.improvement_suggestions.is_empty());
        validate_feedback(&file).unwrap();
    }

    #[test]
    fn insights_for_matches_overlapping_queries() {
        let file: FeedbackFile = serde_yaml::from_str(SAMPLE).unwrap();
        let hits = file.insights_for("Cold Email templates").unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|i| i.platform != Platform::Youtube));
    }

    #[test]
    fn insights_for_returns_none_without_match() {
        let file: FeedbackFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(file.insights_for("kubernetes").is_none());
        assert!(file.insights_for("   ").is_none());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let yaml = "insights:\n  - query: q\n    platform: x\n    avg_rating: 7.0\n    total_ratings: 1\n";
        let file: FeedbackFile = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            validate_feedback(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_duplicate_query_platform_pair() {
        let yaml = "insights:\n  - query: q\n    platform: x\n    avg_rating: 3.0\n    total_ratings: 1\n  - query: Q\n    platform: x\n    avg_rating: 4.0\n    total_ratings: 2\n";
        let file: FeedbackFile = serde_yaml::from_str(yaml).unwrap();
        let err = validate_feedback(&file).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn empty_file_is_valid() {
        let file: FeedbackFile = serde_yaml::from_str("insights: []").unwrap();
        validate_feedback(&file).unwrap();
        assert!(file.insights_for("anything").is_none());
    }
}
