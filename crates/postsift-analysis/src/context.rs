//! Per-request stage context and pipeline tuning.

use std::time::Duration;

use postsift_core::AppConfig;
use tokio_util::sync::CancellationToken;

use crate::error::OracleError;
use crate::oracle::{call_oracle, GenerateOptions, Oracle};
use crate::retry::RetryPolicy;
use crate::sources::FeedbackSource;

/// Limits and policies shared by every stage.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub expansion_retry: RetryPolicy,
    /// Posts per relevance-filter prompt.
    pub filter_batch_size: usize,
    /// Pause between consecutive relevance batches.
    pub inter_batch_delay: Duration,
    /// Posts included in a focused-categorization prompt.
    pub focused_input_cap: usize,
    /// Maximum posts returned by focused categorization.
    pub focused_result_cap: usize,
    /// Fewer mapped posts than this yields a "no relevant content" signal.
    pub min_focused_results: usize,
    /// Posts included in a bulk-categorization prompt.
    pub bulk_input_cap: usize,
    /// Per-bucket cap of the keyword classifier.
    pub fallback_bucket_cap: usize,
    /// Characters of post content shown to the model.
    pub excerpt_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            expansion_retry: RetryPolicy::default(),
            filter_batch_size: 50,
            inter_batch_delay: Duration::from_secs(1),
            focused_input_cap: 200,
            focused_result_cap: 15,
            min_focused_results: 1,
            bulk_input_cap: 100,
            fallback_bucket_cap: 50,
            excerpt_chars: 280,
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            expansion_retry: RetryPolicy::from_app_config(config),
            filter_batch_size: config.filter_batch_size.max(1),
            inter_batch_delay: Duration::from_millis(config.inter_batch_delay_ms),
            ..Self::default()
        }
    }
}

/// Everything a stage needs for one request: the oracle, tuning, optional
/// feedback read model, and the request's cancellation token.
pub struct StageContext<'a, O> {
    pub oracle: &'a O,
    pub settings: &'a PipelineSettings,
    pub feedback: Option<&'a dyn FeedbackSource>,
    pub cancel: &'a CancellationToken,
}

impl<'a, O: Oracle> StageContext<'a, O> {
    #[must_use]
    pub fn new(oracle: &'a O, settings: &'a PipelineSettings, cancel: &'a CancellationToken) -> Self {
        Self {
            oracle,
            settings,
            feedback: None,
            cancel,
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: &'a dyn FeedbackSource) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// One cancellable oracle call.
    pub(crate) async fn call(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, OracleError> {
        call_oracle(self.oracle, prompt, options, self.cancel).await
    }
}
