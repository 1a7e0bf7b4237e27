//! Language-model access.
//!
//! Stages talk to the model through the [`Oracle`] trait so tests can swap in
//! scripted doubles. [`OllamaClient`] is the production implementation.

mod ollama;

use std::future::Future;
use std::time::Duration;

use postsift_core::AppConfig;
use tokio_util::sync::CancellationToken;

use crate::error::OracleError;

pub use ollama::OllamaClient;

/// Model profile chosen per call.
///
/// `Analysis` is the small-context profile for short generative tasks
/// (expansion, query glosses); `Segregation` has the larger context window
/// needed to fit batches of posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProfile {
    Analysis,
    Segregation,
}

impl std::fmt::Display for ModelProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProfile::Analysis => write!(f, "analysis"),
            ModelProfile::Segregation => write!(f, "segregation"),
        }
    }
}

/// Per-call generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub profile: ModelProfile,
    /// Clamped to `[0.0, 1.0]` by [`GenerateOptions::new`].
    pub temperature: f32,
    /// Overrides the profile's default token budget when set.
    pub max_tokens: Option<u32>,
}

impl GenerateOptions {
    #[must_use]
    pub fn new(profile: ModelProfile, temperature: f32) -> Self {
        Self {
            profile,
            temperature: temperature.clamp(0.0, 1.0),
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Model identifier, context window, and default token budget of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
    pub model: String,
    pub num_ctx: u32,
    pub max_tokens: u32,
}

/// Connection settings for the inference endpoint.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub analysis: ProfileSettings,
    pub segregation: ProfileSettings,
}

impl OracleSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.ollama_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            analysis: ProfileSettings {
                model: config.analysis_model.clone(),
                num_ctx: config.analysis_num_ctx,
                max_tokens: config.analysis_max_tokens,
            },
            segregation: ProfileSettings {
                model: config.segregation_model.clone(),
                num_ctx: config.segregation_num_ctx,
                max_tokens: config.segregation_max_tokens,
            },
        }
    }

    #[must_use]
    pub fn profile(&self, profile: ModelProfile) -> &ProfileSettings {
        match profile {
            ModelProfile::Analysis => &self.analysis,
            ModelProfile::Segregation => &self.segregation,
        }
    }
}

/// A text generator that may fail or return garbage.
///
/// Implementations issue exactly one request per call and never retry;
/// retry policy belongs to the calling stage.
pub trait Oracle: Sync {
    fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;
}

/// Run one oracle call, abandoning it as soon as `cancel` fires.
///
/// Dropping the in-flight future aborts the underlying HTTP request.
///
/// # Errors
///
/// Returns the oracle's error, or [`OracleError::Cancelled`].
pub async fn call_oracle<O: Oracle>(
    oracle: &O,
    prompt: &str,
    options: &GenerateOptions,
    cancel: &CancellationToken,
) -> Result<String, OracleError> {
    if cancel.is_cancelled() {
        return Err(OracleError::Cancelled);
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(OracleError::Cancelled),
        result = oracle.generate(prompt, options) => result,
    }
}
