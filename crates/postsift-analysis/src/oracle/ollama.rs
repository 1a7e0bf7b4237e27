//! Ollama `/api/generate` client.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerateOptions, Oracle, OracleSettings};
use crate::error::{AnalysisError, OracleError};

/// HTTP client for a local Ollama server.
///
/// Resolves the model profile of each call to a configured model, context
/// window, and default token budget. Each call is a single non-streaming
/// request.
pub struct OllamaClient {
    client: Client,
    generate_url: String,
    tags_url: String,
    settings: OracleSettings,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    temperature: f32,
    max_tokens: u32,
    num_ctx: u32,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<serde_json::Value>,
}

impl OllamaClient {
    /// Create a new `OllamaClient`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::HttpClient`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: OracleSettings) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent("postsift/0.1 (analysis)")
            .build()?;

        let base = settings.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            generate_url: format!("{base}/api/generate"),
            tags_url: format!("{base}/api/tags"),
            settings,
        })
    }

    /// Probe the server's model listing.
    ///
    /// Returns the number of installed models.
    ///
    /// # Errors
    ///
    /// Returns the same error kinds as a generation call.
    pub async fn health_check(&self) -> Result<usize, OracleError> {
        let response = self
            .client
            .get(&self.tags_url)
            .send()
            .await
            .map_err(|e| classify(&self.tags_url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::BadStatus {
                status: status.as_u16(),
                message: None,
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|_| OracleError::MalformedResponse { field: "models" })?;
        Ok(tags.models.len())
    }

    async fn request(&self, prompt: &str, options: &GenerateOptions) -> Result<String, OracleError> {
        let profile = self.settings.profile(options.profile);
        let body = GenerateRequest {
            model: &profile.model,
            prompt,
            stream: false,
            options: RequestOptions {
                temperature: options.temperature,
                max_tokens: options.max_tokens.unwrap_or(profile.max_tokens),
                num_ctx: profile.num_ctx,
            },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.generate_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(&self.generate_url, &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify(&self.generate_url, &e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty());
            return Err(OracleError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: serde_json::Value = serde_json::from_str(&text)
            .map_err(|_| OracleError::MalformedResponse { field: "response" })?;
        let generated = payload
            .get("response")
            .and_then(serde_json::Value::as_str)
            .ok_or(OracleError::MalformedResponse { field: "response" })?;

        tracing::debug!(
            model = %profile.model,
            profile = %options.profile,
            prompt_chars = prompt.len(),
            response_chars = generated.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "oracle call completed"
        );

        Ok(generated.to_string())
    }
}

impl Oracle for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, OracleError> {
        self.request(prompt, options).await
    }
}

fn classify(url: &str, err: &reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout {
            url: url.to_string(),
        }
    } else {
        OracleError::Unavailable {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
