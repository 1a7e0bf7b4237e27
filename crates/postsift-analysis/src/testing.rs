//! Test doubles shared by the stage tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use postsift_core::{Platform, Post};

use crate::context::PipelineSettings;
use crate::error::OracleError;
use crate::oracle::{GenerateOptions, Oracle};
use crate::retry::{Backoff, RetryPolicy};

/// Oracle that replays a fixed script of answers and records every prompt.
///
/// Once the script runs out every call fails with `Unavailable`.
#[derive(Default)]
pub(crate) struct ScriptedOracle {
    script: Mutex<VecDeque<Result<String, OracleError>>>,
    calls: Mutex<Vec<(String, GenerateOptions)>>,
}

impl ScriptedOracle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn answer(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub(crate) fn fail(self) -> Self {
        self.push(Err(OracleError::BadStatus {
            status: 500,
            message: Some("scripted failure".to_string()),
        }))
    }

    fn push(self, entry: Result<String, OracleError>) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub(crate) fn options(&self) -> Vec<GenerateOptions> {
        self.calls.lock().unwrap().iter().map(|(_, o)| *o).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Oracle for ScriptedOracle {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, OracleError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), *options));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(OracleError::Unavailable {
                    url: "scripted".to_string(),
                    reason: "script exhausted".to_string(),
                })
            })
    }
}

/// Post `p{n}` with the given content and engagement.
pub(crate) fn post(n: usize, content: &str, engagement: f64) -> Post {
    Post {
        id: format!("p{n}"),
        content: content.to_string(),
        source: format!("user{n}"),
        platform: Platform::Reddit,
        engagement,
        timestamp: "2026-09-01T12:00:00Z".to_string(),
        url: format!("https://reddit.com/r/test/{n}"),
    }
}

/// `n` posts with neutral content and engagement 10.
pub(crate) fn posts(n: usize) -> Vec<Post> {
    (1..=n).map(|i| post(i, &format!("post number {i}"), 10.0)).collect()
}

pub(crate) fn ids(posts: &[Post]) -> Vec<String> {
    posts.iter().map(|p| p.id.clone()).collect()
}

/// Default settings with every retry and inter-batch delay removed.
pub(crate) fn fast_settings() -> PipelineSettings {
    PipelineSettings {
        expansion_retry: RetryPolicy::new(3, Backoff::None),
        inter_batch_delay: std::time::Duration::ZERO,
        ..PipelineSettings::default()
    }
}
