//! Retry policy for oracle stages.
//!
//! [`retry_with_policy`] re-runs a fallible stage attempt (call, extract,
//! validate) until it succeeds or the attempt budget runs out. Every failure
//! is retried except cancellation, which stops immediately.

use std::future::Future;
use std::time::Duration;

use postsift_core::{AppConfig, BackoffKind};
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;

/// Delay inserted before each retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    None,
    Fixed(Duration),
    /// `base * 2^(retry - 1)`, capped at `max`, with ±25 % jitter.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => {
                let factor = 1u32 << retry.saturating_sub(1).min(16);
                let capped = base.saturating_mul(factor).min(max);
                capped.mul_f64(rand::random::<f64>() * 0.5 + 0.75)
            }
        }
    }
}

/// Attempt budget and backoff of a retrying stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Treated as at least 1.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    const MAX_EXPONENTIAL_DELAY: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let base = Duration::from_millis(config.retry_backoff_ms);
        let backoff = match config.retry_backoff {
            BackoffKind::None => Backoff::None,
            BackoffKind::Fixed => Backoff::Fixed(base),
            BackoffKind::Exponential => Backoff::Exponential {
                base,
                max: Self::MAX_EXPONENTIAL_DELAY,
            },
        };
        Self::new(config.expansion_max_attempts, backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Backoff::Fixed(Duration::from_secs(1)))
    }
}

/// Sleep for `delay` unless `cancel` fires first.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if the token is cancelled before the
/// delay elapses.
pub async fn pause(delay: Duration, cancel: &CancellationToken) -> Result<(), AnalysisError> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(AnalysisError::Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Run `operation` up to `policy.max_attempts` times.
///
/// The closure receives the 1-based attempt number. The last error is
/// returned once the budget is exhausted; [`AnalysisError::Cancelled`] is
/// returned immediately without further attempts.
///
/// # Errors
///
/// Returns the last attempt's error, or [`AnalysisError::Cancelled`].
pub async fn retry_with_policy<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, AnalysisError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AnalysisError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if err.is_cancelled() || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = policy.backoff.delay(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "oracle stage attempt failed, retrying"
                );
                pause(delay, cancel).await?;
                attempt += 1;
            }
        }
    }
}
