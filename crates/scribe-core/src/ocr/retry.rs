//! Bounded retry with exponential backoff around the extraction call.
//!
//! Only [`OcrError::Api`] is retried. Every other error kind surfaces on the
//! attempt that produced it, and the final failure is returned unchanged.

use crate::config::{LimitsConfig, RetryConfig};
use crate::error::{OcrError, Result};
use std::future::Future;
use std::time::Duration;

/// Retry schedule: attempt cap, backoff curve, optional per-attempt timeout.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Scales the exponential curve
    pub multiplier: f64,
    /// One step of the curve (1s in production)
    pub unit: Duration,
    /// Floor applied to every wait
    pub min_delay: Duration,
    /// Ceiling applied to every wait
    pub max_delay: Duration,
    /// Upper bound on a single attempt
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default(), &LimitsConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(retry: &RetryConfig, limits: &LimitsConfig) -> Self {
        Self {
            max_attempts: retry.max_attempts,
            multiplier: retry.multiplier,
            unit: Duration::from_secs(1),
            min_delay: Duration::from_millis(retry.min_delay_ms),
            max_delay: Duration::from_millis(retry.max_delay_ms),
            attempt_timeout: Some(Duration::from_millis(limits.request_timeout_ms)),
        }
    }

    /// Wait before the attempt following failed attempt number `attempt` (1-based).
    ///
    /// `multiplier * unit * 2^(attempt-1)`, clamped to `[min_delay, max_delay]`.
    /// Each wait is computed on its own, not accumulated.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let secs = self.unit.as_secs_f64() * self.multiplier * 2f64.powi(exponent);
        // Out of range (overflow, NaN, negative) falls back to the ceiling
        let raw = Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay);
        raw.max(self.min_delay).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt cap is reached.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let outcome = match self.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, op()).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(OcrError::api(format!(
                        "Request timed out after {}ms",
                        limit.as_millis()
                    ))),
                },
                None => op().await,
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        "Attempt {attempt}/{max_attempts} failed: {e}. Retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_retryable() {
                        tracing::debug!("Giving up after {attempt} attempts");
                    }
                    return Err(e);
                }
            }
        }
    }
}
