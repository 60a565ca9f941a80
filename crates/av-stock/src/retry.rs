//! Bounded exponential backoff for Alpha Vantage requests
//!
//! Only [`StockError::is_retryable`] failures are retried. Provider error
//! messages and malformed payloads fail on the first attempt.

use crate::error::{Result, StockError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Hard cap on attempts, whatever the configuration says
pub const MAX_ATTEMPTS_CAP: u32 = 10;

/// How often and how patiently a fetch is repeated
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first (1 means no retries)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Ceiling for any single delay
    pub max_backoff: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_secs(10), 2.0)
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to `1..=MAX_ATTEMPTS_CAP`
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS_CAP),
            initial_backoff,
            max_backoff,
            backoff_multiplier: backoff_multiplier.max(1.0),
        }
    }

    /// Single attempt
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO, 1.0)
    }

    /// Delay after the `retry`-th failure (1-based); zero before any failure
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        let Some(exponent) = retry.checked_sub(1) else {
            return Duration::ZERO;
        };
        let factor = self
            .backoff_multiplier
            .powi(i32::try_from(exponent).unwrap_or(i32::MAX));

        let millis = self.initial_backoff.as_millis() as f64 * factor;
        if millis.is_finite() {
            Duration::from_millis(millis as u64).min(self.max_backoff)
        } else {
            self.max_backoff
        }
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of attempts
    pub async fn execute<F, Fut, T>(&self, operation: &str, mut attempt_fn: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.clamp(1, MAX_ATTEMPTS_CAP);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match attempt_fn().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                if attempt > 1 {
                    warn!(operation, attempt, error = %err, "giving up");
                }
                return Err(err);
            }

            let delay = self.backoff_duration(attempt);
            warn!(
                operation,
                attempt,
                max_attempts,
                error = %err,
                "retrying in {:?}",
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

impl StockError {
    /// Transient failures worth another attempt: HTTP 408/429, connect and timeout errors
    pub fn is_retryable(&self) -> bool {
        match self {
            StockError::HttpStatus { status } => matches!(status, 408 | 429),
            StockError::NetworkError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
