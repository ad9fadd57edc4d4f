//! Retry policy with configurable backoff, independent of what is retried.
//!
//! A failed attempt is classified into a [`FailureType`]. The [`RetryPolicy`]
//! then decides, from the failure type and the attempt count, whether to try
//! again and after how long. [`RetryPolicy::run`] drives an async operation
//! through that loop.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use social_hub_core::storage::{FailureType, RetryDecision, RetryPolicy};
//!
//! let policy = RetryPolicy::default();
//! match policy.should_retry(FailureType::Transient, 1) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         assert_eq!(delay, Duration::from_secs(1));
//!         assert_eq!(attempt, 2);
//!     }
//!     RetryDecision::DoNotRetry { reason } => panic!("{reason}"),
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::{debug, instrument};

/// Default maximum attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay (1 second).
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Classification of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// May succeed on retry (failed write, failed read-back).
    Transient,

    /// Will not succeed on retry (quota exhausted, bad input).
    Permanent,
}

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// `base_delay * attempt`
    Linear,

    /// `min(base_delay * multiplier^(attempt - 1), max_delay)`
    Exponential { multiplier: f64, max_delay: Duration },
}

/// Decision on whether to retry a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry {
        delay: Duration,
        /// Which attempt this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Give up.
    DoNotRetry { reason: String },
}

/// The last error from a retried operation that did not succeed.
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub error: E,
    /// Attempts actually made.
    pub attempts: u32,
    pub failure_type: FailureType,
}

/// Retry configuration.
///
/// # Default Values
///
/// - `max_attempts`: 3
/// - `base_delay`: 1 second
/// - `backoff`: [`Backoff::Linear`] (1s, 2s)
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff,
        }
    }

    /// Linear backoff: `base_delay * attempt`.
    #[must_use]
    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self::new(max_attempts, base_delay, Backoff::Linear)
    }

    /// Default policy with a custom attempt count.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    #[must_use]
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Decides whether to retry after `attempt` (1-indexed) failed.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.delay_for(attempt);
        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    /// Delay to wait after `attempt` (1-indexed) failed.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff {
            Backoff::Linear => self
                .base_delay
                .checked_mul(attempt)
                .unwrap_or(Duration::MAX),
            Backoff::Exponential {
                multiplier,
                max_delay,
            } => {
                let base_ms = self.base_delay.as_millis() as f64;
                let delay_ms = base_ms * multiplier.powi((attempt - 1) as i32);
                let capped_ms = delay_ms.min(max_delay.as_millis() as f64).max(0.0);
                Duration::from_millis(capped_ms as u64)
            }
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or attempts
    /// run out. `classify` decides whether an error is worth retrying.
    ///
    /// `operation` receives the 1-indexed attempt number.
    ///
    /// # Errors
    ///
    /// Returns the last error together with the number of attempts made.
    pub async fn run<T, E, F, Fut, C>(
        &self,
        mut operation: F,
        classify: C,
    ) -> Result<T, RetryFailure<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> FailureType,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let failure_type = classify(&error);
                    match self.should_retry(failure_type, attempt) {
                        RetryDecision::Retry {
                            delay,
                            attempt: next,
                        } => {
                            tokio::time::sleep(delay).await;
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(attempt, %reason, "giving up");
                            return Err(RetryFailure {
                                error,
                                attempts: attempt,
                                failure_type,
                            });
                        }
                    }
                }
            }
        }
    }
}
