//! Retry policy for transient connection failures
//!
//! This module provides a composable retry decorator: any fallible async
//! operation whose error type can report "transient or not" can be wrapped
//! with a [`RetryPolicy`]. Only transient failures are retried; resource
//! and parse failures pass through untouched on the first attempt.

use crate::config::RetryConfig;
use crate::FetchError;
use std::future::Future;
use std::time::Duration;

/// Retry behavior for a single logical request
///
/// Backoff is multiplicative: the delay before retry `n` is
/// `initial_delay * backoff_multiplier^(n-1)`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Factor applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Creates a new retry policy
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts,
            initial_delay,
            backoff_multiplier,
        }
    }

    /// Returns the delay to sleep after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        self.initial_delay.mul_f64(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
        }
    }
}

/// Failure kinds a retry policy can inspect
pub trait RetryableError {
    /// Whether the failure is transient and worth retrying
    fn is_transient(&self) -> bool;
}

impl RetryableError for FetchError {
    fn is_transient(&self) -> bool {
        FetchError::is_transient(self)
    }
}

/// Runs a fallible async operation under a retry policy
///
/// The operation is attempted up to `policy.max_attempts` times. Transient
/// failures trigger a backoff sleep and another attempt; any other failure
/// is returned immediately. Exhausting all attempts returns the last
/// transient error.
///
/// # Arguments
///
/// * `policy` - The retry policy to apply
/// * `operation` - A closure producing one attempt per call
///
/// # Returns
///
/// * `Ok(T)` - The first successful attempt's value
/// * `Err(E)` - The first non-transient failure, or the last transient one
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: RetryableError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= policy.max_attempts {
                    return Err(err);
                }

                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    enum TestError {
        Flaky,
        Fatal,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TestError::Flaky => write!(f, "flaky"),
                TestError::Fatal => write!(f, "fatal"),
            }
        }
    }

    impl RetryableError for TestError {
        fn is_transient(&self) -> bool {
            matches!(self, TestError::Flaky)
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1), 1.0)
    }

    #[tokio::test]
    async fn test_succeeds_on_last_attempt() {
        let attempts = AtomicU32::new(0);
        let policy = fast_policy(3);

        let result: Result<&str, TestError> = with_retry(&policy, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(TestError::Flaky)
                } else {
                    Ok("body")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "body");
        // Exactly max_attempts attempts, no extra retry after success
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_not_retried() {
        let attempts = AtomicU32::new(0);
        let policy = fast_policy(5);

        let result: Result<(), TestError> = with_retry(&policy, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Fatal) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), TestError::Fatal));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error() {
        let attempts = AtomicU32::new(0);
        let policy = fast_policy(4);

        let result: Result<(), TestError> = with_retry(&policy, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Flaky) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), TestError::Flaky));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_never_sleeps() {
        let attempts = AtomicU32::new(0);
        let policy = fast_policy(1);

        let result: Result<(), TestError> = with_retry(&policy, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::Flaky) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_delays_multiply() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100), 2.0);

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_flat_backoff_with_unit_multiplier() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100), 1.0);

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(3), Duration::from_millis(100));
    }

    #[test]
    fn test_policy_from_config() {
        let config = RetryConfig {
            max_attempts: 7,
            initial_delay_ms: 500,
            backoff_multiplier: 3.0,
        };

        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.backoff_multiplier, 3.0);
    }
}
