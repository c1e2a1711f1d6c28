//! Retrying assertions with polling.
//!
//! The UI renders asynchronously after every gesture, so each assertion is
//! polled until it passes or its timeout expires. Expiry is a hard failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::result::{E2eError, E2eResult};

/// Result of a single assertion check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionCheckResult {
    /// Assertion passed
    Pass,
    /// Assertion failed with message
    Fail(String),
}

impl AssertionCheckResult {
    /// Pass when `ok`, otherwise fail with the lazily built message
    pub fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail(message())
        }
    }

    /// Check if the result is a pass
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Check if the result is a fail
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total timeout duration
    pub timeout: Duration,
    /// Interval between retry attempts
    pub poll_interval: Duration,
    /// Maximum number of attempts (0 = unlimited within timeout)
    pub max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(4),
            poll_interval: Duration::from_millis(100),
            max_retries: 0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with timeout
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(100),
            max_retries: 0,
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set maximum attempts
    #[must_use]
    pub const fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    /// Short timeout, fast polling
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            timeout: Duration::from_millis(500),
            poll_interval: Duration::from_millis(50),
            max_retries: 0,
        }
    }

    /// Long timeout, slower polling (log pages, first load)
    #[must_use]
    pub const fn slow() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            max_retries: 0,
        }
    }
}

/// Result of a successful retry assertion
#[derive(Debug, Clone, Copy)]
pub struct RetryResult {
    /// Number of attempts before success
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

/// Details of an assertion that never passed
#[derive(Debug, Clone)]
pub struct RetryFailure {
    /// What was being asserted
    pub description: String,
    /// Last failure message
    pub message: String,
    /// Number of attempts made
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

impl fmt::Display for RetryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: failed after {} attempt(s) ({:.2}s): {}",
            self.description,
            self.attempts,
            self.duration.as_secs_f64(),
            self.message
        )
    }
}

impl From<RetryFailure> for E2eError {
    fn from(failure: RetryFailure) -> Self {
        Self::assertion(failure.to_string())
    }
}

/// Poll `check` until it passes or `config` gives up.
///
/// Errors returned by the check (a missing element, a detached page) are
/// treated as failed attempts, so they are retried as well.
pub async fn eventually<F, Fut>(
    config: &RetryConfig,
    description: &str,
    mut check: F,
) -> E2eResult<RetryResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<AssertionCheckResult>>,
{
    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;

        let message = match check().await {
            Ok(AssertionCheckResult::Pass) => {
                return Ok(RetryResult {
                    attempts,
                    duration: start.elapsed(),
                });
            }
            Ok(AssertionCheckResult::Fail(msg)) => msg,
            Err(e) => e.to_string(),
        };

        let out_of_time = start.elapsed() >= config.timeout;
        let out_of_attempts = config.max_retries > 0 && attempts >= config.max_retries;
        if out_of_time || out_of_attempts {
            let failure = RetryFailure {
                description: description.to_string(),
                message,
                attempts,
                duration: start.elapsed(),
            };
            tracing::warn!(%failure, "assertion gave up");
            return Err(failure.into());
        }

        tokio::time::sleep(config.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mod assertion_check_result {
        use super::*;

        #[test]
        fn test_pass() {
            let result = AssertionCheckResult::Pass;
            assert!(result.is_pass());
            assert!(!result.is_fail());
        }

        #[test]
        fn test_check_builds_message_lazily() {
            let result = AssertionCheckResult::check(false, || "nope".to_string());
            assert_eq!(result, AssertionCheckResult::Fail("nope".into()));
            assert!(AssertionCheckResult::check(true, || unreachable!()).is_pass());
        }
    }

    mod retry_config {
        use super::*;

        #[test]
        fn test_default() {
            let config = RetryConfig::default();
            assert_eq!(config.timeout, Duration::from_secs(4));
            assert_eq!(config.poll_interval, Duration::from_millis(100));
            assert_eq!(config.max_retries, 0);
        }

        #[test]
        fn test_builders() {
            let config = RetryConfig::new(Duration::from_secs(1))
                .with_poll_interval(Duration::from_millis(10))
                .with_max_retries(3);
            assert_eq!(config.timeout, Duration::from_secs(1));
            assert_eq!(config.poll_interval, Duration::from_millis(10));
            assert_eq!(config.max_retries, 3);
            assert!(RetryConfig::fast().timeout < RetryConfig::slow().timeout);
        }
    }

    mod eventually_tests {
        use super::*;

        #[tokio::test]
        async fn test_passes_after_retries() {
            let calls = AtomicUsize::new(0);
            let config = RetryConfig::fast().with_poll_interval(Duration::from_millis(1));
            let result = eventually(&config, "third time lucky", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(AssertionCheckResult::check(n >= 2, || format!("attempt {n}")))
                }
            })
            .await
            .unwrap();
            assert_eq!(result.attempts, 3);
        }

        #[tokio::test]
        async fn test_gives_up_with_last_message() {
            let config = RetryConfig::fast()
                .with_poll_interval(Duration::from_millis(1))
                .with_max_retries(2);
            let err = eventually(&config, "never", || async {
                Ok(AssertionCheckResult::Fail("still wrong".into()))
            })
            .await
            .unwrap_err();
            let text = err.to_string();
            assert!(text.contains("never"));
            assert!(text.contains("2 attempt(s)"));
            assert!(text.contains("still wrong"));
        }

        #[tokio::test]
        async fn test_errors_are_retried() {
            let calls = AtomicUsize::new(0);
            let config = RetryConfig::fast().with_poll_interval(Duration::from_millis(1));
            let result = eventually(&config, "element appears", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(E2eError::ElementNotFound {
                            selector: "#late".into(),
                        })
                    } else {
                        Ok(AssertionCheckResult::Pass)
                    }
                }
            })
            .await
            .unwrap();
            assert_eq!(result.attempts, 2);
        }
    }
}
