//! # Retry Policy
//!
//! Exponential backoff for transient submission failures.
//!
//! Message submission rides on the counterparty's HTTP availability, so
//! the submission worker wraps each send in [`execute_with_retry`].
//! Jitter desynchronizes workers that queued their messages at the same
//! moment.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::application::services::retry::{execute_with_retry, RetryPolicy};
//! use pfi_exchange::infrastructure::gateway::GatewayError;
//!
//! # async fn example() {
//! let policy = RetryPolicy::default();
//! let result: Result<&str, _> = execute_with_retry(&policy, || async {
//!     Err::<&str, _>(GatewayError::timeout("request timed out"))
//! })
//! .await;
//! assert!(result.is_err());
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::RngExt;
use tokio::time::sleep;

use crate::infrastructure::gateway::GatewayError;

/// Trait for errors that can indicate whether they are retryable.
pub trait Retryable {
    /// Returns true if the error is transient and the operation should
    /// be retried.
    fn is_retryable(&self) -> bool;
}

impl Retryable for GatewayError {
    fn is_retryable(&self) -> bool {
        GatewayError::is_retryable(self)
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempt budget for transient failures; 0 means a single attempt
    /// with no retries.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Delay cap, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier applied per attempt.
    pub backoff_multiplier: f64,
    /// Jitter factor in `[0.0, 1.0]`, shaving a random share off each
    /// delay.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy with custom parameters.
    ///
    /// The jitter factor is clamped into `[0.0, 1.0]`.
    #[must_use]
    pub fn new(
        max_retries: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        backoff_multiplier: f64,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            max_delay_ms,
            backoff_multiplier,
            jitter_factor: jitter_factor.clamp(0.0, 1.0),
        }
    }

    /// Creates a policy that fails on the first error.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Creates a policy with more attempts and shorter delays.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 50,
            max_delay_ms: 5_000,
            backoff_multiplier: 1.5,
            jitter_factor: 0.2,
        }
    }

    /// Creates a policy with fewer attempts and longer delays.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 3.0,
            jitter_factor: 0.1,
        }
    }

    /// Calculates the backoff delay for a 0-indexed retry attempt.
    ///
    /// `min(initial_delay * multiplier ^ attempt, max_delay)`.
    #[must_use]
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(base.min(self.max_delay_ms as f64) as u64)
    }

    /// Calculates the backoff delay with jitter applied.
    ///
    /// Jitter shortens the delay: `delay * (1 - jitter_factor * random())`.
    #[must_use]
    pub fn calculate_delay_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.calculate_delay(attempt);
        if self.jitter_factor <= 0.0 {
            return base;
        }

        let mut rng = rand::rng();
        let jitter: f64 = rng.random();
        let scaled = base.as_millis() as f64 * (1.0 - self.jitter_factor * jitter);
        Duration::from_millis(scaled.max(1.0) as u64)
    }

    /// Returns true if another attempt is allowed after `attempts_made`.
    #[must_use]
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_retries
    }
}

/// Error returned when retry execution fails.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All retry attempts were exhausted.
    MaxRetriesExceeded {
        /// The last error encountered.
        last_error: E,
        /// Total number of attempts made.
        attempts: u32,
    },
    /// The error was marked as non-retryable.
    NonRetryable {
        /// The non-retryable error.
        error: E,
        /// Number of attempts made before the terminal error.
        attempts: u32,
    },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxRetriesExceeded {
                last_error,
                attempts,
            } => write!(
                f,
                "max retries exceeded after {attempts} attempts: {last_error}"
            ),
            Self::NonRetryable { error, attempts } => {
                write!(f, "non-retryable error after {attempts} attempts: {error}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

impl<E> RetryError<E> {
    /// Returns the underlying error.
    #[must_use]
    pub fn into_inner(self) -> E {
        match self {
            Self::MaxRetriesExceeded { last_error, .. } => last_error,
            Self::NonRetryable { error, .. } => error,
        }
    }

    /// Returns a reference to the underlying error.
    #[must_use]
    pub fn inner(&self) -> &E {
        match self {
            Self::MaxRetriesExceeded { last_error, .. } => last_error,
            Self::NonRetryable { error, .. } => error,
        }
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::MaxRetriesExceeded { attempts, .. } | Self::NonRetryable { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Returns true if every allowed attempt was used up.
    #[must_use]
    pub fn is_max_retries_exceeded(&self) -> bool {
        matches!(self, Self::MaxRetriesExceeded { .. })
    }

    /// Returns true if a terminal error cut the attempts short.
    #[must_use]
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, Self::NonRetryable { .. })
    }
}

/// Executes an async operation, retrying transient failures per
/// `policy`.
///
/// # Errors
///
/// Returns [`RetryError::MaxRetriesExceeded`] once the attempt budget
/// is spent, or [`RetryError::NonRetryable`] as soon as the operation
/// reports a terminal error.
pub async fn execute_with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
{
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !error.is_retryable() {
                    return Err(RetryError::NonRetryable { error, attempts });
                }

                if !policy.should_retry(attempts) {
                    return Err(RetryError::MaxRetriesExceeded {
                        last_error: error,
                        attempts,
                    });
                }

                // attempts is 1-indexed, delay schedule is 0-indexed
                let delay = policy.calculate_delay_with_jitter(attempts.saturating_sub(1));
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, Clone)]
    struct TestError {
        retryable: bool,
        message: String,
    }

    impl TestError {
        fn transient(msg: &str) -> Self {
            Self {
                retryable: true,
                message: msg.to_string(),
            }
        }

        fn terminal(msg: &str) -> Self {
            Self {
                retryable: false,
                message: msg.to_string(),
            }
        }
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 10,
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn default_policy_values() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay_ms, 100);
        assert_eq!(policy.max_delay_ms, 10_000);
    }

    #[test]
    fn no_retry_allows_single_attempt() {
        let policy = RetryPolicy::no_retry();

        assert_eq!(policy.max_retries, 0);
        assert!(!policy.should_retry(0));
    }

    #[test]
    fn preset_profiles() {
        let aggressive = RetryPolicy::aggressive();
        assert_eq!(aggressive.max_retries, 5);
        assert_eq!(aggressive.initial_delay_ms, 50);

        let conservative = RetryPolicy::conservative();
        assert_eq!(conservative.max_retries, 2);
        assert_eq!(conservative.initial_delay_ms, 500);
    }

    #[test]
    fn new_clamps_jitter_factor() {
        assert!((RetryPolicy::new(3, 100, 1000, 2.0, 1.5).jitter_factor - 1.0).abs() < f64::EPSILON);
        assert!(RetryPolicy::new(3, 100, 1000, 2.0, -0.5).jitter_factor.abs() < f64::EPSILON);
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(5, 100, 10_000, 2.0, 0.0);

        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(400));
    }

    #[test]
    fn delay_respects_cap() {
        let policy = RetryPolicy::new(10, 1000, 5000, 2.0, 0.0);

        assert_eq!(policy.calculate_delay(3), Duration::from_millis(5000));
        assert_eq!(policy.calculate_delay(10), Duration::from_millis(5000));
    }

    #[test]
    fn jitter_only_shortens_delay() {
        let policy = RetryPolicy::new(3, 1000, 10_000, 2.0, 0.5);

        for _ in 0..10 {
            let delay = policy.calculate_delay_with_jitter(0);
            assert!(delay <= Duration::from_millis(1000));
            assert!(delay >= Duration::from_millis(500));
        }
    }

    #[test]
    fn should_retry_boundary() {
        let policy = fast_policy(3);

        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn gateway_errors_drive_retryability() {
        assert!(Retryable::is_retryable(&GatewayError::timeout(
            "request timed out"
        )));
        assert!(Retryable::is_retryable(&GatewayError::connection(
            "connection refused"
        )));
        assert!(!Retryable::is_retryable(&GatewayError::rejected(
            "requirements not met"
        )));
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result: Result<&str, RetryError<TestError>> =
            execute_with_retry(&fast_policy(3), || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok("success") }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result: Result<&str, RetryError<TestError>> =
            execute_with_retry(&fast_policy(5), || {
                let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if current < 3 {
                        Err(TestError::transient("transient failure"))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempt_budget() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result: Result<&str, RetryError<TestError>> =
            execute_with_retry(&fast_policy(3), || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError::transient("always fails")) }
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_max_retries_exceeded());
        // initial attempt plus two retries before should_retry(3) denies
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.inner().message, "always fails");
    }

    #[tokio::test]
    async fn stops_on_terminal_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result: Result<&str, RetryError<TestError>> =
            execute_with_retry(&fast_policy(5), || {
                let current = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if current < 2 {
                        Err(TestError::transient("transient"))
                    } else {
                        Err(TestError::terminal("permanent failure"))
                    }
                }
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_non_retryable());
        assert_eq!(err.attempts(), 2);
    }

    #[tokio::test]
    async fn no_retry_policy_makes_single_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let result: Result<&str, RetryError<TestError>> =
            execute_with_retry(&RetryPolicy::no_retry(), || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError::transient("fails")) }
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_max_retries_exceeded());
        assert_eq!(err.attempts(), 1);
    }

    #[test]
    fn display_names_attempt_count() {
        let err: RetryError<TestError> = RetryError::MaxRetriesExceeded {
            last_error: TestError::transient("timeout"),
            attempts: 4,
        };
        assert!(err.to_string().contains("4 attempts"));

        let err: RetryError<TestError> = RetryError::NonRetryable {
            error: TestError::terminal("auth failed"),
            attempts: 2,
        };
        assert!(err.to_string().contains("non-retryable"));
    }

    #[test]
    fn into_inner_surfaces_last_error() {
        let err: RetryError<TestError> = RetryError::MaxRetriesExceeded {
            last_error: TestError::transient("timeout"),
            attempts: 3,
        };
        assert_eq!(err.into_inner().message, "timeout");
    }
}
