//! Error types for retry operations.

use std::time::Duration;

/// Error returned when all retry attempts are exhausted.
///
/// Wraps the error from the final attempt, untouched, together with how many
/// attempts were made and how long the loop waited between them. Only the
/// `*_reported` family returns this; [`retry`](crate::retry()) hands back the
/// bare final error.
///
/// # Examples
///
/// ```rust
/// use ebbtide::{retry_reported, NoDelay, RetryExhausted};
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let result = retry_reported(
///     || Err::<(), _>("always fails"),
///     NonZeroU32::new(3).unwrap(),
///     Duration::from_millis(100),
///     NoDelay,
/// );
///
/// match result {
///     Err(exhausted) => {
///         assert_eq!(exhausted.final_error, "always fails");
///         assert_eq!(exhausted.attempts, 3);
///         assert_eq!(exhausted.total_delay, Duration::from_millis(300));
///     }
///     Ok(_) => panic!("Expected failure"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// The error from the final attempt.
    pub final_error: E,
    /// Total number of attempts made.
    pub attempts: u32,
    /// Sum of the delays waited between attempts.
    pub total_delay: Duration,
}

impl<E> RetryExhausted<E> {
    /// Create a new RetryExhausted error.
    pub fn new(final_error: E, attempts: u32, total_delay: Duration) -> Self {
        Self {
            final_error,
            attempts,
            total_delay,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> E {
        self.final_error
    }

    /// Get a reference to the final error.
    pub fn error(&self) -> &E {
        &self.final_error
    }

    /// Returns true if the operation only got a single attempt.
    ///
    /// Distinguishes "failed once with a budget of one" from "kept failing
    /// after several tries", which the bare error cannot.
    pub fn is_first_attempt(&self) -> bool {
        self.attempts <= 1
    }

    /// Transform the final error, keeping the metadata.
    pub fn map_err<E2, F>(self, f: F) -> RetryExhausted<E2>
    where
        F: FnOnce(E) -> E2,
    {
        RetryExhausted {
            final_error: f(self.final_error),
            attempts: self.attempts,
            total_delay: self.total_delay,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "retry exhausted after {} attempts ({:?} waited): {}",
            self.attempts, self.total_delay, self.final_error
        )
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.final_error)
    }
}
