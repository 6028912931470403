//! Success reports and per-attempt events.

use std::time::Duration;

/// A successful retry, with the metadata of how it got there.
///
/// Returned by the `*_reported` family alongside [`RetryExhausted`](super::RetryExhausted)
/// on the failure side.
///
/// # Examples
///
/// ```rust
/// use ebbtide::{Retry, NoDelay};
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let mut calls = 0;
/// let retried = Retry::new(NonZeroU32::new(5).unwrap(), Duration::from_millis(10))
///     .run_reported(
///         || {
///             calls += 1;
///             if calls < 3 { Err("busy") } else { Ok(calls) }
///         },
///         NoDelay,
///     )
///     .unwrap();
///
/// assert_eq!(retried.attempts, 3);
/// assert_eq!(retried.total_delay, Duration::from_millis(30));
/// assert_eq!(retried.into_value(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    /// The value produced by the successful attempt.
    pub value: T,
    /// Total number of attempts made, including the successful one.
    pub attempts: u32,
    /// Sum of the delays waited before the successful attempt.
    pub total_delay: Duration,
}

impl<T> Retried<T> {
    /// Create a new success report.
    pub fn new(value: T, attempts: u32, total_delay: Duration) -> Self {
        Self {
            value,
            attempts,
            total_delay,
        }
    }

    /// Extract the value, discarding metadata.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Get a reference to the value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns true if no retry was needed.
    pub fn is_first_attempt(&self) -> bool {
        self.attempts <= 1
    }
}

/// Information about a failed attempt, passed to hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The attempt budget of the whole retry.
    pub max_attempts: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt, `None` if this was the last one.
    pub next_delay: Option<Duration>,
    /// Sum of the delays waited so far, not counting `next_delay`.
    pub total_delay: Duration,
}

impl<E> RetryEvent<'_, E> {
    /// Returns true if the retry gives up after this event.
    pub fn is_final(&self) -> bool {
        self.next_delay.is_none()
    }
}
