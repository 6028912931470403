//! Capped exponential backoff schedule.
//!
//! Everything here is pure: a [`Backoff`] is plain data describing how long to
//! wait before each retry, and [`delay_for`] is the function it evaluates.
//! Nothing in this module sleeps.

use std::time::Duration;

/// Ceiling applied when none is configured: 100 seconds.
pub const DEFAULT_CEILING: Duration = Duration::from_millis(100_000);

/// Compute the wait after failed attempt `attempt` (0-indexed).
///
/// Returns `min(base * 2^attempt, ceiling)`. When `base * 2^attempt` does not
/// fit in a [`Duration`] the result saturates to `ceiling`, so the schedule
/// never wraps around to a shorter delay.
///
/// # Examples
///
/// ```rust
/// use ebbtide::backoff::{delay_for, DEFAULT_CEILING};
/// use std::time::Duration;
///
/// let base = Duration::from_millis(100);
/// assert_eq!(delay_for(base, 0, DEFAULT_CEILING), Duration::from_millis(100));
/// assert_eq!(delay_for(base, 3, DEFAULT_CEILING), Duration::from_millis(800));
///
/// // Far past the point where 2^attempt overflows
/// assert_eq!(delay_for(base, 200, DEFAULT_CEILING), DEFAULT_CEILING);
/// ```
pub fn delay_for(base: Duration, attempt: u32, ceiling: Duration) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| base.checked_mul(factor))
        .map_or(ceiling, |delay| delay.min(ceiling))
}

/// An exponential backoff schedule with a hard ceiling.
///
/// Delay before retry N = `min(base * 2^N, ceiling)`.
///
/// # Examples
///
/// ```rust
/// use ebbtide::Backoff;
/// use std::time::Duration;
///
/// let backoff = Backoff::new(Duration::from_millis(100))
///     .with_ceiling(Duration::from_millis(500));
///
/// assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
/// assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(200));
/// assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(400));
/// assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(500)); // capped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Backoff {
    base: Duration,
    #[cfg_attr(feature = "serde", serde(default = "default_ceiling"))]
    ceiling: Duration,
}

#[cfg(feature = "serde")]
fn default_ceiling() -> Duration {
    DEFAULT_CEILING
}

impl Backoff {
    /// Create a schedule starting at `base`, capped at [`DEFAULT_CEILING`].
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            ceiling: DEFAULT_CEILING,
        }
    }

    /// Set the maximum delay.
    ///
    /// Delays will never exceed this value however many attempts have failed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebbtide::Backoff;
    /// use std::time::Duration;
    ///
    /// let backoff = Backoff::new(Duration::from_secs(50))
    ///     .with_ceiling(Duration::from_secs(100));
    ///
    /// // 50s, 100s, 100s (capped from 200s)
    /// assert_eq!(backoff.delay_for_attempt(0), Duration::from_secs(50));
    /// assert_eq!(backoff.delay_for_attempt(1), Duration::from_secs(100));
    /// assert_eq!(backoff.delay_for_attempt(2), Duration::from_secs(100));
    /// ```
    pub fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Get the base delay.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Get the ceiling.
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// Calculate the delay after failed attempt N (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        delay_for(self.base, attempt, self.ceiling)
    }

    /// Iterate over the schedule, starting at attempt 0.
    ///
    /// The iterator is infinite; once the ceiling is reached it keeps
    /// yielding the ceiling.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebbtide::Backoff;
    /// use std::time::Duration;
    ///
    /// let delays: Vec<_> = Backoff::new(Duration::from_millis(100))
    ///     .delays()
    ///     .take(4)
    ///     .collect();
    ///
    /// assert_eq!(
    ///     delays,
    ///     [100, 200, 400, 800].map(Duration::from_millis).to_vec()
    /// );
    /// ```
    pub fn delays(&self) -> Delays {
        Delays {
            backoff: *self,
            attempt: 0,
        }
    }
}

/// Iterator over a [`Backoff`] schedule.
///
/// Created by [`Backoff::delays`].
#[derive(Debug, Clone)]
pub struct Delays {
    backoff: Backoff,
    attempt: u32,
}

impl Iterator for Delays {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.backoff.delay_for_attempt(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(delay)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
