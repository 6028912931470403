//! The retry loop.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::backoff::Backoff;
use crate::delay::Delay;
use crate::retry::{Retried, RetryEvent, RetryExhausted};

/// A complete retry configuration: an attempt budget and a backoff schedule.
///
/// Like [`Backoff`], a `Retry` is pure data until one of the `run*` methods
/// hands it an operation and a [`Delay`]. It can be cloned, compared, and
/// reused for any number of independent runs.
///
/// # Examples
///
/// ```rust
/// use ebbtide::{Retry, NoDelay};
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let policy = Retry::new(NonZeroU32::new(3).unwrap(), Duration::from_millis(100))
///     .with_ceiling(Duration::from_secs(5));
///
/// assert_eq!(policy.delay_after(0), Some(Duration::from_millis(100)));
/// assert_eq!(policy.delay_after(1), Some(Duration::from_millis(200)));
/// assert_eq!(policy.delay_after(2), None); // last attempt, nothing to wait for
///
/// let result = policy.run(|| "parsed".parse::<u32>(), NoDelay);
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Retry {
    max_attempts: NonZeroU32,
    backoff: Backoff,
}

impl Retry {
    /// Create a retry with the given attempt budget and base delay.
    ///
    /// The ceiling defaults to [`DEFAULT_CEILING`](crate::backoff::DEFAULT_CEILING).
    pub fn new(max_attempts: NonZeroU32, base: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::new(base),
        }
    }

    /// Create a retry from a plain attempt count.
    ///
    /// Returns `None` for a budget of zero, which could never produce an
    /// outcome.
    ///
    /// ```rust
    /// use ebbtide::Retry;
    /// use std::time::Duration;
    ///
    /// assert!(Retry::from_attempts(3, Duration::from_millis(10)).is_some());
    /// assert!(Retry::from_attempts(0, Duration::from_millis(10)).is_none());
    /// ```
    pub fn from_attempts(max_attempts: u32, base: Duration) -> Option<Self> {
        NonZeroU32::new(max_attempts).map(|n| Self::new(n, base))
    }

    /// Set the maximum delay between attempts.
    pub fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.backoff = self.backoff.with_ceiling(ceiling);
        self
    }

    /// Replace the whole backoff schedule.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Get the attempt budget.
    pub fn max_attempts(&self) -> NonZeroU32 {
        self.max_attempts
    }

    /// Get the backoff schedule.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Calculate the wait after failed attempt N (0-indexed).
    ///
    /// Returns `None` when attempt N is the last one the budget allows: there
    /// is no trailing wait after the final failure.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts.get() {
            None
        } else {
            Some(self.backoff.delay_for_attempt(attempt))
        }
    }

    /// Run `operation` until it succeeds or the budget is spent.
    ///
    /// On success returns the value immediately, without consulting `delay`.
    /// On exhaustion returns the error of the last attempt, unchanged.
    pub fn run<T, E, F, D>(&self, operation: F, delay: D) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        D: Delay,
    {
        self.drive(operation, delay, |_| {})
            .map(Retried::into_value)
            .map_err(RetryExhausted::into_error)
    }

    /// Like [`run`](Self::run), but report attempts and total delay on both
    /// outcomes.
    pub fn run_reported<T, E, F, D>(
        &self,
        operation: F,
        delay: D,
    ) -> Result<Retried<T>, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
        D: Delay,
    {
        self.drive(operation, delay, |_| {})
    }

    /// Like [`run_reported`](Self::run_reported), calling `on_retry` after
    /// every failed attempt.
    ///
    /// The hook runs before the wait, and also after the final failure (with
    /// `next_delay: None`). It is synchronous; keep it to logging and metrics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebbtide::{Retry, NoDelay};
    /// use std::num::NonZeroU32;
    /// use std::time::Duration;
    ///
    /// let mut seen = Vec::new();
    /// let _ = Retry::new(NonZeroU32::new(3).unwrap(), Duration::from_millis(10))
    ///     .run_with_hooks(
    ///         || Err::<(), _>("timeout"),
    ///         NoDelay,
    ///         |event| seen.push((event.attempt, event.next_delay)),
    ///     );
    ///
    /// assert_eq!(
    ///     seen,
    ///     vec![
    ///         (1, Some(Duration::from_millis(10))),
    ///         (2, Some(Duration::from_millis(20))),
    ///         (3, None),
    ///     ]
    /// );
    /// ```
    pub fn run_with_hooks<T, E, F, D, H>(
        &self,
        operation: F,
        delay: D,
        on_retry: H,
    ) -> Result<Retried<T>, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
        D: Delay,
        H: FnMut(&RetryEvent<'_, E>),
    {
        self.drive(operation, delay, on_retry)
    }

    fn drive<T, E, F, D, H>(
        &self,
        mut operation: F,
        mut delay: D,
        mut on_retry: H,
    ) -> Result<Retried<T>, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
        D: Delay,
        H: FnMut(&RetryEvent<'_, E>),
    {
        let mut attempt = 0u32;
        let mut total_delay = Duration::ZERO;

        loop {
            match operation() {
                Ok(value) => {
                    log_success(attempt + 1, total_delay);
                    return Ok(Retried::new(value, attempt + 1, total_delay));
                }
                Err(error) => {
                    let next_delay = self.delay_after(attempt);

                    on_retry(&RetryEvent {
                        attempt: attempt + 1,
                        max_attempts: self.max_attempts.get(),
                        error: &error,
                        next_delay,
                        total_delay,
                    });

                    match next_delay {
                        Some(d) => {
                            log_retry(attempt + 1, self.max_attempts.get(), d);
                            delay.wait(d);
                            total_delay = total_delay.saturating_add(d);
                            attempt += 1;
                        }
                        None => {
                            log_exhausted(attempt + 1, total_delay);
                            return Err(RetryExhausted::new(error, attempt + 1, total_delay));
                        }
                    }
                }
            }
        }
    }
}

/// Retry `operation` up to `max_attempts` times with exponential backoff.
///
/// Waits `base_delay * 2^i` (capped at
/// [`DEFAULT_CEILING`](crate::backoff::DEFAULT_CEILING)) through `delay`
/// after failed attempt `i`, except after the last one. Returns the first
/// success, or the last error unchanged.
///
/// # Examples
///
/// ```rust
/// use ebbtide::retry;
/// use ebbtide::testing::RecordingDelay;
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let mut delay = RecordingDelay::new();
/// let result: Result<i32, String> = retry(
///     || Err("unavailable".to_string()),
///     NonZeroU32::new(3).unwrap(),
///     Duration::from_millis(100),
///     &mut delay,
/// );
///
/// assert_eq!(result, Err("unavailable".to_string()));
/// assert_eq!(delay.total(), Duration::from_millis(300)); // 100ms + 200ms
/// ```
pub fn retry<T, E, F, D>(
    operation: F,
    max_attempts: NonZeroU32,
    base_delay: Duration,
    delay: D,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    D: Delay,
{
    Retry::new(max_attempts, base_delay).run(operation, delay)
}

/// [`retry`] with attempt metadata on both outcomes.
pub fn retry_reported<T, E, F, D>(
    operation: F,
    max_attempts: NonZeroU32,
    base_delay: Duration,
    delay: D,
) -> Result<Retried<T>, RetryExhausted<E>>
where
    F: FnMut() -> Result<T, E>,
    D: Delay,
{
    Retry::new(max_attempts, base_delay).run_reported(operation, delay)
}

/// [`retry_reported`] with a hook called after every failed attempt.
///
/// See [`Retry::run_with_hooks`].
pub fn retry_with_hooks<T, E, F, D, H>(
    operation: F,
    max_attempts: NonZeroU32,
    base_delay: Duration,
    delay: D,
    on_retry: H,
) -> Result<Retried<T>, RetryExhausted<E>>
where
    F: FnMut() -> Result<T, E>,
    D: Delay,
    H: FnMut(&RetryEvent<'_, E>),
{
    Retry::new(max_attempts, base_delay).run_with_hooks(operation, delay, on_retry)
}

/// Whole milliseconds of `d`, clamped to `u64::MAX`.
pub(crate) fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn log_success(attempts: u32, total_delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        attempts,
        total_delay_ms = saturating_millis(total_delay),
        "operation succeeded"
    );
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn log_retry(attempt: u32, max_attempts: u32, delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        attempt,
        max_attempts,
        delay_ms = saturating_millis(delay),
        "attempt failed, retrying"
    );
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn log_exhausted(attempts: u32, total_delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        attempts,
        total_delay_ms = saturating_millis(total_delay),
        "retry exhausted"
    );
}
