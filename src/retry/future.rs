//! Async retry, for operations that return futures.
//!
//! Same loop and same guarantees as the blocking executor: attempts run one
//! after another, and the wait is awaited before the next attempt starts.
//! Feature-gated behind `#[cfg(feature = "async")]`.

use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::delay::NoDelay;
use crate::retry::executor::{log_exhausted, log_retry, log_success};
use crate::retry::{Retried, Retry, RetryEvent, RetryExhausted};

/// Something that can wait for a duration without blocking the thread.
pub trait AsyncDelay {
    /// Complete once `duration` has passed.
    fn wait(&mut self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Waits with [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokioDelay;

impl AsyncDelay for TokioDelay {
    fn wait(&mut self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

impl AsyncDelay for NoDelay {
    fn wait(&mut self, _duration: Duration) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

impl<D: AsyncDelay + ?Sized> AsyncDelay for &mut D {
    fn wait(&mut self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).wait(duration)
    }
}

impl Retry {
    /// Async version of [`run`](Self::run).
    ///
    /// `operation` is called once per attempt to build a fresh future.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebbtide::{Retry, TokioDelay};
    /// use std::num::NonZeroU32;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let policy = Retry::new(NonZeroU32::new(3).unwrap(), Duration::from_millis(1));
    ///
    /// let result = policy
    ///     .run_async(|| async { Ok::<_, String>(42) }, TokioDelay)
    ///     .await;
    ///
    /// assert_eq!(result, Ok(42));
    /// # });
    /// ```
    pub async fn run_async<T, E, F, Fut, D>(&self, operation: F, delay: D) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        D: AsyncDelay,
    {
        self.run_reported_async(operation, delay)
            .await
            .map(Retried::into_value)
            .map_err(RetryExhausted::into_error)
    }

    /// Async version of [`run_reported`](Self::run_reported).
    pub async fn run_reported_async<T, E, F, Fut, D>(
        &self,
        operation: F,
        delay: D,
    ) -> Result<Retried<T>, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        D: AsyncDelay,
    {
        self.run_with_hooks_async(operation, delay, |_| {}).await
    }

    /// Async version of [`run_with_hooks`](Self::run_with_hooks).
    ///
    /// The hook stays synchronous: it runs after every failed attempt, before
    /// the wait is awaited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ebbtide::{Retry, NoDelay};
    /// use std::num::NonZeroU32;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let mut finals = 0;
    /// let result = Retry::new(NonZeroU32::new(2).unwrap(), Duration::from_millis(1))
    ///     .run_with_hooks_async(
    ///         || async { Err::<(), _>("offline") },
    ///         NoDelay,
    ///         |event| {
    ///             if event.is_final() {
    ///                 finals += 1;
    ///             }
    ///         },
    ///     )
    ///     .await;
    ///
    /// assert!(result.is_err());
    /// assert_eq!(finals, 1);
    /// # });
    /// ```
    pub async fn run_with_hooks_async<T, E, F, Fut, D, H>(
        &self,
        mut operation: F,
        mut delay: D,
        mut on_retry: H,
    ) -> Result<Retried<T>, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        D: AsyncDelay,
        H: FnMut(&RetryEvent<'_, E>),
    {
        let mut attempt = 0u32;
        let mut total_delay = Duration::ZERO;

        loop {
            match operation().await {
                Ok(value) => {
                    log_success(attempt + 1, total_delay);
                    return Ok(Retried::new(value, attempt + 1, total_delay));
                }
                Err(error) => {
                    let next_delay = self.delay_after(attempt);

                    on_retry(&RetryEvent {
                        attempt: attempt + 1,
                        max_attempts: self.max_attempts().get(),
                        error: &error,
                        next_delay,
                        total_delay,
                    });

                    match next_delay {
                        Some(d) => {
                            log_retry(attempt + 1, self.max_attempts().get(), d);
                            delay.wait(d).await;
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

/// Async version of [`retry`](crate::retry()).
///
/// # Examples
///
/// ```rust
/// use ebbtide::retry_async;
/// use ebbtide::testing::RecordingDelay;
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let mut delay = RecordingDelay::new();
/// let result = retry_async(
///     || async { Err::<(), _>("refused") },
///     NonZeroU32::new(3).unwrap(),
///     Duration::from_millis(100),
///     &mut delay,
/// )
/// .await;
///
/// assert_eq!(result, Err("refused"));
/// assert_eq!(delay.count(), 2);
/// # });
/// ```
pub async fn retry_async<T, E, F, Fut, D>(
    operation: F,
    max_attempts: NonZeroU32,
    base_delay: Duration,
    delay: D,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    D: AsyncDelay,
{
    Retry::new(max_attempts, base_delay)
        .run_async(operation, delay)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDelay;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn attempts(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_retry_async_success() {
        let mut delay = RecordingDelay::new();
        let result = retry_async(
            || async { Ok::<_, String>(42) },
            attempts(3),
            Duration::from_millis(100),
            &mut delay,
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(delay.count(), 0);
    }

    #[tokio::test]
    async fn test_retry_async_succeeds_on_third_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut delay = RecordingDelay::new();

        let result = Retry::new(attempts(5), Duration::from_millis(10))
            .run_reported_async(
                || {
                    let calls = calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < 2 {
                            Err("transient failure")
                        } else {
                            Ok("success")
                        }
                    }
                },
                &mut delay,
            )
            .await
            .unwrap();

        assert_eq!(result.value, "success");
        assert_eq!(result.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            delay.calls(),
            &[Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[tokio::test]
    async fn test_retry_async_exhausted() {
        let mut delay = RecordingDelay::new();
        let result = Retry::new(attempts(4), Duration::from_millis(5))
            .run_reported_async(|| async { Err::<(), _>("always fails") }, &mut delay)
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.final_error, "always fails");
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.total_delay, Duration::from_millis(35));
        assert_eq!(delay.count(), 3);
    }

    #[tokio::test]
    async fn test_run_with_hooks_async_reports_each_failure() {
        let mut events = Vec::new();
        let mut delay = RecordingDelay::new();
        let mut calls = 0u32;

        let result = Retry::new(attempts(5), Duration::from_millis(10))
            .run_with_hooks_async(
                || {
                    calls += 1;
                    let n = calls;
                    async move {
                        if n < 3 {
                            Err("transient")
                        } else {
                            Ok(n)
                        }
                    }
                },
                &mut delay,
                |event| events.push((event.attempt, *event.error, event.next_delay)),
            )
            .await;

        assert_eq!(result.unwrap().into_value(), 3);
        assert_eq!(
            events,
            vec![
                (1, "transient", Some(Duration::from_millis(10))),
                (2, "transient", Some(Duration::from_millis(20))),
            ]
        );
        assert_eq!(delay.count(), 2);
    }

    #[tokio::test]
    async fn test_run_with_hooks_async_final_event() {
        let mut seen = Vec::new();

        let exhausted = Retry::new(attempts(3), Duration::from_millis(5))
            .run_with_hooks_async(
                || async { Err::<(), _>("down") },
                NoDelay,
                |event| seen.push((event.attempt, event.is_final(), event.total_delay)),
            )
            .await
            .unwrap_err();

        assert_eq!(exhausted.attempts, 3);
        assert_eq!(
            seen,
            vec![
                (1, false, Duration::ZERO),
                (2, false, Duration::from_millis(5)),
                (3, true, Duration::from_millis(15)),
            ]
        );
    }

    #[tokio::test]
    async fn test_tokio_delay_waits() {
        let start = std::time::Instant::now();
        let result = retry_async(
            || async { Err::<(), _>("no") },
            attempts(2),
            Duration::from_millis(20),
            TokioDelay,
        )
        .await;

        assert_eq!(result, Err("no"));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_no_delay_async() {
        let result = retry_async(
            || async { Err::<(), _>("no") },
            attempts(3),
            Duration::from_secs(3600),
            NoDelay,
        )
        .await;

        assert_eq!(result, Err("no"));
    }
}
