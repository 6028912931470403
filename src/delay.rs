//! Time abstraction for the retry loop.
//!
//! The executor never sleeps on its own; it asks a [`Delay`] to wait. Production
//! code passes [`ThreadDelay`], tests pass [`NoDelay`] or
//! [`RecordingDelay`](crate::testing::RecordingDelay) and run instantly.

use std::time::Duration;

/// Something that can wait for a duration.
///
/// `wait` must not return until the wait is over: the retry loop treats the
/// call as the whole pause between two attempts.
///
/// Closures become delays through [`from_fn`]:
///
/// ```rust
/// use ebbtide::{delay, retry};
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let mut waited = Vec::new();
/// let result: Result<(), &str> = retry(
///     || Err("down"),
///     NonZeroU32::new(3).unwrap(),
///     Duration::from_millis(10),
///     delay::from_fn(|d| waited.push(d)),
/// );
///
/// assert_eq!(result, Err("down"));
/// assert_eq!(waited, [Duration::from_millis(10), Duration::from_millis(20)]);
/// ```
pub trait Delay {
    /// Block until `duration` has passed.
    fn wait(&mut self, duration: Duration);
}

/// Sleeps the current thread with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately.
///
/// Useful when the operation paces itself, or in tests that only care about
/// outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn wait(&mut self, _duration: Duration) {}
}

/// A delay backed by a closure.
///
/// Created by [`from_fn`].
pub struct FnDelay<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnDelay<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDelay").finish_non_exhaustive()
    }
}

/// Wrap a closure as a [`Delay`].
///
/// The closure is called with every requested duration and decides itself
/// how (or whether) to wait.
pub fn from_fn<F>(f: F) -> FnDelay<F>
where
    F: FnMut(Duration),
{
    FnDelay { f }
}

impl<F> Delay for FnDelay<F>
where
    F: FnMut(Duration),
{
    fn wait(&mut self, duration: Duration) {
        (self.f)(duration)
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

impl<D: Delay + ?Sized> Delay for Box<D> {
    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_thread_delay_blocks() {
        let start = Instant::now();
        ThreadDelay.wait(Duration::from_millis(5));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_no_delay_returns_immediately() {
        let start = Instant::now();
        NoDelay.wait(Duration::from_secs(3600));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_boxed_delay_forwards() {
        let mut calls = 0;
        {
            let mut boxed: Box<dyn Delay + '_> = Box::new(from_fn(|_| calls += 1));
            boxed.wait(Duration::from_millis(1));
            boxed.wait(Duration::from_millis(2));
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_mut_ref_delay_forwards() {
        fn wait_twice(mut delay: impl Delay) {
            delay.wait(Duration::from_millis(1));
            delay.wait(Duration::from_millis(2));
        }

        let mut seen = Vec::new();
        let mut delay = from_fn(|d| seen.push(d));
        wait_twice(&mut delay);
        wait_twice(&mut delay);
        drop(delay);

        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], Duration::from_millis(2));
    }
}
