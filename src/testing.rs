//! Testing utilities for code that retries.
//!
//! Retry loops are only pleasant to test when nothing actually sleeps and the
//! operation fails on cue. This module provides both halves, plus assertion
//! macros for the reported outcomes.
//!
//! # Examples
//!
//! ```rust
//! use ebbtide::testing::{RecordingDelay, Scripted};
//! use ebbtide::{assert_retried, Retry};
//! use std::num::NonZeroU32;
//! use std::time::Duration;
//!
//! let mut op = Scripted::fails_then_succeeds(2, "busy", 7);
//! let mut delay = RecordingDelay::new();
//!
//! let result = Retry::new(NonZeroU32::new(5).unwrap(), Duration::from_millis(10))
//!     .run_reported(|| op.call(), &mut delay);
//!
//! assert_retried!(result, 3);
//! assert_eq!(op.calls(), 3);
//! assert_eq!(delay.calls(), &[Duration::from_millis(10), Duration::from_millis(20)]);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use crate::delay::Delay;

/// A delay that records every requested duration and returns immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingDelay {
    calls: Vec<Duration>,
}

impl RecordingDelay {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration requested so far, in order.
    pub fn calls(&self) -> &[Duration] {
        &self.calls
    }

    /// How many waits were requested.
    pub fn count(&self) -> usize {
        self.calls.len()
    }

    /// Sum of all requested durations.
    pub fn total(&self) -> Duration {
        self.calls
            .iter()
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(*d))
    }
}

impl Delay for RecordingDelay {
    fn wait(&mut self, duration: Duration) {
        self.calls.push(duration);
    }
}

#[cfg(feature = "async")]
impl crate::retry::AsyncDelay for RecordingDelay {
    fn wait(&mut self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.calls.push(duration);
        std::future::ready(())
    }
}

/// An operation that replays a fixed script of outcomes.
///
/// Each [`call`](Self::call) pops the next scripted outcome; once the script
/// runs out, every call returns a clone of the fallback.
#[derive(Debug, Clone)]
pub struct Scripted<T, E> {
    script: VecDeque<Result<T, E>>,
    fallback: Result<T, E>,
    calls: u32,
}

impl<T: Clone, E: Clone> Scripted<T, E> {
    /// Replay `outcomes`, then repeat `fallback` forever.
    pub fn new<I>(outcomes: I, fallback: Result<T, E>) -> Self
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        Self {
            script: outcomes.into_iter().collect(),
            fallback,
            calls: 0,
        }
    }

    /// Return the same outcome on every call.
    pub fn always(outcome: Result<T, E>) -> Self {
        Self::new([], outcome)
    }

    /// Fail `failures` times with `error`, then succeed with `value`.
    pub fn fails_then_succeeds(failures: usize, error: E, value: T) -> Self {
        Self::new(std::iter::repeat_n(Err(error), failures), Ok(value))
    }

    /// Run one attempt.
    pub fn call(&mut self) -> Result<T, E> {
        self.calls += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// How many times [`call`](Self::call) has run.
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

/// Assert that a reported retry succeeded after exactly `attempts` attempts.
///
/// # Example
///
/// ```rust
/// use ebbtide::{assert_retried, retry_reported, NoDelay};
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let result = retry_reported(
///     || Ok::<_, ()>(1),
///     NonZeroU32::new(3).unwrap(),
///     Duration::from_millis(10),
///     NoDelay,
/// );
/// assert_retried!(result, 1);
/// ```
#[macro_export]
macro_rules! assert_retried {
    ($result:expr, $attempts:expr) => {
        match $result {
            Ok(retried) => {
                assert_eq!(
                    retried.attempts, $attempts,
                    "Expected success after {} attempts, got {}",
                    $attempts, retried.attempts
                );
            }
            Err(exhausted) => {
                panic!("Expected success, got exhaustion: {:?}", exhausted);
            }
        }
    };
}

/// Assert that a reported retry gave up after exactly `attempts` attempts.
///
/// # Example
///
/// ```rust
/// use ebbtide::{assert_exhausted, retry_reported, NoDelay};
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// let result = retry_reported(
///     || Err::<(), _>("down"),
///     NonZeroU32::new(3).unwrap(),
///     Duration::from_millis(10),
///     NoDelay,
/// );
/// assert_exhausted!(result, 3);
/// ```
#[macro_export]
macro_rules! assert_exhausted {
    ($result:expr, $attempts:expr) => {
        match $result {
            Err(exhausted) => {
                assert_eq!(
                    exhausted.attempts, $attempts,
                    "Expected exhaustion after {} attempts, got {}",
                    $attempts, exhausted.attempts
                );
            }
            Ok(retried) => {
                panic!("Expected exhaustion, got success: {:?}", retried);
            }
        }
    };
}
