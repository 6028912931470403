//! Retrying fallible operations.
//!
//! This module follows the "pure schedule, imperative loop" split:
//!
//! - **Pure**: [`Retry`] and [`Backoff`](crate::Backoff) are just data. Given an
//!   attempt index they say how long to wait, and nothing else.
//! - **Imperative**: the `run*` methods and [`retry`] drive the operation and
//!   hand every wait to an injected [`Delay`](crate::Delay).
//!
//! # Quick Start
//!
//! ```rust
//! use ebbtide::{retry, ThreadDelay};
//! use std::num::NonZeroU32;
//! use std::time::Duration;
//!
//! let mut calls = 0;
//! let result = retry(
//!     || {
//!         calls += 1;
//!         if calls < 2 { Err("not yet") } else { Ok(calls) }
//!     },
//!     NonZeroU32::new(3).unwrap(),
//!     Duration::from_millis(1),
//!     ThreadDelay,
//! );
//!
//! assert_eq!(result, Ok(2));
//! ```
//!
//! # Semantics
//!
//! For attempt `i` in `0..max_attempts`, the operation is called once. A
//! success returns immediately. A failure waits `min(base * 2^i, ceiling)`
//! unless it was the last attempt, in which case that failure is returned as
//! is. With `N` failing attempts the delay is consulted exactly `N - 1` times.
//!
//! # Error Types
//!
//! - The operation's own error: returned unchanged by [`retry`] and [`Retry::run`]
//! - [`RetryExhausted`]: returned by the `*_reported` family, wraps the final
//!   error with the attempt count and total delay

mod error;
mod executor;
#[cfg(feature = "async")]
mod future;
mod outcome;

pub use error::RetryExhausted;
pub use executor::{retry, retry_reported, retry_with_hooks, Retry};
#[cfg(feature = "async")]
pub use future::{retry_async, AsyncDelay, TokioDelay};
pub use outcome::{Retried, RetryEvent};
