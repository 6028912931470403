//! # Ebbtide
//!
//! > *"What goes out comes back, a little later each time"*
//!
//! A Rust library for retrying fallible operations with capped exponential
//! backoff.
//!
//! ## Philosophy
//!
//! **Ebbtide** keeps the schedule pure and the waiting injectable:
//! - **Backoff** = Pure data (`min(base * 2^attempt, ceiling)`, never overflows)
//! - **Delay** = The only place time passes, swapped for a recorder in tests
//!
//! ## Quick Example
//!
//! ```rust
//! use ebbtide::{retry, ThreadDelay};
//! use std::num::NonZeroU32;
//! use std::time::Duration;
//!
//! fn connect() -> Result<u16, String> {
//!     Err("connection refused".to_string())
//! }
//!
//! // Three attempts, waiting 1ms then 2ms in between
//! let result = retry(
//!     connect,
//!     NonZeroU32::new(3).unwrap(),
//!     Duration::from_millis(1),
//!     ThreadDelay,
//! );
//!
//! match result {
//!     Ok(port) => println!("Connected on {}", port),
//!     Err(e) => println!("Gave up: {}", e),
//! }
//! ```
//!
//! ## Features
//!
//! - `async`: `retry_async` and `TokioDelay` for operations returning futures
//! - `tracing`: `debug`/`warn`/`trace` events for every attempt
//! - `serde`: `Serialize`/`Deserialize` for [`Backoff`] and [`Retry`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod delay;
pub mod retry;
pub mod testing;

// Re-exports
pub use backoff::{Backoff, DEFAULT_CEILING};
pub use delay::{Delay, NoDelay, ThreadDelay};
pub use retry::{
    retry, retry_reported, retry_with_hooks, Retried, Retry, RetryEvent, RetryExhausted,
};
#[cfg(feature = "async")]
pub use retry::{retry_async, AsyncDelay, TokioDelay};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::Backoff;
    pub use crate::delay::{Delay, NoDelay, ThreadDelay};
    pub use crate::retry::{retry, Retried, Retry, RetryExhausted};
    #[cfg(feature = "async")]
    pub use crate::retry::{retry_async, AsyncDelay, TokioDelay};
}
