//! Retries an operation that never succeeds.
//!
//! Three attempts with a 1s base delay: waits 1s, then 2s, then gives up.
//!
//! Run with: cargo run --example failing_operation --features tracing

use std::num::NonZeroU32;
use std::time::Duration;

use ebbtide::{retry, ThreadDelay};

const ATTEMPTS: NonZeroU32 = NonZeroU32::new(3).unwrap();

fn cause_error() -> Result<i32, String> {
    Err("an error occurred".to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Starting...");
    if let Err(e) = retry(cause_error, ATTEMPTS, Duration::from_millis(1000), ThreadDelay) {
        tracing::error!("gave up: {}", e);
    }
    println!("Finished");
}
