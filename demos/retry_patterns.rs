//! Retry Patterns Example
//!
//! Demonstrates retry with capped exponential backoff.
//! Shows practical patterns including:
//! - Basic retry of a transiently failing operation
//! - Inspecting the backoff schedule
//! - Reporting attempts and total delay
//! - Retry with observability hooks
//! - Async retry on tokio
//!
//! Run with: cargo run --example retry_patterns --features async

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ebbtide::prelude::*;
use ebbtide::testing::RecordingDelay;

fn attempts(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

// ==================== Basic Retry ====================

/// Example 1: Basic retry
///
/// Demonstrates retrying an operation that fails transiently.
fn example_basic_retry() {
    println!("\n=== Example 1: Basic Retry ===");

    let mut calls = 0;
    let result = retry(
        || {
            calls += 1;
            println!("  Attempt {}", calls);
            if calls < 3 {
                Err("transient failure")
            } else {
                Ok("success!")
            }
        },
        attempts(5),
        Duration::from_millis(50),
        ThreadDelay,
    );

    match result {
        Ok(value) => println!("Succeeded: {}", value),
        Err(e) => println!("Failed: {}", e),
    }
}

// ==================== Backoff Schedule ====================

/// Example 2: The schedule is plain data
///
/// Shows how delays double until the ceiling.
fn example_backoff_schedule() {
    println!("\n=== Example 2: Backoff Schedule ===");

    let backoff = Backoff::new(Duration::from_millis(100)).with_ceiling(Duration::from_secs(1));
    for (i, d) in backoff.delays().take(6).enumerate() {
        println!("  After attempt {}: {:?}", i, d);
    }
}

// ==================== Reported Outcomes ====================

/// Example 3: Attempt metadata
///
/// The reported variants tell "failed once" apart from "failed five times".
fn example_reported() {
    println!("\n=== Example 3: Reported Outcomes ===");

    let mut delay = RecordingDelay::new();
    let result = Retry::new(attempts(4), Duration::from_millis(100))
        .run_reported(|| Err::<(), _>("service unavailable"), &mut delay);

    if let Err(exhausted) = result {
        println!("  {}", exhausted);
        println!("  Waits requested: {:?}", delay.calls());
    }
}

// ==================== Hooks ====================

/// Example 4: Observability hooks
fn example_hooks() {
    println!("\n=== Example 4: Hooks ===");

    let _ = Retry::new(attempts(3), Duration::from_millis(10)).run_with_hooks(
        || Err::<(), _>("timeout"),
        NoDelay,
        |event| {
            println!(
                "  Attempt {}/{} failed: {}, next delay: {:?}",
                event.attempt, event.max_attempts, event.error, event.next_delay
            );
        },
    );
}

// ==================== Async ====================

/// Example 5: Async retry
async fn example_async() {
    println!("\n=== Example 5: Async Retry ===");

    let calls = Arc::new(AtomicU32::new(0));
    let result = retry_async(
        || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err("not ready")
                } else {
                    Ok(n + 1)
                }
            }
        },
        attempts(5),
        Duration::from_millis(20),
        TokioDelay,
    )
    .await;

    println!("  Result: {:?}", result);
}

#[tokio::main]
async fn main() {
    example_basic_retry();
    example_backoff_schedule();
    example_reported();
    example_hooks();
    example_async().await;
}
