//! Serde support for retry configuration

#![cfg(feature = "serde")]

use ebbtide::{Backoff, Retry, DEFAULT_CEILING};
use std::num::NonZeroU32;
use std::time::Duration;

#[test]
fn backoff_round_trips_through_json() {
    let backoff = Backoff::new(Duration::from_millis(250)).with_ceiling(Duration::from_secs(30));

    let json = serde_json::to_string(&backoff).unwrap();
    let parsed: Backoff = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, backoff);
}

#[test]
fn backoff_ceiling_defaults_when_missing() {
    let json = r#"{"base": {"secs": 1, "nanos": 0}}"#;
    let parsed: Backoff = serde_json::from_str(json).unwrap();

    assert_eq!(parsed.base(), Duration::from_secs(1));
    assert_eq!(parsed.ceiling(), DEFAULT_CEILING);
}

#[test]
fn retry_round_trips_through_json() {
    let policy = Retry::new(NonZeroU32::new(5).unwrap(), Duration::from_millis(100))
        .with_ceiling(Duration::from_secs(2));

    let json = serde_json::to_string(&policy).unwrap();
    let parsed: Retry = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, policy);
    assert_eq!(parsed.max_attempts().get(), 5);
}

#[test]
fn retry_rejects_zero_attempts() {
    let json = r#"{"max_attempts": 0, "backoff": {"base": {"secs": 1, "nanos": 0}}}"#;
    let parsed: Result<Retry, _> = serde_json::from_str(json);

    assert!(parsed.is_err());
}
