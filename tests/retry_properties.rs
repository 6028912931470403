//! Property-based tests for the backoff schedule and the retry loop

use ebbtide::backoff::{delay_for, DEFAULT_CEILING};
use ebbtide::testing::{RecordingDelay, Scripted};
use ebbtide::{retry, retry_reported, Backoff};
use proptest::prelude::*;
use std::num::NonZeroU32;
use std::time::Duration;

fn base_delay() -> impl Strategy<Value = Duration> {
    prop_oneof![
        (0u64..10_000).prop_map(Duration::from_millis),
        any::<u64>().prop_map(Duration::from_secs),
        Just(Duration::MAX),
    ]
}

proptest! {
    #[test]
    fn prop_delay_never_exceeds_ceiling(
        base in base_delay(),
        attempt in any::<u32>(),
        ceiling_ms in 1u64..1_000_000
    ) {
        let ceiling = Duration::from_millis(ceiling_ms);
        prop_assert!(delay_for(base, attempt, ceiling) <= ceiling);
    }

    #[test]
    fn prop_delay_is_monotonic(
        base in base_delay(),
        attempt in 0u32..200,
    ) {
        let here = delay_for(base, attempt, DEFAULT_CEILING);
        let next = delay_for(base, attempt + 1, DEFAULT_CEILING);
        prop_assert!(here <= next, "{:?} > {:?} at attempt {}", here, next, attempt);
    }

    #[test]
    fn prop_large_attempts_saturate_to_ceiling(
        base_ms in 1u64..1_000_000,
        attempt in 64u32..=u32::MAX,
    ) {
        let base = Duration::from_millis(base_ms);
        prop_assert_eq!(delay_for(base, attempt, DEFAULT_CEILING), DEFAULT_CEILING);
    }

    #[test]
    fn prop_delay_matches_exact_doubling_below_ceiling(
        base_ms in 1u64..1_000,
        attempt in 0u32..16,
    ) {
        let expected = Duration::from_millis(base_ms << attempt).min(DEFAULT_CEILING);
        prop_assert_eq!(delay_for(Duration::from_millis(base_ms), attempt, DEFAULT_CEILING), expected);
    }

    #[test]
    fn prop_always_success_never_waits(n in 1u32..50, base_ms in 0u64..10_000) {
        let mut op = Scripted::<_, ()>::always(Ok(n));
        let mut delay = RecordingDelay::new();

        let result = retry(
            || op.call(),
            NonZeroU32::new(n).unwrap(),
            Duration::from_millis(base_ms),
            &mut delay,
        );

        prop_assert_eq!(result, Ok(n));
        prop_assert_eq!(op.calls(), 1);
        prop_assert_eq!(delay.count(), 0);
    }

    #[test]
    fn prop_always_failure_waits_n_minus_one(n in 1u32..50, base_ms in 0u64..10_000) {
        let mut op = Scripted::<(), _>::always(Err("down"));
        let mut delay = RecordingDelay::new();
        let base = Duration::from_millis(base_ms);

        let exhausted = retry_reported(
            || op.call(),
            NonZeroU32::new(n).unwrap(),
            base,
            &mut delay,
        )
        .unwrap_err();

        prop_assert_eq!(op.calls(), n);
        prop_assert_eq!(delay.count(), (n - 1) as usize);
        prop_assert_eq!(exhausted.attempts, n);
        prop_assert_eq!(exhausted.total_delay, delay.total());

        let expected: Vec<_> = Backoff::new(base).delays().take((n - 1) as usize).collect();
        prop_assert_eq!(delay.calls(), expected.as_slice());
    }

    #[test]
    fn prop_succeeds_after_k_failures(k in 0u32..20, extra in 1u32..10) {
        let n = k + extra;
        let mut op = Scripted::fails_then_succeeds(k as usize, "busy", "ok");
        let mut delay = RecordingDelay::new();

        let retried = retry_reported(
            || op.call(),
            NonZeroU32::new(n).unwrap(),
            Duration::from_millis(1),
            &mut delay,
        )
        .unwrap();

        prop_assert_eq!(retried.attempts, k + 1);
        prop_assert_eq!(op.calls(), k + 1);
        prop_assert_eq!(delay.count(), k as usize);
    }
}
