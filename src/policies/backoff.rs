//! # Backoff calculator: the retry decision.
//!
//! [`next_backoff`] folds a failure, a [`RetryPolicy`], the current attempt
//! number, and an injected "now" into a single `(interval, state)` pair: how
//! long to wait before the next attempt, or which terminal [`RetryState`] to
//! report instead.
//!
//! ```rust
//! use std::time::{Duration, SystemTime};
//! use retryvisor::{next_backoff, BackoffInterval, Failure, RetryPolicy, RetryState};
//!
//! let policy = RetryPolicy {
//!     initial_interval: Duration::from_millis(1),
//!     maximum_attempts: 5,
//!     ..RetryPolicy::default()
//! };
//! let failure = Failure::server(false);
//!
//! // Third attempt with coefficient 2: 1ms * 2^2 = 4ms.
//! let (interval, state) = next_backoff(SystemTime::now(), 3, &policy, Some(&failure));
//! assert_eq!(interval, BackoffInterval::After(Duration::from_millis(4)));
//! assert_eq!(state, RetryState::InProgress);
//!
//! // Budget of 5 attempts: the fifth failure is terminal.
//! let (interval, state) = next_backoff(SystemTime::now(), 5, &policy, Some(&failure));
//! assert_eq!(interval, BackoffInterval::NoBackoff);
//! assert_eq!(state, RetryState::MaximumAttemptsReached);
//! ```
//!
//! ## Decision order (fixed)
//! 1. Classifier gate: non-retryable failure → `NonRetryableFailure`.
//! 2. Attempt budget: `maximum_attempts > 0` and `attempt >= maximum_attempts`
//!    → `MaximumAttemptsReached`.
//! 3. Interval arithmetic: `initial_interval × coefficient^(attempt-1)` in
//!    64-bit floating point, clamped to the effective cap; non-finite values
//!    clamp too.
//! 4. Expiration gate (inclusive): `now + interval >= expiration_time` →
//!    `Timeout`.
//! 5. Otherwise `InProgress` with the computed interval.
//!
//! ## Rules
//! - Total: every input combination resolves to a valid pair, no panics.
//! - Pure: `now` is a parameter, never read from a clock.
//! - `BackoffInterval::NoBackoff` iff the state is not `InProgress`.

use std::time::{Duration, SystemTime};

use crate::failures::{is_retryable, Failure};
use crate::policies::retry::RetryPolicy;

/// Wait before the next attempt, or the sentinel for "no next attempt".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffInterval {
    /// No next attempt is scheduled; paired with a terminal [`RetryState`].
    NoBackoff,
    /// Wait this long before the next attempt (zero means "immediately").
    After(Duration),
}

impl BackoffInterval {
    /// Returns the wrapped duration, or `None` for [`BackoffInterval::NoBackoff`].
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            BackoffInterval::NoBackoff => None,
            BackoffInterval::After(d) => Some(*d),
        }
    }
}

/// Outcome of the retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Reserved zero value; the calculator never produces it.
    Unspecified,
    /// Another attempt is scheduled.
    InProgress,
    /// The attempt budget is exhausted.
    MaximumAttemptsReached,
    /// The expiration deadline would be violated by the next attempt.
    Timeout,
    /// The failure itself is classified non-retryable.
    NonRetryableFailure,
}

impl RetryState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryState::Unspecified => "retry_unspecified",
            RetryState::InProgress => "retry_in_progress",
            RetryState::MaximumAttemptsReached => "retry_maximum_attempts_reached",
            RetryState::Timeout => "retry_timeout",
            RetryState::NonRetryableFailure => "retry_non_retryable_failure",
        }
    }
}

/// Decides whether, and after how long, the next attempt may run.
///
/// `attempt` is the 1-based ordinal of the execution that just failed;
/// values `<= 0` are treated as 1. The returned interval is
/// [`BackoffInterval::NoBackoff`] exactly when the state is terminal.
pub fn next_backoff(
    now: SystemTime,
    attempt: i32,
    policy: &RetryPolicy,
    failure: Option<&Failure>,
) -> (BackoffInterval, RetryState) {
    if !is_retryable(failure, &policy.non_retryable_error_types) {
        return (BackoffInterval::NoBackoff, RetryState::NonRetryableFailure);
    }

    let attempt = attempt.max(1);
    if let Some(limit) = policy.attempt_limit() {
        if attempt >= limit {
            return (
                BackoffInterval::NoBackoff,
                RetryState::MaximumAttemptsReached,
            );
        }
    }

    let interval = nominal_interval(attempt, policy);

    if let Some(expiration) = policy.expiration_time {
        // An unrepresentable next-attempt instant is past any deadline.
        match now.checked_add(interval) {
            Some(next_start) if next_start < expiration => {}
            _ => return (BackoffInterval::NoBackoff, RetryState::Timeout),
        }
    }

    (BackoffInterval::After(interval), RetryState::InProgress)
}

/// Computes `initial × coefficient^(attempt-1)`, clamped to the effective cap.
///
/// The power is taken in 64-bit floating point and clamped *before* the
/// conversion back to a duration, so overflow to infinity lands on the cap
/// rather than in undefined territory. Coefficients below 1 (or non-finite)
/// act as 1.
fn nominal_interval(attempt: i32, policy: &RetryPolicy) -> Duration {
    let cap = policy.effective_maximum_interval();
    if cap.is_zero() {
        return Duration::ZERO;
    }

    let coefficient = if policy.backoff_coefficient.is_finite() && policy.backoff_coefficient >= 1.0
    {
        policy.backoff_coefficient
    } else {
        1.0
    };

    let raw = policy.initial_interval.as_nanos() as f64 * coefficient.powi(attempt - 1);
    let cap_nanos = cap.as_nanos() as f64;
    if !raw.is_finite() || raw >= cap_nanos {
        return cap;
    }

    // Quantize to whole nanoseconds; raw is finite, non-negative, below the
    // cap, and therefore within u64 range after the guards above.
    Duration::from_nanos(raw as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failures::TimeoutKind;

    const MS: Duration = Duration::from_millis(1);

    fn policy_ms(maximum_attempts: i32) -> RetryPolicy {
        RetryPolicy {
            initial_interval: MS,
            maximum_interval: Duration::ZERO,
            backoff_coefficient: 2.0,
            maximum_attempts,
            ..RetryPolicy::default()
        }
    }

    fn retryable_failure() -> Failure {
        Failure::server(false).with_message("some retryable server failure")
    }

    #[test]
    fn non_retryable_failure_gates_everything() {
        let now = SystemTime::UNIX_EPOCH;
        let f = Failure::server(true).with_message("some non-retryable server failure");
        let (interval, state) = next_backoff(now, 4, &policy_ms(0), Some(&f));
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::NonRetryableFailure);
    }

    #[test]
    fn unbounded_attempts_with_no_deadline_keep_retrying() {
        let policy = RetryPolicy {
            initial_interval: Duration::from_secs(1),
            ..RetryPolicy::default()
        };
        let (interval, state) =
            next_backoff(SystemTime::now(), 1, &policy, Some(&retryable_failure()));
        assert_eq!(interval, BackoffInterval::After(Duration::from_secs(1)));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn budget_of_one_means_no_retry_after_the_initial_attempt() {
        let policy = RetryPolicy {
            initial_interval: Duration::from_secs(1),
            maximum_attempts: 1,
            ..RetryPolicy::default()
        };
        let (interval, state) =
            next_backoff(SystemTime::now(), 1, &policy, Some(&retryable_failure()));
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::MaximumAttemptsReached);
    }

    #[test]
    fn intervals_double_per_attempt() {
        let now = SystemTime::UNIX_EPOCH;
        let policy = policy_ms(5);
        let f = retryable_failure();
        for (attempt, expected_ms) in [(1, 1), (2, 2), (3, 4), (4, 8)] {
            let (interval, state) = next_backoff(now, attempt, &policy, Some(&f));
            assert_eq!(
                interval,
                BackoffInterval::After(Duration::from_millis(expected_ms)),
                "attempt {attempt}"
            );
            assert_eq!(state, RetryState::InProgress);
        }
    }

    #[test]
    fn budget_exhausts_on_the_last_attempt() {
        let (interval, state) = next_backoff(
            SystemTime::UNIX_EPOCH,
            5,
            &policy_ms(5),
            Some(&retryable_failure()),
        );
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::MaximumAttemptsReached);
    }

    #[test]
    fn explicit_cap_bounds_growth() {
        let mut policy = policy_ms(6);
        policy.maximum_interval = Duration::from_millis(10);
        let (interval, state) = next_backoff(
            SystemTime::UNIX_EPOCH,
            5,
            &policy,
            Some(&retryable_failure()),
        );
        // 1ms * 2^4 = 16ms, capped at 10ms.
        assert_eq!(interval, BackoffInterval::After(Duration::from_millis(10)));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn expiration_before_next_interval_times_out() {
        let now = SystemTime::UNIX_EPOCH;
        let mut policy = policy_ms(8);
        policy.maximum_interval = Duration::from_millis(10);
        policy.expiration_time = Some(now + Duration::from_millis(5));
        let (interval, state) = next_backoff(now, 6, &policy, Some(&retryable_failure()));
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::Timeout);

        // Extending the deadline re-enables the capped interval.
        policy.expiration_time = Some(now + Duration::from_secs(60));
        let (interval, state) = next_backoff(now, 6, &policy, Some(&retryable_failure()));
        assert_eq!(interval, BackoffInterval::After(Duration::from_millis(10)));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn expiration_equality_is_inclusive() {
        let now = SystemTime::UNIX_EPOCH;
        let policy = RetryPolicy {
            initial_interval: Duration::from_millis(4),
            maximum_attempts: 10,
            expiration_time: Some(now + Duration::from_millis(4)),
            ..RetryPolicy::default()
        };
        // Next attempt would start exactly at the deadline.
        let (interval, state) = next_backoff(now, 1, &policy, Some(&retryable_failure()));
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::Timeout);
    }

    #[test]
    fn no_deadline_never_times_out() {
        let policy = RetryPolicy {
            initial_interval: Duration::from_secs(3600),
            ..RetryPolicy::default()
        };
        let (_, state) = next_backoff(SystemTime::now(), 50, &policy, Some(&retryable_failure()));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn power_overflow_is_absorbed_by_the_cap() {
        let mut policy = policy_ms(100);
        policy.maximum_interval = Duration::from_millis(10);
        let (interval, state) = next_backoff(
            SystemTime::UNIX_EPOCH,
            64,
            &policy,
            Some(&retryable_failure()),
        );
        assert_eq!(interval, BackoffInterval::After(Duration::from_millis(10)));
        assert_eq!(state, RetryState::InProgress);

        // Far past any f64 exponent range.
        let (interval, state) = next_backoff(
            SystemTime::UNIX_EPOCH,
            i32::MAX - 1,
            &policy,
            Some(&retryable_failure()),
        );
        assert_eq!(interval, BackoffInterval::After(Duration::from_millis(10)));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn derived_cap_bounds_growth_without_explicit_maximum() {
        // No explicit cap: growth stops at 100 x initial = 100ms.
        let (interval, state) = next_backoff(
            SystemTime::UNIX_EPOCH,
            64,
            &policy_ms(0),
            Some(&retryable_failure()),
        );
        assert_eq!(interval, BackoffInterval::After(Duration::from_millis(100)));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn zero_initial_interval_retries_immediately_until_budget() {
        let policy = RetryPolicy {
            initial_interval: Duration::ZERO,
            maximum_attempts: 3,
            ..RetryPolicy::default()
        };
        let f = retryable_failure();
        let (interval, state) = next_backoff(SystemTime::UNIX_EPOCH, 1, &policy, Some(&f));
        assert_eq!(interval, BackoffInterval::After(Duration::ZERO));
        assert_eq!(state, RetryState::InProgress);
        let (interval, state) = next_backoff(SystemTime::UNIX_EPOCH, 3, &policy, Some(&f));
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::MaximumAttemptsReached);
    }

    #[test]
    fn non_positive_attempt_acts_as_first_retry() {
        let policy = policy_ms(5);
        let f = retryable_failure();
        for attempt in [i32::MIN, -1, 0, 1] {
            let (interval, state) = next_backoff(SystemTime::UNIX_EPOCH, attempt, &policy, Some(&f));
            assert_eq!(interval, BackoffInterval::After(MS), "attempt {attempt}");
            assert_eq!(state, RetryState::InProgress);
        }
    }

    #[test]
    fn coefficient_below_one_is_clamped_to_constant_delay() {
        let policy = RetryPolicy {
            initial_interval: MS,
            backoff_coefficient: 0.5,
            maximum_attempts: 10,
            ..RetryPolicy::default()
        };
        let f = retryable_failure();
        for attempt in 1..5 {
            let (interval, _) = next_backoff(SystemTime::UNIX_EPOCH, attempt, &policy, Some(&f));
            assert_eq!(interval, BackoffInterval::After(MS));
        }
    }

    #[test]
    fn nan_coefficient_is_normalized_not_propagated() {
        let policy = RetryPolicy {
            initial_interval: MS,
            backoff_coefficient: f64::NAN,
            maximum_attempts: 10,
            ..RetryPolicy::default()
        };
        let (interval, state) =
            next_backoff(SystemTime::UNIX_EPOCH, 3, &policy, Some(&retryable_failure()));
        assert_eq!(interval, BackoffInterval::After(MS));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn intervals_grow_monotonically_up_to_the_cap() {
        let mut policy = policy_ms(0);
        policy.maximum_interval = Duration::from_millis(50);
        let f = retryable_failure();
        let mut prev = Duration::ZERO;
        for attempt in 1..80 {
            let (interval, state) = next_backoff(SystemTime::UNIX_EPOCH, attempt, &policy, Some(&f));
            assert_eq!(state, RetryState::InProgress);
            let d = interval.as_duration().unwrap();
            assert!(d >= prev, "attempt {attempt}: {d:?} < {prev:?}");
            assert!(d <= policy.effective_maximum_interval());
            prev = d;
        }
    }

    #[test]
    fn absent_failure_is_treated_as_retryable() {
        let (interval, state) = next_backoff(SystemTime::UNIX_EPOCH, 1, &policy_ms(5), None);
        assert_eq!(interval, BackoffInterval::After(MS));
        assert_eq!(state, RetryState::InProgress);
    }

    #[test]
    fn blocklisted_timeout_failure_is_terminal() {
        let mut policy = policy_ms(5);
        policy.non_retryable_error_types =
            [format!("TimeoutType:{}", TimeoutKind::StartToClose)].into();
        let f = Failure::timeout(TimeoutKind::StartToClose);
        let (interval, state) = next_backoff(SystemTime::UNIX_EPOCH, 1, &policy, Some(&f));
        assert_eq!(interval, BackoffInterval::NoBackoff);
        assert_eq!(state, RetryState::NonRetryableFailure);
    }

    #[test]
    fn no_backoff_iff_state_is_terminal() {
        let now = SystemTime::UNIX_EPOCH;
        let cases: Vec<(RetryPolicy, i32, Option<Failure>)> = vec![
            (policy_ms(0), 1, Some(retryable_failure())),
            (policy_ms(1), 1, Some(retryable_failure())),
            (policy_ms(5), 7, Some(retryable_failure())),
            (policy_ms(5), 1, Some(Failure::terminated())),
            (
                RetryPolicy {
                    expiration_time: Some(now),
                    ..policy_ms(5)
                },
                1,
                Some(retryable_failure()),
            ),
            (policy_ms(5), 1, None),
        ];
        for (policy, attempt, failure) in cases {
            let (interval, state) = next_backoff(now, attempt, &policy, failure.as_ref());
            assert_eq!(
                interval == BackoffInterval::NoBackoff,
                state != RetryState::InProgress,
                "policy={policy:?} attempt={attempt}"
            );
        }
    }
}
