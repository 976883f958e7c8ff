//! # Per-task retry policy.
//!
//! [`RetryPolicy`] is the immutable record the scheduler extracts from a
//! task's persisted state and hands to the backoff calculator. It bundles
//! the seven knobs of the retry decision instead of threading them as loose
//! parameters.
//!
//! ## Sentinel values
//! - `maximum_attempts = 0` → unbounded attempts
//! - `maximum_interval = 0` → no explicit cap; the calculator derives
//!   `100 × initial_interval`
//! - `expiration_time = None` → no absolute deadline
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::RetryPolicy;
//!
//! let policy = RetryPolicy {
//!     initial_interval: Duration::from_millis(500),
//!     maximum_attempts: 3,
//!     ..RetryPolicy::default()
//! };
//!
//! assert_eq!(policy.attempt_limit(), Some(3));
//! // No explicit cap: derived as 100 x initial.
//! assert_eq!(policy.effective_maximum_interval(), Duration::from_secs(50));
//! policy.validate().unwrap();
//! ```

use std::collections::HashSet;
use std::time::{Duration, SystemTime};

use crate::error::PolicyError;

/// Growth bound applied when no explicit maximum interval is configured.
const DEFAULT_CAP_MULTIPLIER: u32 = 100;

/// Immutable retry policy for one task.
///
/// All fields are public; prefer the sentinel accessors over repeating
/// zero-checks at call sites.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Delay before the first retry; later retries grow from it.
    pub initial_interval: Duration,

    /// Upper bound on the backoff interval.
    ///
    /// `Duration::ZERO` means no explicit cap; growth is still bounded by a
    /// derived cap of `100 × initial_interval`.
    pub maximum_interval: Duration,

    /// Multiplicative growth factor per attempt (`>= 1.0`).
    ///
    /// Values below 1 (or non-finite values) are clamped to 1 by the
    /// calculator; [`RetryPolicy::validate`] rejects them instead.
    pub backoff_coefficient: f64,

    /// Total attempt budget, counting the original execution.
    ///
    /// `0` means unbounded.
    pub maximum_attempts: i32,

    /// Absolute deadline past which no further attempt may start.
    pub expiration_time: Option<SystemTime>,

    /// Failure type strings that must never be retried.
    ///
    /// Matched exactly and case-sensitively against application failure
    /// types and `TimeoutType:`-prefixed timeout keys.
    pub non_retryable_error_types: HashSet<String>,
}

impl RetryPolicy {
    /// Returns the attempt budget as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` attempts in total
    #[inline]
    pub fn attempt_limit(&self) -> Option<i32> {
        if self.maximum_attempts > 0 {
            Some(self.maximum_attempts)
        } else {
            None
        }
    }

    /// Returns the cap actually applied to computed intervals.
    ///
    /// The explicit `maximum_interval` when set; otherwise
    /// `100 × initial_interval` (saturating). A zero initial interval yields
    /// a zero cap, and with it zero intervals.
    #[inline]
    pub fn effective_maximum_interval(&self) -> Duration {
        if self.maximum_interval > Duration::ZERO {
            self.maximum_interval
        } else {
            self.initial_interval.saturating_mul(DEFAULT_CAP_MULTIPLIER)
        }
    }

    /// Checks the policy for inputs the calculator would have to normalize.
    ///
    /// The calculator itself never calls this: it stays total and clamps
    /// instead. Boundary callers use it to reject bad policies up front.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.backoff_coefficient.is_finite() {
            return Err(PolicyError::CoefficientNotFinite {
                coefficient: self.backoff_coefficient,
            });
        }
        if self.backoff_coefficient < 1.0 {
            return Err(PolicyError::CoefficientTooSmall {
                coefficient: self.backoff_coefficient,
            });
        }
        if self.maximum_interval > Duration::ZERO && self.maximum_interval < self.initial_interval
        {
            return Err(PolicyError::MaximumIntervalBelowInitial {
                maximum: self.maximum_interval,
                initial: self.initial_interval,
            });
        }
        if self.maximum_attempts < 0 {
            return Err(PolicyError::NegativeMaximumAttempts {
                attempts: self.maximum_attempts,
            });
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    /// Default policy:
    ///
    /// - `initial_interval = 1s`
    /// - `maximum_interval = 0` (derived cap of `100 × initial`)
    /// - `backoff_coefficient = 2.0`
    /// - `maximum_attempts = 0` (unbounded)
    /// - `expiration_time = None` (no deadline)
    /// - empty blocklist
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            maximum_interval: Duration::ZERO,
            backoff_coefficient: 2.0,
            maximum_attempts: 0,
            expiration_time: None,
            non_retryable_error_types: HashSet::new(),
        }
    }
}
