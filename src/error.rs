//! # Error types for retry policy validation.
//!
//! The decision core itself is total and never fails: adversarial inputs are
//! normalized inside the calculator. [`PolicyError`] exists for boundary
//! callers (admission, configuration loading) that want to *reject* a policy
//! instead of silently normalizing it; see
//! [`RetryPolicy::validate`](crate::RetryPolicy::validate).

use std::time::Duration;

use thiserror::Error;

/// # Errors produced by retry policy validation.
///
/// These mirror the normalization rules of the calculator: every rejected
/// input is one the calculator would otherwise clamp or ignore.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Backoff coefficient below 1 would shrink intervals between attempts.
    #[error("backoff coefficient {coefficient} is below 1")]
    CoefficientTooSmall {
        /// The offending coefficient.
        coefficient: f64,
    },
    /// Backoff coefficient is NaN or infinite.
    #[error("backoff coefficient {coefficient} is not finite")]
    CoefficientNotFinite {
        /// The offending coefficient.
        coefficient: f64,
    },
    /// A non-zero maximum interval must be at least the initial interval.
    #[error("maximum interval {maximum:?} is below initial interval {initial:?}")]
    MaximumIntervalBelowInitial {
        /// The configured cap.
        maximum: Duration,
        /// The configured initial interval.
        initial: Duration,
    },
    /// Negative attempt budgets are meaningless (0 already means unbounded).
    #[error("maximum attempts {attempts} is negative")]
    NegativeMaximumAttempts {
        /// The offending budget.
        attempts: i32,
    },
}

impl PolicyError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PolicyError::CoefficientTooSmall { .. } => "policy_coefficient_too_small",
            PolicyError::CoefficientNotFinite { .. } => "policy_coefficient_not_finite",
            PolicyError::MaximumIntervalBelowInitial { .. } => "policy_maximum_below_initial",
            PolicyError::NegativeMaximumAttempts { .. } => "policy_negative_attempts",
        }
    }
}
