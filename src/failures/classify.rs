//! # Retryability classification.
//!
//! [`is_retryable`] decides whether a failure may be retried at all. It is a
//! pure, total function over the outermost node of a [`Failure`] chain and a
//! user-supplied blocklist of failure type strings.
//!
//! ```rust
//! use std::collections::HashSet;
//! use retryvisor::{is_retryable, Failure, TimeoutKind, TIMEOUT_TYPE_PREFIX};
//!
//! let none = HashSet::new();
//! assert!(is_retryable(Some(&Failure::timeout(TimeoutKind::Heartbeat)), &none));
//!
//! let blocked: HashSet<String> =
//!     [format!("{TIMEOUT_TYPE_PREFIX}{}", TimeoutKind::Heartbeat)].into();
//! assert!(!is_retryable(Some(&Failure::timeout(TimeoutKind::Heartbeat)), &blocked));
//! ```
//!
//! ## Rule precedence (fixed)
//! 1. Outermost [`ChildWorkflowExecution`](crate::FailureInfo::ChildWorkflowExecution)
//!    → retryable, cause never consulted.
//! 2. `Terminated`, `Canceled` → not retryable.
//! 3. `Timeout` → retryable iff the kind is `StartToClose` or `Heartbeat`.
//! 4. `non_retryable` flag on `Server` / `Application` → not retryable.
//! 5. Blocklist key present in `non_retryable_types` → not retryable.
//! 6. Otherwise retryable. An absent failure is retryable.

use std::collections::HashSet;

use crate::failures::failure::{Failure, FailureInfo, TimeoutKind};

/// Prefix of blocklist keys derived from timeout failures.
///
/// Callers populating a blocklist to reject a timeout category must emit
/// exactly `"TimeoutType:"` followed by the canonical kind name, e.g.
/// `"TimeoutType:StartToClose"`.
pub const TIMEOUT_TYPE_PREFIX: &str = "TimeoutType:";

/// Decides whether `failure` may be retried under the given blocklist.
///
/// Only the outermost node is consulted; the single exception is the child
/// workflow wrapper, which short-circuits to retryable without looking at
/// its cause. Matching against `non_retryable_types` is exact and
/// case-sensitive.
pub fn is_retryable(failure: Option<&Failure>, non_retryable_types: &HashSet<String>) -> bool {
    let Some(failure) = failure else {
        return true;
    };

    match &failure.info {
        // The wrapper marks the parent's decision surface: child workflows
        // are always retry candidates at the parent level.
        FailureInfo::ChildWorkflowExecution => true,
        FailureInfo::Terminated | FailureInfo::Canceled => false,
        FailureInfo::Timeout { timeout_type } => {
            if !matches!(
                timeout_type,
                TimeoutKind::StartToClose | TimeoutKind::Heartbeat
            ) {
                return false;
            }
            let key = format!("{TIMEOUT_TYPE_PREFIX}{}", timeout_type.as_str());
            !non_retryable_types.contains(&key)
        }
        FailureInfo::Server { non_retryable } => !non_retryable,
        FailureInfo::Application {
            failure_type,
            non_retryable,
        } => {
            if *non_retryable {
                return false;
            }
            if !failure_type.is_empty() && non_retryable_types.contains(failure_type) {
                return false;
            }
            true
        }
        FailureInfo::Activity => true,
    }
}
