//! Failure records and their retryability classification:
//!  - [`Failure`] / [`FailureInfo`] / [`TimeoutKind`] — the failure chain;
//!  - [`is_retryable`] — may this failure be retried at all?
//!
//! ## Overview
//! - [`failure`] — value types for the cause chain, built with kind
//!   constructors and `with_*` combinators.
//! - [`classify`] — the rule chain deciding retryability on the outermost
//!   node, with the child workflow wrapper short-circuit.
//!
//! ## Example
//! ```rust
//! use std::collections::HashSet;
//! use retryvisor::{is_retryable, Failure};
//!
//! // A non-retryable application failure wrapped by a child workflow is
//! // still retryable: the wrapper wins.
//! let f = Failure::child_workflow()
//!     .with_cause(Failure::application("DbCorrupted", true));
//!
//! assert!(is_retryable(Some(&f), &HashSet::new()));
//! assert!(!is_retryable(Some(f.root_cause()), &HashSet::new()));
//! ```

mod classify;
mod failure;

pub use classify::{is_retryable, TIMEOUT_TYPE_PREFIX};
pub use failure::{Failure, FailureInfo, TimeoutKind};
