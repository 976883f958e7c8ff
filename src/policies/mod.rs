//! Policies driving the retry decision:
//!  - [`RetryPolicy`] — the per-task record of retry knobs;
//!  - [`next_backoff`] — the decision itself.
//!
//! ## Overview
//! - [`retry`] — the immutable policy record with sentinel accessors and
//!   boundary validation.
//! - [`backoff`] — the calculator folding failure, attempt, policy, and an
//!   injected "now" into `(BackoffInterval, RetryState)`.
//!
//! ## Example
//! ```rust
//! use std::time::{Duration, SystemTime};
//! use retryvisor::{next_backoff, BackoffInterval, Failure, RetryPolicy, RetryState};
//!
//! let policy = RetryPolicy {
//!     initial_interval: Duration::from_millis(100),
//!     maximum_interval: Duration::from_secs(1),
//!     maximum_attempts: 4,
//!     ..RetryPolicy::default()
//! };
//!
//! // 100ms -> 200ms -> 400ms, then the budget is spent.
//! let f = Failure::server(false);
//! let now = SystemTime::now();
//! for (attempt, expect_ms) in [(1, 100), (2, 200), (3, 400)] {
//!     let (interval, state) = next_backoff(now, attempt, &policy, Some(&f));
//!     assert_eq!(interval, BackoffInterval::After(Duration::from_millis(expect_ms)));
//!     assert_eq!(state, RetryState::InProgress);
//! }
//! let (interval, state) = next_backoff(now, 4, &policy, Some(&f));
//! assert_eq!(interval, BackoffInterval::NoBackoff);
//! assert_eq!(state, RetryState::MaximumAttemptsReached);
//! ```

mod backoff;
mod retry;

pub use backoff::{next_backoff, BackoffInterval, RetryState};
pub use retry::RetryPolicy;
