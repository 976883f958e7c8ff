//! # retryvisor
//!
//! **Retryvisor** is the retry decision core of a durable task execution
//! engine: given a failure, a retry policy, the attempt number, and the
//! current time, it decides whether another attempt is permitted, how long
//! to wait before it, and which terminal retry state to report otherwise.
//!
//! The core is pure (no I/O, no clock reads, no shared state), so the same
//! inputs always produce the same decision. A small async driver is included
//! for embedders without their own timer queue.
//!
//! ## Features
//!
//! | Area               | Description                                                        | Key types / functions                        |
//! |--------------------|--------------------------------------------------------------------|----------------------------------------------|
//! | **Failures**       | Failure chains with causes and transparent wrappers.               | [`Failure`], [`FailureInfo`], [`TimeoutKind`] |
//! | **Classification** | May this failure be retried at all?                                | [`is_retryable`]                             |
//! | **Policies**       | Per-task retry knobs with sentinel semantics and validation.       | [`RetryPolicy`], [`PolicyError`]             |
//! | **Backoff**        | Capped exponential interval + retry state, total under any input.  | [`next_backoff`], [`BackoffInterval`], [`RetryState`] |
//! | **Clock**          | Injected time sources for deterministic decisions.                 | [`TimeSource`], [`ManualTimeSource`]         |
//! | **Driver**         | Cancelable attempt loop consuming the core.                        | [`Retrier`], [`Operation`], [`OperationFn`]  |
//!
//! ```no_run
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{Failure, OperationFn, Retrier, RetryPolicy};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let policy = RetryPolicy {
//!         initial_interval: Duration::from_millis(100),
//!         maximum_interval: Duration::from_secs(5),
//!         maximum_attempts: 4,
//!         ..RetryPolicy::default()
//!     };
//!
//!     // An operation that needs a couple of attempts.
//!     let op = OperationFn::arc("sync-shard", |attempt, _ctx: CancellationToken| async move {
//!         if attempt < 3 {
//!             return Err(Failure::server(false).with_message("shard not ready"));
//!         }
//!         Ok(())
//!     });
//!
//!     let exit = Retrier::new(policy)
//!         .run(op.as_ref(), CancellationToken::new())
//!         .await;
//!     assert!(exit.is_completed());
//! }
//! ```
//!
//! Schedulers that own persistence and timers call [`next_backoff`] directly
//! and translate the returned [`RetryState`] into their own signals; the
//! driver exists for everything smaller.
//!
//! ---

mod clock;
mod error;
mod failures;
mod policies;
mod retrier;

// ---- Public re-exports ----

pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use error::PolicyError;
pub use failures::{is_retryable, Failure, FailureInfo, TimeoutKind, TIMEOUT_TYPE_PREFIX};
pub use policies::{next_backoff, BackoffInterval, RetryPolicy, RetryState};
pub use retrier::{
    BoxOperationFuture, Operation, OperationFn, OperationRef, Retrier, RetrierExit,
};
