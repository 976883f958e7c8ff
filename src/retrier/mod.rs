//! Reference driver consuming the decision core:
//!  - [`Operation`] / [`OperationFn`] — retryable units of work;
//!  - [`Retrier`] — the sequential attempt loop.
//!
//! ## Overview
//! - [`operation`] — the async seam: object-safe trait with a boxed attempt
//!   future and a closure adapter.
//! - [`driver`] — the loop: attempt, consult the core, sleep or exit.
//!
//! The driver owns every async concern (sleeps, cancellation) so the core
//! stays pure; schedulers with their own timer queues use the core directly
//! and skip this module.

mod driver;
mod operation;

pub use driver::{Retrier, RetrierExit};
pub use operation::{BoxOperationFuture, Operation, OperationFn, OperationRef};
