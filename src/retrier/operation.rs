//! # Operation abstraction for driven retries.
//!
//! Defines the [`Operation`] trait for async, cancelable units of work whose
//! failures are [`Failure`] records the decision core can classify.
//!
//! - **[`Operation`]** — trait implemented by retryable work
//! - **[`OperationRef`]** — shared handle (`Arc<dyn Operation>`)
//! - **[`BoxOperationFuture`]** — type alias for boxed attempt futures
//!
//! ## Rules
//! - Each [`Operation::run`] call creates a **fresh** future for one attempt.
//! - Implementations should check `ctx.is_cancelled()` at await points so a
//!   canceled retrier stops promptly.
//! - The crate provides [`OperationFn`] to wrap closures as operations.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::failures::Failure;

/// Boxed future returned by [`Operation::run`].
///
/// Boxed and pinned for object safety; `Send` so attempts can move across
/// worker threads.
pub type BoxOperationFuture = Pin<Box<dyn Future<Output = Result<(), Failure>> + Send + 'static>>;

/// Shared handle to an operation object.
pub type OperationRef = Arc<dyn Operation>;

/// Asynchronous, cancelable, retryable unit of work.
///
/// An `Operation` is attempted repeatedly by the [`Retrier`](crate::Retrier);
/// a failed attempt resolves to a [`Failure`] that the decision core
/// classifies. The operation never decides its own retryability.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{BoxOperationFuture, Failure, Operation};
///
/// struct Flaky;
///
/// impl Operation for Flaky {
///     fn name(&self) -> &str {
///         "flaky"
///     }
///
///     fn run(&self, attempt: i32, _ctx: CancellationToken) -> BoxOperationFuture {
///         Box::pin(async move {
///             if attempt < 3 {
///                 return Err(Failure::server(false).with_message("not yet"));
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Operation: Send + Sync + 'static {
    /// Returns a stable, human-readable operation name for logs.
    fn name(&self) -> &str;

    /// Creates the future for one attempt.
    ///
    /// `attempt` is the 1-based ordinal of this execution. The future
    /// **must** observe `ctx` at await points; a canceled context means the
    /// attempt's result will be discarded.
    fn run(&self, attempt: i32, ctx: CancellationToken) -> BoxOperationFuture;
}

/// Function-backed operation implementation.
///
/// Wraps a closure that *creates* a new future per attempt, avoiding shared
/// mutable state between attempts.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{OperationFn, OperationRef};
///
/// let op: OperationRef = OperationFn::arc("ping", |_attempt, _ctx: CancellationToken| async {
///     Ok(())
/// });
/// assert_eq!(op.name(), "ping");
/// ```
#[derive(Debug)]
pub struct OperationFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> OperationFn<F> {
    /// Creates a new function-backed operation.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Operation for OperationFn<F>
where
    F: Fn(i32, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Failure>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, attempt: i32, ctx: CancellationToken) -> BoxOperationFuture {
        Box::pin((self.f)(attempt, ctx))
    }
}
