//! # Retrier: drives attempts of one operation.
//!
//! [`Retrier`] is the reference driver for the decision core: a sequential
//! attempt loop that consults [`next_backoff`] after every failure, sleeps
//! through scheduled backoffs, and exits with a [`RetrierExit`].
//!
//! ```text
//! loop {
//!   ├─► check cancellation (fast-path)
//!   ├─► attempt += 1
//!   ├─► op.run(attempt, child_token)
//!   │     ├─► Ok  → Completed { attempts }
//!   │     └─► Err(failure)
//!   │           └─► next_backoff(clock.now(), attempt, policy, failure)
//!   │                 ├─► (After(delay), InProgress) → sleep(delay) (cancellable)
//!   │                 └─► (NoBackoff, state)        → Abandoned { state, failure }
//!   └─► on cancellation at any point → Canceled
//! }
//! ```
//!
//! ## Rules
//! - Attempts are strictly sequential; never parallel for one operation.
//! - The driver never interprets the failure itself; the decision core is
//!   the single authority.
//! - Cancellation wins races against backoff sleeps.

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clock::{SystemTimeSource, TimeSource};
use crate::failures::Failure;
use crate::policies::{next_backoff, BackoffInterval, RetryPolicy, RetryState};
use crate::retrier::operation::Operation;

/// Terminal outcome of a driven retry loop.
#[derive(Debug)]
pub enum RetrierExit {
    /// An attempt succeeded.
    Completed {
        /// Number of attempts made, including the successful one.
        attempts: i32,
    },
    /// The decision core refused another attempt.
    Abandoned {
        /// Number of attempts made.
        attempts: i32,
        /// Why retries stopped; never [`RetryState::InProgress`].
        state: RetryState,
        /// The failure of the last attempt.
        failure: Failure,
    },
    /// The cancellation token fired before an attempt could succeed.
    Canceled,
}

impl RetrierExit {
    /// True when the loop ended with a successful attempt.
    pub fn is_completed(&self) -> bool {
        matches!(self, RetrierExit::Completed { .. })
    }
}

/// Sequential retry driver for one [`Operation`].
///
/// Owns a [`RetryPolicy`] and a [`TimeSource`]; everything else (the
/// operation, the cancellation token) arrives per run.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{OperationFn, Retrier, RetryPolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let op = OperationFn::arc("hello", |_attempt, _ctx: CancellationToken| async {
///     Ok(())
/// });
///
/// let exit = Retrier::new(RetryPolicy::default())
///     .run(op.as_ref(), CancellationToken::new())
///     .await;
/// assert!(exit.is_completed());
/// # }
/// ```
pub struct Retrier {
    policy: RetryPolicy,
    clock: Arc<dyn TimeSource>,
}

impl Retrier {
    /// Creates a retrier reading the wall clock.
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemTimeSource))
    }

    /// Creates a retrier with an injected time source.
    pub fn with_clock(policy: RetryPolicy, clock: Arc<dyn TimeSource>) -> Self {
        Self { policy, clock }
    }

    /// Returns the policy this retrier applies.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `op` until success, a terminal retry state, or cancellation.
    pub async fn run<O: Operation + ?Sized>(
        &self,
        op: &O,
        token: CancellationToken,
    ) -> RetrierExit {
        let mut attempt: i32 = 0;

        loop {
            if token.is_cancelled() {
                return RetrierExit::Canceled;
            }
            attempt = attempt.saturating_add(1);

            let failure = match op.run(attempt, token.child_token()).await {
                Ok(()) => return RetrierExit::Completed { attempts: attempt },
                Err(failure) => failure,
            };

            let (interval, state) =
                next_backoff(self.clock.now(), attempt, &self.policy, Some(&failure));
            match interval {
                BackoffInterval::NoBackoff => {
                    warn!(
                        operation = op.name(),
                        attempt,
                        state = state.as_label(),
                        failure = %failure,
                        "abandoning retries"
                    );
                    return RetrierExit::Abandoned {
                        attempts: attempt,
                        state,
                        failure,
                    };
                }
                BackoffInterval::After(delay) => {
                    debug!(
                        operation = op.name(),
                        attempt,
                        delay = ?delay,
                        failure = %failure,
                        "backoff scheduled"
                    );
                    let sleep = time::sleep(delay);
                    tokio::pin!(sleep);
                    select! {
                        _ = &mut sleep => {}
                        _ = token.cancelled() => return RetrierExit::Canceled,
                    }
                }
            }
        }
    }
}
