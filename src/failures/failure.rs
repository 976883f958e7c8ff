//! # Failure records produced by task executions.
//!
//! A [`Failure`] is one node in a finite, acyclic cause chain: the outermost
//! node is what the observer sees, the innermost is closest to the origin.
//! Each node carries exactly one [`FailureInfo`] discriminant and an optional
//! owned `cause` link.
//!
//! Failures are built with the kind constructors and chained with
//! [`Failure::with_cause`]:
//!
//! ```rust
//! use retryvisor::{Failure, TimeoutKind};
//!
//! let f = Failure::child_workflow()
//!     .with_message("child run failed")
//!     .with_cause(
//!         Failure::application("PaymentDeclined", true)
//!             .with_message("card rejected"),
//!     );
//!
//! assert_eq!(f.root_cause().message, "card rejected");
//! assert_eq!(f.to_string(), "child run failed: card rejected");
//! # let _ = TimeoutKind::Heartbeat;
//! ```
//!
//! ## Rules
//! - Construction sites never create cycles; depth is bounded by the number
//!   of wrappers the runtime produces (a handful in practice).
//! - `message` is a human-readable summary; classification never reads it.

use std::fmt;

/// Closed set of timeout categories carried by [`FailureInfo::Timeout`].
///
/// The stringified names returned by [`TimeoutKind::as_str`] are part of the
/// wire contract: blocklist keys for timeouts are built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutKind {
    /// Timeout category was not set by the producer.
    Unspecified,
    /// The attempt ran longer than its start-to-close budget.
    StartToClose,
    /// The attempt waited too long to be picked up.
    ScheduleToStart,
    /// The whole schedule-to-close window elapsed.
    ScheduleToClose,
    /// The worker stopped heartbeating.
    Heartbeat,
}

impl TimeoutKind {
    /// Returns the canonical wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeoutKind::Unspecified => "Unspecified",
            TimeoutKind::StartToClose => "StartToClose",
            TimeoutKind::ScheduleToStart => "ScheduleToStart",
            TimeoutKind::ScheduleToClose => "ScheduleToClose",
            TimeoutKind::Heartbeat => "Heartbeat",
        }
    }
}

impl fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminated union over failure kinds.
///
/// Exactly one variant per [`Failure`] node. The retryability classifier
/// matches on this exhaustively, so adding a variant is a semantic change,
/// not just a data change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureInfo {
    /// Failure raised by user code, optionally flagged non-retryable and
    /// tagged with a user-defined type string for blocklist matching.
    Application {
        /// User-defined failure type; matched verbatim against blocklists.
        failure_type: String,
        /// Producer decided this failure must never be retried.
        non_retryable: bool,
    },
    /// An attempt timed out; retryability depends on the category.
    Timeout {
        /// Which timeout budget was exceeded.
        timeout_type: TimeoutKind,
    },
    /// Failure raised by the runtime itself.
    Server {
        /// Runtime decided this failure must never be retried.
        non_retryable: bool,
    },
    /// The task was canceled; never retried.
    Canceled,
    /// The task was terminated from outside; never retried.
    Terminated,
    /// Wrapper around an activity's failure; decided on its own node.
    Activity,
    /// Wrapper around a child workflow's failure.
    ///
    /// Transparent for retry purposes: the wrapper's presence alone makes
    /// the failure retryable, whatever the cause chain says.
    ChildWorkflowExecution,
}

impl FailureInfo {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureInfo::Application { .. } => "application_failure",
            FailureInfo::Timeout { .. } => "timeout_failure",
            FailureInfo::Server { .. } => "server_failure",
            FailureInfo::Canceled => "canceled_failure",
            FailureInfo::Terminated => "terminated_failure",
            FailureInfo::Activity => "activity_failure",
            FailureInfo::ChildWorkflowExecution => "child_workflow_execution_failure",
        }
    }
}

/// One node of a failure chain.
///
/// Value type with an owning optional link to its cause. Cheap to clone at
/// the depths the runtime produces; no arena, no cycle detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Human-readable summary; empty when the producer supplied none.
    pub message: String,
    /// The kind of failure this node represents.
    pub info: FailureInfo,
    /// Next node toward the origin, if any.
    pub cause: Option<Box<Failure>>,
}

impl Failure {
    fn new(info: FailureInfo) -> Self {
        Self {
            message: String::new(),
            info,
            cause: None,
        }
    }

    /// Creates an application failure with the given type string.
    pub fn application(failure_type: impl Into<String>, non_retryable: bool) -> Self {
        Self::new(FailureInfo::Application {
            failure_type: failure_type.into(),
            non_retryable,
        })
    }

    /// Creates a timeout failure of the given category.
    pub fn timeout(timeout_type: TimeoutKind) -> Self {
        Self::new(FailureInfo::Timeout { timeout_type })
    }

    /// Creates a server failure.
    pub fn server(non_retryable: bool) -> Self {
        Self::new(FailureInfo::Server { non_retryable })
    }

    /// Creates a cancellation failure.
    pub fn canceled() -> Self {
        Self::new(FailureInfo::Canceled)
    }

    /// Creates a termination failure.
    pub fn terminated() -> Self {
        Self::new(FailureInfo::Terminated)
    }

    /// Creates an activity wrapper failure.
    pub fn activity() -> Self {
        Self::new(FailureInfo::Activity)
    }

    /// Creates a child workflow wrapper failure.
    pub fn child_workflow() -> Self {
        Self::new(FailureInfo::ChildWorkflowExecution)
    }

    /// Attaches a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches a cause, pushing this node one step away from the origin.
    pub fn with_cause(mut self, cause: Failure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Returns the innermost node of the chain (`self` when there is no cause).
    pub fn root_cause(&self) -> &Failure {
        let mut node = self;
        while let Some(cause) = node.cause.as_deref() {
            node = cause;
        }
        node
    }
}

impl fmt::Display for Failure {
    /// Renders the chain outermost-first, `": "`-separated.
    ///
    /// Nodes without a message fall back to their kind label.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = Some(self);
        let mut first = true;
        while let Some(n) = node {
            if !first {
                f.write_str(": ")?;
            }
            if n.message.is_empty() {
                f.write_str(n.info.as_label())?;
            } else {
                f.write_str(&n.message)?;
            }
            first = false;
            node = n.cause.as_deref();
        }
        Ok(())
    }
}
