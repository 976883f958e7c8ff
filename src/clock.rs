//! # Injected time sources.
//!
//! The decision core never reads a clock: "now" is always a parameter. The
//! [`TimeSource`] trait is the seam for components that *drive* the core
//! (the [`Retrier`](crate::Retrier)) and still need a now-provider.
//!
//! - [`SystemTimeSource`] — wall clock.
//! - [`ManualTimeSource`] — settable source for deterministic tests and
//!   embeddings that own their notion of time.
//!
//! ```rust
//! use std::time::{Duration, SystemTime};
//! use retryvisor::{ManualTimeSource, TimeSource};
//!
//! let clock = ManualTimeSource::new(SystemTime::UNIX_EPOCH);
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now(), SystemTime::UNIX_EPOCH + Duration::from_secs(5));
//! ```

use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Provider of the current absolute time.
///
/// Implementations must be cheap and never block; the retrier reads the
/// source once per failed attempt.
pub trait TimeSource: Send + Sync {
    /// Returns the current absolute timestamp.
    fn now(&self) -> SystemTime;
}

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually driven time source.
///
/// Time stands still until moved with [`set`](ManualTimeSource::set) or
/// [`advance`](ManualTimeSource::advance). Thread-safe; shared across tasks
/// behind an `Arc`.
#[derive(Debug)]
pub struct ManualTimeSource {
    now: Mutex<SystemTime>,
}

impl ManualTimeSource {
    /// Creates a source frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jumps to an absolute timestamp (backwards jumps are allowed).
    pub fn set(&self, to: SystemTime) {
        *self.lock() = to;
    }

    /// Moves the source forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.lock() += by;
    }

    // A poisoned lock still holds a valid timestamp.
    fn lock(&self) -> std::sync::MutexGuard<'_, SystemTime> {
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> SystemTime {
        *self.lock()
    }
}
