//! Live-connection boundary for the dry-run advisor.
//!
//! The engine never owns a database connection. When a dry-run check is
//! requested, the caller passes an implementation of [`Driver`] through the
//! context; the advisor issues read-only `EXPLAIN`-style probes through it
//! and never commits or rolls back anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::DriverError;

/// Cancellation flag propagated from the caller into blocking probes.
///
/// Cloning is cheap; all clones observe the same flag. The dry-run checker
/// consults the token before each probe and stops promptly once cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, not-yet-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; all clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A caller-supplied live connection handle.
///
/// Implementations must be read-only with respect to the target database:
/// the only operation the engine requests is an `EXPLAIN` of a DML
/// statement. A blocking implementation should poll `cancel` and return
/// [`DriverError::Cancelled`] when it fires mid-probe.
pub trait Driver {
    /// Dry-run one DML statement via `EXPLAIN`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Probe`] when the backend rejects the
    /// statement and [`DriverError::Cancelled`] when the probe was aborted.
    fn explain(&self, cancel: &CancelToken, statement: &str) -> Result<(), DriverError>;
}
