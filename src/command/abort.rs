//! A minimal cancellation primitive.
//!
//! An [`AbortController`] hands out [`AbortSignal`]s that observe whether it
//! has been aborted, and with what reason. Attaching a signal to an
//! expectation lets a test script a cancelled command.
//!
//! # Example
//!
//! ```rust
//! use testkit_command::command::AbortController;
//!
//! let controller = AbortController::new();
//! let signal = controller.signal();
//!
//! assert!(!signal.is_aborted());
//! controller.abort_with("user pressed ctrl-c");
//! assert_eq!(signal.reason().unwrap().to_string(), "user pressed ctrl-c");
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

const DEFAULT_REASON: &str = "the operation was aborted";

/// Why a signal was aborted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AbortReason(String);

impl AbortReason {
    /// Create a reason with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The reason's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl Default for AbortReason {
    fn default() -> Self {
        Self::new(DEFAULT_REASON)
    }
}

/// Observes the abort state of an [`AbortController`].
///
/// Clones share state with the controller they came from.
#[derive(Clone, Default)]
pub struct AbortSignal {
    reason: Arc<Mutex<Option<AbortReason>>>,
}

impl AbortSignal {
    /// Create a signal that is already aborted with `reason`.
    pub fn aborted(reason: impl Into<String>) -> Self {
        let signal = Self::default();
        signal.fire(AbortReason::new(reason));
        signal
    }

    /// Check whether the signal has been aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.reason.lock().is_some()
    }

    /// The abort reason, if the signal has been aborted.
    #[must_use]
    pub fn reason(&self) -> Option<AbortReason> {
        self.reason.lock().clone()
    }

    // First abort wins.
    fn fire(&self, reason: AbortReason) {
        self.reason.lock().get_or_insert(reason);
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

/// Owns an [`AbortSignal`] and can abort it.
#[derive(Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    /// Create a controller whose signal is not aborted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a signal tied to this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort with the default reason.
    pub fn abort(&self) {
        self.signal.fire(AbortReason::default());
    }

    /// Abort with a custom reason.
    pub fn abort_with(&self, reason: impl Into<String>) {
        self.signal.fire(AbortReason::new(reason));
    }
}
