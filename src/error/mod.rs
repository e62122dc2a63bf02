//! Error definitions
//!
//! This module provides error types for testkit-command.

use thiserror::Error;

use crate::command::AbortReason;

/// Main error type for testkit-command
#[derive(Error, Debug)]
pub enum Error {
    /// An intercepted invocation matched no pending expectation.
    #[error("unexpected command invocation: {0}")]
    UnhandledInvocation(String),

    /// The matched expectation's abort signal had already fired.
    #[error("command invocation aborted: {invocation}")]
    Aborted {
        /// Rendered invocation that was aborted.
        invocation: String,
        /// Reason the signal was aborted with.
        #[source]
        reason: AbortReason,
    },

    /// Expectations were still pending when interception was reset.
    #[error("expected more command invocations:\n{}", .0.join("\n"))]
    UnmetExpectations(Vec<String>),

    /// The operation cannot be faked.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Running a real process failed.
    #[error("failed to run command: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unhandled invocation error.
    #[must_use]
    pub fn unhandled_invocation(rendered: impl Into<String>) -> Self {
        Self::UnhandledInvocation(rendered.into())
    }

    /// Create an aborted invocation error.
    #[must_use]
    pub fn aborted(invocation: impl Into<String>, reason: AbortReason) -> Self {
        Self::Aborted {
            invocation: invocation.into(),
            reason,
        }
    }

    /// Create an unmet expectations error.
    #[must_use]
    pub fn unmet_expectations(rendered: Vec<String>) -> Self {
        Self::UnmetExpectations(rendered)
    }

    /// Create an unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported(operation)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
