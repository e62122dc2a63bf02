//! Backends that turn an [`Invocation`] into a result.
//!
//! The process-wide slot read by [`Command`](crate::Command) always holds
//! one of two spawners:
//!
//! - [`RealSpawner`] - Runs the process through `std::process` (the
//!   original entry point)
//! - [`FakeSpawner`] - Answers from the expectation registry
//!
//! Which one is current is decided by [`crate::mock`].

mod fake;
mod real;

use std::future::Future;
use std::pin::Pin;

pub use fake::FakeSpawner;
pub use real::RealSpawner;

use crate::command::{Invocation, Output};
use crate::error::Result;

/// Boxed future returned by [`Spawner::output_async`].
pub type OutputFuture<'a> = Pin<Box<dyn Future<Output = Result<Output>> + Send + 'a>>;

/// A way of running invocations.
pub trait Spawner: Send + Sync {
    /// Run to completion and collect output.
    ///
    /// # Errors
    ///
    /// Implementation specific; see [`RealSpawner`] and [`FakeSpawner`].
    fn output(&self, invocation: &Invocation) -> Result<Output>;

    /// Deferred form of [`output`](Self::output).
    fn output_async<'a>(&'a self, invocation: &'a Invocation) -> OutputFuture<'a>;

    /// Start a live child process.
    ///
    /// # Errors
    ///
    /// Implementation specific; see [`RealSpawner`] and [`FakeSpawner`].
    fn spawn(&self, invocation: &Invocation) -> Result<std::process::Child>;
}
