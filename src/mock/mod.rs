//! Scripted results for intercepted commands.
//!
//! Register what a test expects to run with [`expect_command`]; the first
//! registration swaps the fake spawner into the slot every
//! [`Command`](crate::Command) dispatches through. Each matching invocation
//! consumes exactly one expectation, first registered first. Finish with
//! [`reset_interception`], which fails if anything registered was never run.
//!
//! - [`Criteria`] - What an expected invocation looks like
//! - [`install_global_interception`] / [`reset_global_interception`] - Keep
//!   interception installed across several local resets
//!
//! # Example
//!
//! ```rust
//! use testkit_command::mock::{expect_command, reset_interception, Criteria};
//! use testkit_command::{Command, OutputSpec};
//!
//! expect_command(
//!     Criteria::new("deno").args(["run", "example.ts"]),
//!     OutputSpec::new().stdout("example output"),
//! );
//!
//! let output = Command::new("deno").args(["run", "example.ts"]).output()?;
//! assert_eq!(output.stdout, b"example output");
//! assert_eq!(output.code, 0);
//! assert!(output.success);
//!
//! reset_interception()?;
//! # Ok::<(), testkit_command::Error>(())
//! ```

mod criteria;
pub(crate) mod interception;
pub(crate) mod registry;
pub(crate) mod scope;

pub use criteria::Criteria;
pub use interception::{
    install_global_interception, interception_mode, reset_global_interception,
    reset_interception, InterceptionMode,
};
pub use scope::serial_guard;

use crate::command::OutputSpec;
use registry::Expectation;

/// Expect one invocation matching `criteria`, answered with `output`.
///
/// A bare string is shorthand for [`Criteria::new`]. Installs interception
/// if it is not already installed.
pub fn expect_command(criteria: impl Into<Criteria>, output: impl Into<OutputSpec>) {
    registry::register(Expectation::new(criteria.into(), output.into()));
    interception::install_local();
}

/// Number of expectations not yet consumed.
#[must_use]
pub fn pending_expectations() -> usize {
    registry::len()
}
