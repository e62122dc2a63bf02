//! # testkit-command 🧰
//!
//! > Scripted process results for Rust tests
//!
//! **testkit-command** lets tests intercept attempts to run external
//! programs and answer them with deterministic, pre-registered results, so
//! code that shells out can be tested without running anything.
//!
//! ## Quick Start
//!
//! ```rust
//! use testkit_command::prelude::*;
//!
//! fn deno_version() -> Result<String> {
//!     let output = Command::new("deno").arg("--version").output()?;
//!     Ok(output.stdout_lossy().into_owned())
//! }
//!
//! expect_command(
//!     Criteria::new("deno").args(["--version"]),
//!     OutputSpec::new().stdout("deno 2.0.0"),
//! );
//!
//! assert_eq!(deno_version()?, "deno 2.0.0");
//! reset_interception()?;
//! # Ok::<(), testkit_command::Error>(())
//! ```
//!
//! ## Features
//!
//! - 🎯 **Strict Matching** - Every set criterion must match, unset ones are ignored
//! - 🔂 **Consume Once** - Each expectation answers exactly one invocation
//! - 🧹 **Leftover Detection** - Resetting reports expectations that never ran
//! - 🌐 **Global Mode** - Keep interception installed across test steps
//! - ⏳ **Async Support** - Deferred results resolve without waiting
//!
//! ## Cargo Features
//!
//! - `macros` (default) - The `#[testkit_command::test]` attribute
//! - `tokio` - Real deferred output runs through `tokio::process`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod error;
pub mod mock;
pub mod spawner;

/// Prelude for convenient imports
///
/// ```rust
/// use testkit_command::prelude::*;
/// ```
pub mod prelude {
    pub use crate::command::{
        AbortController, AbortSignal, Command, Output, OutputSpec, Program, Stdio,
    };
    pub use crate::error::{Error, Result};
    pub use crate::mock::{
        expect_command, install_global_interception, reset_global_interception,
        reset_interception, Criteria,
    };
}

// Re-exports
pub use command::{Command, Output, OutputSpec};
pub use error::{Error, Result};

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use testkit_command_macros::test;

#[doc(hidden)]
pub mod __private {
    pub use crate::mock::scope::{run_async_test, run_test};
}
