//! The process-wide spawner slot and its install/reset lifecycle.
//!
//! The slot starts out holding [`RealSpawner`] and moves through three
//! states:
//!
//! ```text
//! Uninstalled --expect_command--> Local --reset_interception--> Uninstalled
//!      |                            |
//!      +---install_global----> Global <-+
//!                                |
//!                 reset_global_interception --> Uninstalled
//! ```
//!
//! `reset_interception` never leaves `Global`; it only verifies and clears
//! the pending expectations.

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::registry;
use crate::error::{Error, Result};
use crate::spawner::{FakeSpawner, RealSpawner, Spawner};

static ORIGINAL: RealSpawner = RealSpawner;
static FAKE: FakeSpawner = FakeSpawner;
static MODE: RwLock<InterceptionMode> = parking_lot::const_rwlock(InterceptionMode::Uninstalled);

/// Whether, and how, the spawner slot is overridden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterceptionMode {
    /// Real processes run.
    Uninstalled,
    /// Intercepted until the next [`reset_interception`].
    Local,
    /// Intercepted until [`reset_global_interception`].
    Global,
}

/// The spawner [`Command`](crate::Command) dispatches to right now.
pub(crate) fn current_spawner() -> &'static dyn Spawner {
    match *MODE.read() {
        InterceptionMode::Uninstalled => &ORIGINAL,
        InterceptionMode::Local | InterceptionMode::Global => &FAKE,
    }
}

/// The current interception mode.
#[must_use]
pub fn interception_mode() -> InterceptionMode {
    *MODE.read()
}

/// Swap in the fake spawner unless one is already installed.
pub(crate) fn install_local() {
    let mut mode = MODE.write();
    if *mode == InterceptionMode::Uninstalled {
        *mode = InterceptionMode::Local;
        debug!("command interception installed");
    }
}

/// Intercept commands until [`reset_global_interception`] is called.
///
/// Local resets in between verify and clear expectations but leave the fake
/// spawner installed, so no real process can run. Idempotent.
pub fn install_global_interception() {
    let mut mode = MODE.write();
    if *mode != InterceptionMode::Global {
        *mode = InterceptionMode::Global;
        debug!("global command interception installed");
    }
}

/// Verify that every expectation was consumed, then restore real processes
/// unless global interception is active.
///
/// Calling this with nothing installed is a no-op.
///
/// # Errors
///
/// Returns [`Error::UnmetExpectations`] listing every leftover expectation in
/// registration order. The registry is cleared and the original spawner
/// restored before the error is returned, so a second call succeeds.
pub fn reset_interception() -> Result<()> {
    let mut mode = MODE.write();
    reset_locked(&mut mode)
}

/// Leave global interception and reset as [`reset_interception`] does.
///
/// A no-op unless [`install_global_interception`] is in effect. Afterwards
/// real processes run again even if this returns an error.
///
/// # Errors
///
/// Same as [`reset_interception`].
pub fn reset_global_interception() -> Result<()> {
    let mut mode = MODE.write();
    if *mode != InterceptionMode::Global {
        return Ok(());
    }
    *mode = InterceptionMode::Local;
    reset_locked(&mut mode)
}

fn reset_locked(mode: &mut InterceptionMode) -> Result<()> {
    let leftovers = registry::drain();

    if *mode == InterceptionMode::Local {
        *mode = InterceptionMode::Uninstalled;
        debug!("command interception removed");
    }

    if leftovers.is_empty() {
        return Ok(());
    }

    let rendered: Vec<String> = leftovers
        .iter()
        .map(|expectation| format!("{:?}", expectation.criteria()))
        .collect();
    warn!(count = rendered.len(), "discarding unmet command expectations");
    Err(Error::unmet_expectations(rendered))
}
