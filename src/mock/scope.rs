//! Runtime support for `#[testkit_command::test]`.
//!
//! The interception state is process-wide, so every test using it must run
//! alone. These helpers serialize tests and optionally install global
//! interception. Local interception is always reset afterwards; global mode
//! is torn down only by the lifecycle that installed it.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::interception::{
    install_global_interception, reset_global_interception, reset_interception,
};

static SERIAL: ReentrantMutex<()> = parking_lot::const_reentrant_mutex(());

/// Hold this while touching interception state from a test.
///
/// The lock is reentrant, so taking it again inside a
/// `#[testkit_command::test]` body is fine.
#[must_use]
pub fn serial_guard() -> ReentrantMutexGuard<'static, ()> {
    SERIAL.lock()
}

/// Run a synchronous test body inside one interception lifecycle.
///
/// # Panics
///
/// Re-raises a panic from `body`. Otherwise panics if expectations were left
/// unconsumed.
pub fn run_test<T>(global: bool, body: impl FnOnce() -> T) -> T {
    let _serial = serial_guard();
    if global {
        install_global_interception();
    }
    finish(global, panic::catch_unwind(AssertUnwindSafe(body)))
}

/// Run an asynchronous test body inside one interception lifecycle.
///
/// # Panics
///
/// Same as [`run_test`].
pub async fn run_async_test<T, F>(global: bool, body: F) -> T
where
    F: Future<Output = T>,
{
    let _serial = serial_guard();
    if global {
        install_global_interception();
    }
    finish(global, AssertUnwindSafe(body).catch_unwind().await)
}

fn finish<T>(global: bool, outcome: std::thread::Result<T>) -> T {
    let mut reset = reset_interception();
    if global {
        // Runs even if the local reset failed; the registry ends up empty either way.
        reset = reset.and(reset_global_interception());
    }
    match (outcome, reset) {
        (Err(payload), _) => panic::resume_unwind(payload),
        (Ok(_), Err(error)) => panic!("{error}"),
        (Ok(value), Ok(())) => value,
    }
}
