//! The spawner installed while commands are intercepted.

use tracing::debug;

use super::{OutputFuture, Spawner};
use crate::command::{Invocation, Output};
use crate::error::{Error, Result};
use crate::mock::registry;

/// Answers invocations from the pending expectations.
///
/// Each call consumes the first expectation whose criteria match. No process
/// is ever started.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeSpawner;

impl FakeSpawner {
    fn resolve(invocation: &Invocation) -> Result<Output> {
        let Some(expectation) = registry::take_match(invocation) else {
            debug!(?invocation, "no expectation matched");
            return Err(Error::unhandled_invocation(format!("{invocation:?}")));
        };

        let (criteria, spec) = expectation.into_parts();
        if let Some(reason) = criteria.abort_signal().and_then(|signal| signal.reason()) {
            debug!(?invocation, %reason, "matched expectation was aborted");
            return Err(Error::aborted(format!("{invocation:?}"), reason));
        }

        Ok(spec.into_output())
    }
}

impl Spawner for FakeSpawner {
    fn output(&self, invocation: &Invocation) -> Result<Output> {
        Self::resolve(invocation)
    }

    fn output_async<'a>(&'a self, invocation: &'a Invocation) -> OutputFuture<'a> {
        Box::pin(async move { Self::resolve(invocation) })
    }

    fn spawn(&self, _invocation: &Invocation) -> Result<std::process::Child> {
        Err(Error::unsupported(
            "spawning a live process while commands are intercepted",
        ))
    }
}
