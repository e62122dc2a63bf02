//! Real process execution.
//!
//! With the `tokio` feature, [`RealSpawner::output_async`] uses
//! `tokio::process` and must be polled inside a Tokio runtime. Without it,
//! the deferred path runs the blocking one when first polled.

use std::ffi::OsString;

use tracing::debug;

use super::{OutputFuture, Spawner};
use crate::command::{Invocation, Output};
use crate::error::Result;

/// Runs invocations as real operating system processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealSpawner;

impl RealSpawner {
    /// Translate an invocation into a [`std::process::Command`].
    #[must_use]
    pub fn std_command(invocation: &Invocation) -> std::process::Command {
        let options = invocation.options();
        let mut command = std::process::Command::new(invocation.program().as_os_str());

        if let Some(args) = &options.args {
            push_args(
                &mut command,
                args,
                options.windows_raw_arguments.unwrap_or(false),
            );
        }
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }
        // Clear first so explicit variables survive.
        if options.clear_env == Some(true) {
            command.env_clear();
        }
        if let Some(env) = &options.env {
            command.envs(env);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            if let Some(uid) = options.uid {
                command.uid(uid);
            }
            if let Some(gid) = options.gid {
                command.gid(gid);
            }
        }
        if let Some(stdin) = options.stdin {
            command.stdin(stdin);
        }
        if let Some(stdout) = options.stdout {
            command.stdout(stdout);
        }
        if let Some(stderr) = options.stderr {
            command.stderr(stderr);
        }

        command
    }
}

#[cfg(windows)]
fn push_args(command: &mut std::process::Command, args: &[OsString], raw: bool) {
    use std::os::windows::process::CommandExt;

    if raw {
        for arg in args {
            command.raw_arg(arg);
        }
    } else {
        command.args(args);
    }
}

#[cfg(not(windows))]
fn push_args(command: &mut std::process::Command, args: &[OsString], _raw: bool) {
    command.args(args);
}

impl Spawner for RealSpawner {
    fn output(&self, invocation: &Invocation) -> Result<Output> {
        debug!(?invocation, "running real command");
        let output = Self::std_command(invocation).output()?;
        Ok(output.into())
    }

    #[cfg(feature = "tokio")]
    fn output_async<'a>(&'a self, invocation: &'a Invocation) -> OutputFuture<'a> {
        Box::pin(async move {
            debug!(?invocation, "running real command");
            let mut command = tokio::process::Command::from(Self::std_command(invocation));
            let output = command.output().await?;
            Ok(output.into())
        })
    }

    #[cfg(not(feature = "tokio"))]
    fn output_async<'a>(&'a self, invocation: &'a Invocation) -> OutputFuture<'a> {
        Box::pin(async move { self.output(invocation) })
    }

    fn spawn(&self, invocation: &Invocation) -> Result<std::process::Child> {
        debug!(?invocation, "spawning real command");
        Ok(Self::std_command(invocation).spawn()?)
    }
}
