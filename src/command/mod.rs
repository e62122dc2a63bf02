//! The process-spawning entry point.
//!
//! [`Command`] mirrors the builder shape of [`std::process::Command`]. Every
//! accessor dispatches through the process-wide spawner slot, so the same
//! code runs real processes normally and scripted fakes while interception
//! is installed (see [`crate::mock`]).
//!
//! - [`Command`] - Process builder and entry point
//! - [`Program`] - Command identity (a bare name or a path)
//! - [`CommandOptions`] - Options recorded only when explicitly set
//! - [`Output`] / [`OutputSpec`] - Results and partial results
//! - [`AbortController`] / [`AbortSignal`] - Cancellation primitive
//!
//! # Example
//!
//! ```rust,no_run
//! use testkit_command::Command;
//!
//! let output = Command::new("git").args(["status", "--short"]).output()?;
//! println!("{}", output.stdout_lossy());
//! # Ok::<(), testkit_command::Error>(())
//! ```

mod abort;
mod output;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

pub use abort::{AbortController, AbortReason, AbortSignal};
pub use output::{Output, OutputSpec};

use crate::error::Result;
use crate::mock::interception;

/// The identity of the program to run.
#[derive(Clone, PartialEq, Eq)]
pub enum Program {
    /// A program name or string, looked up and compared as written.
    Name(OsString),
    /// A filesystem path, compared in normalized form.
    Path(PathBuf),
}

impl Program {
    /// The program as passed to the operating system.
    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        match self {
            Self::Name(name) => name,
            Self::Path(path) => path.as_os_str(),
        }
    }

    /// The form used when matching expectations.
    ///
    /// Names are used verbatim; paths drop interior `.` segments plus
    /// repeated and trailing separators. Neither goes through UTF-8.
    #[must_use]
    pub fn normalized(&self) -> Cow<'_, OsStr> {
        match self {
            Self::Name(name) => Cow::Borrowed(name),
            Self::Path(path) => Cow::Owned(path.components().collect::<PathBuf>().into_os_string()),
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => fmt::Debug::fmt(name, f),
            Self::Path(path) => fmt::Debug::fmt(path, f),
        }
    }
}

impl From<&str> for Program {
    fn from(name: &str) -> Self {
        Self::Name(name.into())
    }
}

impl From<String> for Program {
    fn from(name: String) -> Self {
        Self::Name(name.into())
    }
}

impl From<&String> for Program {
    fn from(name: &String) -> Self {
        Self::Name(name.into())
    }
}

impl From<&OsStr> for Program {
    fn from(name: &OsStr) -> Self {
        Self::Name(name.to_os_string())
    }
}

impl From<OsString> for Program {
    fn from(name: OsString) -> Self {
        Self::Name(name)
    }
}

impl From<&Path> for Program {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Program {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&PathBuf> for Program {
    fn from(path: &PathBuf) -> Self {
        Self::Path(path.clone())
    }
}

/// How a standard stream of the child is connected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stdio {
    /// A pipe to the parent.
    Piped,
    /// Inherit the parent's stream.
    Inherit,
    /// Discard (or read nothing).
    Null,
}

impl From<Stdio> for std::process::Stdio {
    fn from(stdio: Stdio) -> Self {
        match stdio {
            Stdio::Piped => Self::piped(),
            Stdio::Inherit => Self::inherit(),
            Stdio::Null => Self::null(),
        }
    }
}

/// Spawn options.
///
/// Each option is `None` until explicitly set, so "never set" stays
/// distinguishable from an explicit default such as `clear_env: Some(false)`
/// or `uid: Some(0)`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Arguments, in order.
    pub args: Option<Vec<OsString>>,
    /// Working directory.
    pub cwd: Option<PathBuf>,
    /// Whether the inherited environment is cleared.
    pub clear_env: Option<bool>,
    /// Explicitly set environment variables.
    pub env: Option<BTreeMap<OsString, OsString>>,
    /// User id to run as (Unix only).
    pub uid: Option<u32>,
    /// Group id to run as (Unix only).
    pub gid: Option<u32>,
    /// Standard input disposition.
    pub stdin: Option<Stdio>,
    /// Standard output disposition.
    pub stdout: Option<Stdio>,
    /// Standard error disposition.
    pub stderr: Option<Stdio>,
    /// Pass arguments verbatim without quoting (Windows only).
    pub windows_raw_arguments: Option<bool>,
}

impl CommandOptions {
    pub(crate) fn debug_fields(&self, s: &mut fmt::DebugStruct<'_, '_>) {
        if let Some(args) = &self.args {
            s.field("args", args);
        }
        if let Some(cwd) = &self.cwd {
            s.field("cwd", cwd);
        }
        if let Some(clear_env) = &self.clear_env {
            s.field("clear_env", clear_env);
        }
        if let Some(env) = &self.env {
            s.field("env", env);
        }
        if let Some(uid) = &self.uid {
            s.field("uid", uid);
        }
        if let Some(gid) = &self.gid {
            s.field("gid", gid);
        }
        if let Some(stdin) = &self.stdin {
            s.field("stdin", stdin);
        }
        if let Some(stdout) = &self.stdout {
            s.field("stdout", stdout);
        }
        if let Some(stderr) = &self.stderr {
            s.field("stderr", stderr);
        }
        if let Some(raw) = &self.windows_raw_arguments {
            s.field("windows_raw_arguments", raw);
        }
    }
}

impl fmt::Debug for CommandOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CommandOptions");
        self.debug_fields(&mut s);
        s.finish()
    }
}

/// One attempt to run a program: its identity plus the options set on it.
///
/// The `Debug` form lists only the options that were set, in a fixed order,
/// and is what error messages show.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    program: Program,
    options: CommandOptions,
}

impl Invocation {
    /// Create an invocation with no options set.
    pub fn new(program: impl Into<Program>) -> Self {
        Self {
            program: program.into(),
            options: CommandOptions::default(),
        }
    }

    /// Create an invocation with the given options.
    pub fn with_options(program: impl Into<Program>, options: CommandOptions) -> Self {
        Self {
            program: program.into(),
            options,
        }
    }

    /// The program identity.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The options set so far.
    #[must_use]
    pub fn options(&self) -> &CommandOptions {
        &self.options
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Invocation");
        s.field("program", &self.program);
        self.options.debug_fields(&mut s);
        s.finish()
    }
}

/// A process builder whose accessors go through the current spawner.
///
/// With no interception installed the process really runs. While
/// interception is installed, [`output`](Self::output) and
/// [`output_async`](Self::output_async) return the result of the first
/// matching expectation and [`spawn`](Self::spawn) always fails.
#[derive(Clone, Debug)]
pub struct Command {
    invocation: Invocation,
}

impl Command {
    /// Start building an invocation of `program`.
    pub fn new(program: impl Into<Program>) -> Self {
        Self {
            invocation: Invocation::new(program),
        }
    }

    /// Append one argument.
    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args([arg])
    }

    /// Append several arguments.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.invocation
            .options
            .args
            .get_or_insert_with(Vec::new)
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Set the working directory.
    pub fn current_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.invocation.options.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set one environment variable.
    pub fn env(&mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> &mut Self {
        self.envs([(key, value)])
    }

    /// Set several environment variables.
    pub fn envs<I, K, V>(&mut self, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.invocation
            .options
            .env
            .get_or_insert_with(BTreeMap::new)
            .extend(
                vars.into_iter()
                    .map(|(k, v)| (k.as_ref().to_os_string(), v.as_ref().to_os_string())),
            );
        self
    }

    /// Do not inherit the parent's environment.
    ///
    /// Unlike [`std::process::Command::env_clear`], variables set through
    /// [`env`](Self::env) are kept regardless of call order.
    pub fn env_clear(&mut self) -> &mut Self {
        self.invocation.options.clear_env = Some(true);
        self
    }

    /// Run as the given user id (Unix only).
    pub fn uid(&mut self, uid: u32) -> &mut Self {
        self.invocation.options.uid = Some(uid);
        self
    }

    /// Run as the given group id (Unix only).
    pub fn gid(&mut self, gid: u32) -> &mut Self {
        self.invocation.options.gid = Some(gid);
        self
    }

    /// Configure standard input.
    pub fn stdin(&mut self, stdio: Stdio) -> &mut Self {
        self.invocation.options.stdin = Some(stdio);
        self
    }

    /// Configure standard output.
    pub fn stdout(&mut self, stdio: Stdio) -> &mut Self {
        self.invocation.options.stdout = Some(stdio);
        self
    }

    /// Configure standard error.
    pub fn stderr(&mut self, stdio: Stdio) -> &mut Self {
        self.invocation.options.stderr = Some(stdio);
        self
    }

    /// Pass arguments without quoting or escaping (Windows only).
    pub fn windows_raw_arguments(&mut self, raw: bool) -> &mut Self {
        self.invocation.options.windows_raw_arguments = Some(raw);
        self
    }

    /// The invocation built so far.
    #[must_use]
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Run the command to completion and collect its output.
    ///
    /// # Errors
    ///
    /// When intercepted, fails with [`Error::UnhandledInvocation`] if no
    /// expectation matches, or [`Error::Aborted`] if the matched
    /// expectation's signal was aborted. When real, fails with
    /// [`Error::Io`] if the process could not be run.
    ///
    /// [`Error::UnhandledInvocation`]: crate::Error::UnhandledInvocation
    /// [`Error::Aborted`]: crate::Error::Aborted
    /// [`Error::Io`]: crate::Error::Io
    pub fn output(&self) -> Result<Output> {
        interception::current_spawner().output(&self.invocation)
    }

    /// Deferred form of [`output`](Self::output).
    ///
    /// Intercepted calls resolve on first poll without waiting.
    ///
    /// # Errors
    ///
    /// Same as [`output`](Self::output).
    pub fn output_async(&self) -> impl Future<Output = Result<Output>> + Send + '_ {
        interception::current_spawner().output_async(&self.invocation)
    }

    /// Start the process without waiting for it.
    ///
    /// # Errors
    ///
    /// Always fails with [`Error::Unsupported`] while interception is
    /// installed; otherwise fails with [`Error::Io`] if the process could
    /// not be started.
    ///
    /// [`Error::Unsupported`]: crate::Error::Unsupported
    /// [`Error::Io`]: crate::Error::Io
    pub fn spawn(&self) -> Result<std::process::Child> {
        interception::current_spawner().spawn(&self.invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_command_has_no_options() {
        let command = Command::new("deno");

        assert_eq!(command.invocation().program(), &Program::from("deno"));
        assert_eq!(command.invocation().options(), &CommandOptions::default());
    }

    #[test]
    fn test_args_accumulate() {
        let mut command = Command::new("deno");
        command.arg("run").args(["--allow-read", "example.ts"]);

        assert_eq!(
            command.invocation().options().args,
            Some(vec![
                OsString::from("run"),
                OsString::from("--allow-read"),
                OsString::from("example.ts"),
            ])
        );
    }

    #[test]
    fn test_empty_args_are_still_set() {
        let mut command = Command::new("deno");
        command.args(Vec::<String>::new());

        assert_eq!(command.invocation().options().args, Some(Vec::new()));
    }

    #[test]
    fn test_env_clear_keeps_explicit_vars() {
        let mut command = Command::new("env");
        command.env("B", "2").env_clear().envs([("A", "1")]);

        let options = command.invocation().options();
        assert_eq!(options.clear_env, Some(true));
        assert_eq!(options.env.as_ref().map(BTreeMap::len), Some(2));
    }

    #[test]
    fn test_program_normalization() {
        assert_eq!(Program::from("./deno").normalized(), OsStr::new("./deno"));
        assert_eq!(
            Program::from(Path::new("bin//deno/")).normalized(),
            OsStr::new("bin/deno")
        );
        assert_eq!(
            Program::from(PathBuf::from("bin/./deno")).normalized(),
            OsStr::new("bin/deno")
        );
    }

    #[test]
    fn test_invocation_debug_lists_only_set_options() {
        let mut command = Command::new("deno");
        command.args(["fmt"]).env("Z", "1").env("A", "2").uid(0);

        assert_eq!(
            format!("{:?}", command.invocation()),
            r#"Invocation { program: "deno", args: ["fmt"], env: {"A": "2", "Z": "1"}, uid: 0 }"#
        );
    }

    #[test]
    fn test_options_debug_empty() {
        assert_eq!(format!("{:?}", CommandOptions::default()), "CommandOptions");
    }
}
