//! Match criteria for expected invocations.
//!
//! A [`Criteria`] is a conjunction of independently optional rules. A rule
//! constrains an invocation only when it was set; an all-unset criteria
//! matches everything.
//!
//! # Example
//!
//! ```rust
//! use testkit_command::mock::Criteria;
//!
//! let criteria = Criteria::new("deno").args(["run", "example.ts"]);
//! assert_eq!(
//!     format!("{criteria:?}"),
//!     r#"Criteria { command: "deno", args: ["run", "example.ts"] }"#
//! );
//! ```

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use crate::command::{AbortSignal, CommandOptions, Invocation, Program, Stdio};

/// What an expected invocation must look like.
#[derive(Clone, Default)]
pub struct Criteria {
    command: Option<String>,
    options: CommandOptions,
    signal: Option<AbortSignal>,
}

impl Criteria {
    /// Criteria requiring the given command identity.
    pub fn new(command: impl Into<String>) -> Self {
        Self::any().command(command)
    }

    /// Criteria with no rules; matches any invocation.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Require the command identity.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Require exactly these arguments, in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.options.args = Some(
            args.into_iter()
                .map(|arg| arg.as_ref().to_os_string())
                .collect(),
        );
        self
    }

    /// Require the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.options.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Require the environment-clearing flag.
    ///
    /// `false` only matches invocations that set the flag to `false`, not
    /// ones that never set it.
    #[must_use]
    pub fn clear_env(mut self, clear: bool) -> Self {
        self.options.clear_env = Some(clear);
        self
    }

    /// Require this variable as part of an exact environment.
    #[must_use]
    pub fn env(self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs([(key, value)])
    }

    /// Require these variables as part of an exact environment.
    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.options.env.get_or_insert_with(BTreeMap::new).extend(
            vars.into_iter()
                .map(|(k, v)| (k.as_ref().to_os_string(), v.as_ref().to_os_string())),
        );
        self
    }

    /// Require the user id.
    #[must_use]
    pub fn uid(mut self, uid: u32) -> Self {
        self.options.uid = Some(uid);
        self
    }

    /// Require the group id.
    #[must_use]
    pub fn gid(mut self, gid: u32) -> Self {
        self.options.gid = Some(gid);
        self
    }

    /// Require the standard input disposition.
    #[must_use]
    pub fn stdin(mut self, stdio: Stdio) -> Self {
        self.options.stdin = Some(stdio);
        self
    }

    /// Require the standard output disposition.
    #[must_use]
    pub fn stdout(mut self, stdio: Stdio) -> Self {
        self.options.stdout = Some(stdio);
        self
    }

    /// Require the standard error disposition.
    #[must_use]
    pub fn stderr(mut self, stdio: Stdio) -> Self {
        self.options.stderr = Some(stdio);
        self
    }

    /// Require the raw-arguments flag.
    #[must_use]
    pub fn windows_raw_arguments(mut self, raw: bool) -> Self {
        self.options.windows_raw_arguments = Some(raw);
        self
    }

    /// Attach an abort signal.
    ///
    /// The signal plays no part in matching. If it is aborted when this
    /// expectation is matched, the invocation fails with its reason.
    #[must_use]
    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// The attached abort signal, if any.
    #[must_use]
    pub fn abort_signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }

    /// Check whether every rule that was set holds for `invocation`.
    #[must_use]
    pub fn matches(&self, invocation: &Invocation) -> bool {
        let want = &self.options;
        let got = invocation.options();

        command_matches(self.command.as_deref(), invocation.program())
            && field_matches(want.args.as_ref(), got.args.as_ref())
            && field_matches(want.cwd.as_ref(), got.cwd.as_ref())
            && field_matches(want.clear_env.as_ref(), got.clear_env.as_ref())
            && field_matches(want.env.as_ref(), got.env.as_ref())
            && field_matches(want.uid.as_ref(), got.uid.as_ref())
            && field_matches(want.gid.as_ref(), got.gid.as_ref())
            && field_matches(want.stdin.as_ref(), got.stdin.as_ref())
            && field_matches(want.stdout.as_ref(), got.stdout.as_ref())
            && field_matches(want.stderr.as_ref(), got.stderr.as_ref())
            && field_matches(
                want.windows_raw_arguments.as_ref(),
                got.windows_raw_arguments.as_ref(),
            )
    }
}

impl From<&str> for Criteria {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

impl From<String> for Criteria {
    fn from(command: String) -> Self {
        Self::new(command)
    }
}

impl fmt::Debug for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Criteria");
        if let Some(command) = &self.command {
            s.field("command", command);
        }
        self.options.debug_fields(&mut s);
        if let Some(signal) = &self.signal {
            s.field("signal", signal);
        }
        s.finish()
    }
}

/// Unset identity matches anything; paths compare in normalized form.
fn command_matches(expected: Option<&str>, program: &Program) -> bool {
    expected.is_none_or(|want| program.normalized() == OsStr::new(want))
}

/// Unset rule matches anything, including an unset field.
fn field_matches<T: PartialEq>(expected: Option<&T>, actual: Option<&T>) -> bool {
    expected.is_none_or(|want| actual == Some(want))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::command::Command;

    fn invocation(build: impl FnOnce(&mut Command)) -> Invocation {
        let mut command = Command::new("deno");
        build(&mut command);
        command.invocation().clone()
    }

    #[test]
    fn test_any_matches_everything() {
        let criteria = Criteria::any();

        assert!(criteria.matches(&invocation(|_| {})));
        assert!(criteria.matches(&invocation(|c| {
            c.args(["fmt"]).env_clear().uid(0).stdout(Stdio::Piped);
        })));
        assert!(criteria.matches(&Invocation::new(PathBuf::from("/usr/bin/git"))));
    }

    #[test]
    fn test_command_exact_name() {
        let criteria = Criteria::new("deno");

        assert!(criteria.matches(&invocation(|_| {})));
        assert!(!criteria.matches(&Invocation::new("den")));
        assert!(!criteria.matches(&Invocation::new("./deno")));
    }

    #[test]
    fn test_command_path_is_normalized() {
        let criteria = Criteria::new("bin/deno");

        assert!(criteria.matches(&Invocation::new(Path::new("bin//./deno/"))));
        assert!(!criteria.matches(&Invocation::new("bin//deno")));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_name_is_not_lossy() {
        use std::os::unix::ffi::OsStrExt;

        let criteria = Criteria::new("f\u{fffd}");

        assert!(criteria.matches(&Invocation::new("f\u{fffd}")));
        assert!(!criteria.matches(&Invocation::new(OsStr::from_bytes(b"f\xff"))));
        assert!(!criteria.matches(&Invocation::new(Path::new(OsStr::from_bytes(b"f\xfe")))));
    }

    #[test]
    fn test_args_are_strict() {
        let criteria = Criteria::new("deno").args(["fmt"]);

        assert!(criteria.matches(&invocation(|c| {
            c.arg("fmt");
        })));
        assert!(!criteria.matches(&invocation(|_| {})));
        assert!(!criteria.matches(&invocation(|c| {
            c.args(["fmt", "--check"]);
        })));
        assert!(!criteria.matches(&invocation(|c| {
            c.arg("lint");
        })));
    }

    #[test]
    fn test_args_order_matters() {
        let criteria = Criteria::any().args(["a", "b"]);

        assert!(!criteria.matches(&invocation(|c| {
            c.args(["b", "a"]);
        })));
    }

    #[test]
    fn test_clear_env_false_requires_explicit_false() {
        let criteria = Criteria::any().clear_env(false);
        let explicit_false = CommandOptions {
            clear_env: Some(false),
            ..CommandOptions::default()
        };

        assert!(criteria.matches(&Invocation::with_options("deno", explicit_false)));
        assert!(!criteria.matches(&invocation(|_| {})));
        assert!(!criteria.matches(&invocation(|c| {
            c.env_clear();
        })));
    }

    #[test]
    fn test_uid_zero_is_a_constraint() {
        let criteria = Criteria::any().uid(0);

        assert!(criteria.matches(&invocation(|c| {
            c.uid(0);
        })));
        assert!(!criteria.matches(&invocation(|c| {
            c.uid(1000);
        })));
        assert!(!criteria.matches(&invocation(|_| {})));
    }

    #[test]
    fn test_env_is_compared_as_a_whole() {
        let criteria = Criteria::any().env("A", "1");

        assert!(criteria.matches(&invocation(|c| {
            c.env("A", "1");
        })));
        assert!(!criteria.matches(&invocation(|c| {
            c.env("A", "1").env("B", "2");
        })));
        assert!(!criteria.matches(&invocation(|c| {
            c.env("A", "2");
        })));
    }

    #[test]
    fn test_cwd_gid_and_stdio() {
        let criteria = Criteria::any()
            .current_dir("/work")
            .gid(20)
            .stdin(Stdio::Null)
            .stderr(Stdio::Inherit)
            .windows_raw_arguments(true);

        assert!(criteria.matches(&invocation(|c| {
            c.current_dir("/work")
                .gid(20)
                .stdin(Stdio::Null)
                .stderr(Stdio::Inherit)
                .windows_raw_arguments(true);
        })));
        assert!(!criteria.matches(&invocation(|c| {
            c.current_dir("/work")
                .gid(20)
                .stdin(Stdio::Piped)
                .stderr(Stdio::Inherit)
                .windows_raw_arguments(true);
        })));
    }

    #[test]
    fn test_signal_does_not_affect_matching() {
        let criteria = Criteria::new("deno").signal(AbortSignal::aborted("stop"));

        assert!(criteria.matches(&invocation(|_| {})));
        assert!(criteria.abort_signal().unwrap().is_aborted());
    }

    #[test]
    fn test_debug_is_deterministic() {
        let criteria = Criteria::new("deno")
            .envs([("Z", "1"), ("A", "2")])
            .uid(0)
            .signal(AbortSignal::default());

        assert_eq!(
            format!("{criteria:?}"),
            r#"Criteria { command: "deno", env: {"A": "2", "Z": "1"}, uid: 0, signal: AbortSignal { aborted: false } }"#
        );
        assert_eq!(format!("{:?}", Criteria::from("deno")), r#"Criteria { command: "deno" }"#);
        assert_eq!(format!("{:?}", Criteria::any()), "Criteria");
    }
}
