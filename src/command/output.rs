//! Command results and the partial specs they are synthesized from.

use std::borrow::Cow;
use std::process::ExitStatus;

/// The collected outcome of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Bytes written to standard output.
    pub stdout: Vec<u8>,
    /// Bytes written to standard error.
    pub stderr: Vec<u8>,
    /// Exit code.
    pub code: i32,
    /// Whether the command succeeded.
    pub success: bool,
    /// Name of the signal that terminated the command, if any.
    pub signal: Option<String>,
}

impl Output {
    /// Standard output decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Standard error decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

impl Default for Output {
    fn default() -> Self {
        OutputSpec::default().into_output()
    }
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        let (code, signal) = termination(output.status);
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            code,
            success: output.status.success(),
            signal,
        }
    }
}

#[cfg(unix)]
fn termination(status: ExitStatus) -> (i32, Option<String>) {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => (code, None),
        (None, Some(signo)) => (128 + signo, Some(signal_name(signo))),
        (None, None) => (-1, None),
    }
}

#[cfg(not(unix))]
fn termination(status: ExitStatus) -> (i32, Option<String>) {
    (status.code().unwrap_or(-1), None)
}

// Only numbers that agree across Linux and the BSDs are named.
#[cfg(unix)]
fn signal_name(signo: i32) -> String {
    let name = match signo {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        4 => "SIGILL",
        5 => "SIGTRAP",
        6 => "SIGABRT",
        8 => "SIGFPE",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        other => return format!("SIG{other}"),
    };
    name.to_string()
}

/// A partial [`Output`]: every field left as `None` takes its default.
///
/// Defaults are empty stdout and stderr, code `0`, success `true` and no
/// signal. Fields are independent, so setting a non-zero `code` alone still
/// yields `success == true`.
///
/// # Example
///
/// ```rust
/// use testkit_command::command::OutputSpec;
///
/// let output = OutputSpec::new().stdout("hello").code(3).into_output();
///
/// assert_eq!(output.stdout, b"hello");
/// assert_eq!(output.code, 3);
/// assert!(output.success);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
    /// Standard output bytes.
    pub stdout: Option<Vec<u8>>,
    /// Standard error bytes.
    pub stderr: Option<Vec<u8>>,
    /// Exit code.
    pub code: Option<i32>,
    /// Success flag.
    pub success: Option<bool>,
    /// Terminating signal name.
    pub signal: Option<String>,
}

impl OutputSpec {
    /// Create an empty spec; it synthesizes the all-default output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set standard output.
    #[must_use]
    pub fn stdout(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdout = Some(bytes.into());
        self
    }

    /// Set standard error.
    #[must_use]
    pub fn stderr(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stderr = Some(bytes.into());
        self
    }

    /// Set the exit code.
    #[must_use]
    pub fn code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the success flag.
    #[must_use]
    pub fn success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    /// Set the terminating signal name.
    #[must_use]
    pub fn signal(mut self, name: impl Into<String>) -> Self {
        self.signal = Some(name.into());
        self
    }

    /// Fill every unset field with its default.
    #[must_use]
    pub fn into_output(self) -> Output {
        Output {
            stdout: self.stdout.unwrap_or_default(),
            stderr: self.stderr.unwrap_or_default(),
            code: self.code.unwrap_or(0),
            success: self.success.unwrap_or(true),
            signal: self.signal,
        }
    }
}

impl From<OutputSpec> for Output {
    fn from(spec: OutputSpec) -> Self {
        spec.into_output()
    }
}

impl From<Output> for OutputSpec {
    fn from(output: Output) -> Self {
        Self {
            stdout: Some(output.stdout),
            stderr: Some(output.stderr),
            code: Some(output.code),
            success: Some(output.success),
            signal: output.signal,
        }
    }
}
