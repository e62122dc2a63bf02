//! Integration tests for the `#[testkit_command::test]` macro.

#![cfg(feature = "macros")]

use testkit_command::mock::{interception_mode, serial_guard, InterceptionMode};
use testkit_command::prelude::*;

/// Expectations registered and consumed inside one test.
#[testkit_command::test]
fn test_sync_lifecycle() {
    expect_command(
        Criteria::new("deno").args(["fmt", "--check"]),
        OutputSpec::new().stdout("Checked 3 files"),
    );

    let output = Command::new("deno")
        .args(["fmt", "--check"])
        .output()
        .unwrap();

    assert_eq!(output.stdout_lossy(), "Checked 3 files");
    assert_eq!(interception_mode(), InterceptionMode::Local);
}

/// The body's value is returned through the wrapper.
#[testkit_command::test]
fn test_result_return() -> Result<()> {
    expect_command("git", OutputSpec::new().code(0));
    Command::new("git").output()?;
    Ok(())
}

/// Leftover expectations fail the test.
#[testkit_command::test]
#[should_panic(expected = "expected more command invocations")]
fn test_leftover_expectation_panics() {
    expect_command("deno", OutputSpec::new());
}

/// A panic in the body wins over the leftover report.
#[testkit_command::test]
#[should_panic(expected = "boom")]
fn test_body_panic_is_reraised() {
    expect_command("deno", OutputSpec::new());
    panic!("boom");
}

/// The serialization lock can be taken again from inside a test body.
#[testkit_command::test]
fn test_serial_guard_inside_body() {
    let _guard = serial_guard();
    expect_command("deno", OutputSpec::new());

    Command::new("deno").output().unwrap();
}

/// Global mode blocks unregistered commands for the whole test.
#[testkit_command::test(global = true)]
fn test_global_mode() {
    assert_eq!(interception_mode(), InterceptionMode::Global);

    let error = Command::new("rm").args(["-rf", "/"]).output().unwrap_err();
    assert!(matches!(error, Error::UnhandledInvocation(_)));

    expect_command("deno", OutputSpec::new());
    Command::new("deno").output().unwrap();
    reset_interception().unwrap();

    assert_eq!(interception_mode(), InterceptionMode::Global);
}

/// Async test with the default flavor.
#[testkit_command::test]
async fn test_async_lifecycle() {
    expect_command("deno", OutputSpec::new().stdout("async"));

    let output = Command::new("deno").output_async().await.unwrap();

    assert_eq!(output.stdout, b"async");
}

/// Async test on the multi-threaded runtime.
#[testkit_command::test(flavor = "multi_thread", global = true)]
async fn test_async_multi_thread() {
    let handle = tokio::spawn(async {
        let mut command = Command::new("deno");
        command.arg("--version");
        command.output_async().await
    });

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(Error::UnhandledInvocation(_))));
}
