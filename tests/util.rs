#![allow(dead_code)]
use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

pub const NO_OUTPUT: &str = "";
pub const SUCCESS: i32 = 0;
pub const COMPILE_ERROR: i32 = 65;
pub const RUNTIME_ERROR: i32 = 70;

/// Writes `input` to a temp file, runs the interpreter binary on it with
/// the given command, and returns (stdout, stderr, exit code).
pub fn run_command(command: &str, input: &str) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    write!(temp_file, "{input}").expect("Failed to write to temp file");

    let mut cmd = Command::cargo_bin("rlox").expect("Binary not found");
    cmd.args([command, temp_file.path().to_str().unwrap()]);

    let output = cmd.output().expect("Failed to run binary");

    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(-1),
    )
}

pub fn assert_command(
    command: &str,
    input: &str,
    expected: &str,
    expected_error: &str,
    expected_code: i32,
) {
    let (stdout, stderr, code) = run_command(command, input);

    assert_eq!(stdout, expected, "stdout mismatch for input:\n{input}");
    assert_eq!(stderr, expected_error, "stderr mismatch for input:\n{input}");
    assert_eq!(code, expected_code, "exit code mismatch for input:\n{input}");
}

pub fn assert_tokenize(input: &str, expected: &str) {
    assert_command("tokenize", input, expected, NO_OUTPUT, SUCCESS);
}

/// The `parse` and `evaluate` commands print exactly one line; `expected`
/// is that line without the trailing newline.
pub fn assert_parse(input: &str, expected: &str) {
    assert_command("parse", input, &format!("{expected}\n"), NO_OUTPUT, SUCCESS);
}

pub fn assert_evaluate(input: &str, expected: &str) {
    assert_command(
        "evaluate",
        input,
        &format!("{expected}\n"),
        NO_OUTPUT,
        SUCCESS,
    );
}

pub fn assert_run(input: &str, expected: &str) {
    assert_command("run", input, expected, NO_OUTPUT, SUCCESS);
}

/// A program that fails before execution: syntax or resolution. Nothing
/// reaches stdout and the process exits 65.
pub fn assert_compile_error(input: &str, expected_error: &str) {
    assert_command("run", input, NO_OUTPUT, expected_error, COMPILE_ERROR);
}

/// A program that dies at runtime: whatever printed before the error stays
/// on stdout, the error lands on stderr, and the process exits 70.
pub fn assert_runtime_error(input: &str, expected: &str, expected_error: &str) {
    assert_command("run", input, expected, expected_error, RUNTIME_ERROR);
}
