//! Thin helpers around [std::process::Command] for the external tools `gh-ark` drives.

use crate::errors::{ArkError, ArkResult};
use itertools::Itertools;
use std::process::{Command, ExitStatus, Output};
use tracing::debug;

/// Runs the command to completion, capturing stdout and stderr. A non-zero exit status is
/// not an error here; use [run] for that.
pub fn output(command: &mut Command) -> ArkResult<Output> {
    let (program, args) = describe(command);
    debug!(%program, ?args, "Running command");
    command
        .output()
        .map_err(|source| ArkError::Spawn { program, source })
}

/// Runs the command to completion, capturing its output, and fails with [ArkError::Command]
/// on a non-zero exit status.
pub fn run(command: &mut Command) -> ArkResult<Output> {
    let output = output(command)?;
    if !output.status.success() {
        return Err(failure(command, &output));
    }
    Ok(output)
}

/// Runs the command with inherited stdio, for steps the user interacts with.
pub fn interactive(command: &mut Command) -> ArkResult<ExitStatus> {
    let (program, args) = describe(command);
    debug!(%program, ?args, "Running interactive command");
    command
        .status()
        .map_err(|source| ArkError::Spawn { program, source })
}

/// Builds the [ArkError::Command] describing a failed invocation.
pub fn failure(command: &Command, output: &Output) -> ArkError {
    let (program, args) = describe(command);
    ArkError::Command {
        program,
        args,
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Returns the trimmed stdout of a finished command.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn describe(command: &Command) -> (String, Vec<String>) {
    let program = command.get_program().to_string_lossy().into_owned();
    let args = command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect_vec();
    (program, args)
}
