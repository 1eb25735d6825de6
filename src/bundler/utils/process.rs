//! External tool execution for bundling steps.

use crate::bundler::{
    builder::Step,
    error::{Error, Result},
};
use std::process::Stdio;
use tokio::process::Command;

/// Renders a command line for logs and errors.
pub fn describe(command: &Command) -> String {
    let std = command.as_std();
    let mut line = std.get_program().to_string_lossy().into_owned();
    for arg in std.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Runs `command` to completion on behalf of `step`.
///
/// Returns [`Error::CommandFailed`] when the program cannot be spawned and
/// [`Error::StepFailed`] with the captured output when it exits non-zero.
pub async fn run_step(step: Step, command: &mut Command) -> Result<()> {
    let line = describe(command);
    log::debug!("[{}] {}", step, line);

    let output = command
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: line.clone(),
            error,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        log::debug!("[{}] failed: {}", step, stderr.trim());
        return Err(Error::StepFailed {
            step,
            code: output.status.code(),
            stdout,
            stderr,
        });
    }

    if !stdout.trim().is_empty() {
        log::trace!("[{}] stdout:\n{}", step, stdout);
    }
    if !stderr.trim().is_empty() {
        log::trace!("[{}] stderr:\n{}", step, stderr);
    }

    Ok(())
}
