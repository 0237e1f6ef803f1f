use crate::command::ExitCode;
use crate::error::{AliasError, ENGINE_FAILURE, Result};
use std::process::{Command, ExitStatus};

/// Hand a composed command line to the host shell and wait for it.
///
/// The child inherits stdin, stdout and stderr. The returned code is the
/// child's exit status, or `128 + signal` when it was killed by a signal.
pub fn run(command_line: &str) -> Result<ExitCode> {
    log::info!("running `{command_line}`");
    let exit_status = host_shell(command_line)
        .status()
        .map_err(|source| AliasError::Spawn {
            command: command_line.to_owned(),
            source,
        })?;
    Ok(exit_status
        .code()
        .unwrap_or_else(|| signal_status(exit_status)))
}

#[cfg(unix)]
fn host_shell(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn host_shell(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command_line);
    cmd
}

/// Status for a shell that did not exit on its own, as an interactive shell
/// would report it.
#[cfg(unix)]
fn signal_status(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    exit_status.signal().map_or(ENGINE_FAILURE, |signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_status(_exit_status: ExitStatus) -> ExitCode {
    ENGINE_FAILURE
}
