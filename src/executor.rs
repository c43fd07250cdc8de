use crate::errors::CoreError;
use crate::models::CommandOutput;
use std::process::Command;
use tracing::trace;

/// Boundary to whatever runs shell command strings.
///
/// Keeping this trait narrow makes it easy to write deterministic tests with
/// scripted output and to plug in an already open privileged session.
pub trait CommandExecutor: Send + Sync {
    /// Runs `command` and captures stdout/stderr lines plus the exit code. A
    /// non-zero exit code is not an error at this level.
    fn execute(&self, command: &str) -> crate::Result<CommandOutput>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn execute(&self, command: &str) -> crate::Result<CommandOutput> {
        (**self).execute(command)
    }
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for Box<E> {
    fn execute(&self, command: &str) -> crate::Result<CommandOutput> {
        (**self).execute(command)
    }
}

/// Executor that hands each command to a fresh shell process.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    program: String,
    args: Vec<String>,
}

impl ProcessExecutor {
    /// Unprivileged `sh -c <command>`.
    pub fn sh() -> Self {
        Self::new("sh", ["-c"])
    }

    /// Privileged `su -c <command>`.
    pub fn su() -> Self {
        Self::new("su", ["-c"])
    }

    /// Any launcher; the command string is appended as the last argument.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::sh()
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, command: &str) -> crate::Result<CommandOutput> {
        trace!(program = %self.program, command, "spawning shell");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .output()
            .map_err(|err| CoreError::io(&self.program, err))?;

        Ok(CommandOutput::from_raw(
            command,
            &output.stdout,
            &output.stderr,
            // Killed by a signal.
            output.status.code().unwrap_or(-1),
        ))
    }
}
