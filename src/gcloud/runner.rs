//! # Command Runner
//!
//! Executes a [`DeployCommand`] and reports how it exited.

use super::DeployCommand;
use crate::error::DeployError;
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// Exit of an executed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for CommandOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Process execution seam
pub trait CommandRunner {
    /// Run `command` to completion
    ///
    /// # Errors
    ///
    /// Returns an error only when the command could not be started; a non-zero
    /// exit is reported through [`CommandOutcome`].
    fn run(&self, command: &DeployCommand) -> Result<CommandOutcome, DeployError>;
}

/// Runs gcloud as a child process with inherited stdio
///
/// gcloud's own progress output and diagnostics go straight to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &DeployCommand) -> Result<CommandOutcome, DeployError> {
        let program =
            which::which(command.program()).map_err(|source| DeployError::ToolNotFound {
                program: command.program().to_string(),
                source,
            })?;

        info!(program = %program.display(), "Running {}", command);

        let status = Command::new(&program)
            .args(command.args())
            .status()
            .map_err(|source| DeployError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        let outcome = CommandOutcome::from(status);
        if !outcome.success() {
            debug!("{} exited with {:?}", command.program(), outcome.code);
        }
        Ok(outcome)
    }
}
