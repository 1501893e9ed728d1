//! # Deployment Error Types
//!
//! Defines the errors a deployment can end with, classified into local
//! configuration errors (detected before gcloud runs) and invocation failures.
//! Each error maps to a process exit status and, where useful, remediation guidance.

use crate::constants::{EXIT_CONFIG_ERROR, EXIT_TOOL_NOT_FOUND};
use std::path::PathBuf;
use thiserror::Error;

/// Deployment error
#[derive(Debug, Error)]
pub enum DeployError {
    /// Secret absent from both the env file and the process environment, or empty
    #[error("{key} is not set or empty (expected in {} or the environment)", .env_file.display())]
    MissingSecret { key: String, env_file: PathBuf },

    /// Env file exists but could not be read or parsed
    #[error("failed to read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Secret key defined more than once in the env file
    #[error("{key} is defined {count} times in {}", .path.display())]
    DuplicateKey {
        key: String,
        path: PathBuf,
        count: usize,
    },

    /// Secret value cannot be expressed as a gcloud `--set-env-vars` argument
    #[error("{key} cannot be passed to gcloud: {reason}")]
    MalformedSecret { key: String, reason: &'static str },

    /// Deployment parameter failed validation
    #[error("invalid deployment configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// gcloud not found on PATH
    #[error("'{program}' was not found on PATH")]
    ToolNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// gcloud found but could not be started
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// gcloud ran and reported failure
    #[error("deployment command failed ({})", describe_exit(.code))]
    CommandFailed { code: Option<i32> },

    /// Progress or success message could not be written
    #[error("failed to write console output: {0}")]
    Output(#[source] std::io::Error),
}

impl DeployError {
    /// Process exit status for this error
    ///
    /// Configuration errors exit with 1, a missing or unstartable gcloud with 127,
    /// and gcloud failures propagate gcloud's own status (truncated to 8 bits like a shell).
    pub fn exit_code(&self) -> u8 {
        match self {
            DeployError::ToolNotFound { .. } | DeployError::Spawn { .. } => EXIT_TOOL_NOT_FOUND,
            DeployError::CommandFailed { code } => propagated_exit_code(*code),
            DeployError::MissingSecret { .. }
            | DeployError::EnvFile { .. }
            | DeployError::DuplicateKey { .. }
            | DeployError::MalformedSecret { .. }
            | DeployError::InvalidConfig { .. }
            | DeployError::Output(_) => EXIT_CONFIG_ERROR,
        }
    }

    /// Whether the error was detected locally, before gcloud was invoked
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DeployError::MissingSecret { .. }
                | DeployError::EnvFile { .. }
                | DeployError::DuplicateKey { .. }
                | DeployError::MalformedSecret { .. }
                | DeployError::InvalidConfig { .. }
        )
    }

    /// Get remediation guidance for this error
    ///
    /// gcloud failures return `None`: gcloud has already printed its own diagnostics.
    pub fn remediation(&self) -> Option<String> {
        match self {
            DeployError::MissingSecret { key, env_file } => Some(format!(
                "Add '{key}=<your key>' to {} or export {key} before deploying.",
                env_file.display()
            )),
            DeployError::EnvFile { path, .. } => Some(format!(
                "Fix {} so every line is KEY=VALUE (comments start with '#').",
                path.display()
            )),
            DeployError::DuplicateKey { key, path, .. } => Some(format!(
                "Keep a single {key} entry in {}.",
                path.display()
            )),
            DeployError::MalformedSecret { key, .. } => Some(format!(
                "Check the value of {key}; API keys are a single line without unusual separators."
            )),
            DeployError::InvalidConfig { .. } => Some(
                "Check the DEPLOY_* environment variables and command-line flags.".to_string(),
            ),
            DeployError::ToolNotFound { program, .. } | DeployError::Spawn { program, .. } => {
                Some(format!(
                    "Install the Google Cloud SDK or point --gcloud-bin at '{program}'."
                ))
            }
            DeployError::CommandFailed { .. } | DeployError::Output(_) => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Shell-style propagation: the low 8 bits of the status, never 0 for a failure
fn propagated_exit_code(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c.rem_euclid(256)).ok())
        .filter(|c| *c != 0)
        .unwrap_or(EXIT_CONFIG_ERROR)
}
