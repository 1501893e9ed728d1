//! # Deploy Command
//!
//! Argument vector for `gcloud functions deploy`.

use crate::config::DeployConfig;
use crate::constants::{ENV_VAR_DELIMITER_CANDIDATES, REDACTED};
use crate::error::DeployError;
use crate::secret::Secret;
use std::fmt;
use zeroize::Zeroize;

/// `gcloud functions deploy` invocation
///
/// Holds the API key inside its `--set-env-vars` argument, so `Debug` and
/// `Display` redact it and the arguments are wiped on drop.
pub struct DeployCommand {
    program: String,
    args: Vec<String>,
    secret_arg: usize,
}

impl DeployCommand {
    /// Build the command for `config`, passing `secret` as the function's only env var
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::MalformedSecret`] if the value cannot be expressed
    /// as a `--set-env-vars` argument.
    pub fn build(config: &DeployConfig, secret: &Secret) -> Result<Self, DeployError> {
        let mut args = vec![
            "functions".to_string(),
            "deploy".to_string(),
            config.function_name.clone(),
            "--gen2".to_string(),
            format!("--runtime={}", config.runtime),
            format!("--region={}", config.region),
            format!("--source={}", config.source_dir.display()),
            format!("--entry-point={}", config.entry_point),
            config.trigger.as_flag().to_string(),
            config.access.as_flag().to_string(),
        ];

        let secret_arg = args.len();
        args.push(format!(
            "--set-env-vars={}",
            format_env_var_assignment(secret.key(), secret.expose())?
        ));
        args.push(format!("--project={}", config.project_id));

        Ok(Self {
            program: config.gcloud_bin.clone(),
            args,
            secret_arg,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments as passed to the process (secret included)
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments with the secret value replaced
    pub fn redacted_args(&self) -> Vec<String> {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if i == self.secret_arg {
                    redact_assignment(arg)
                } else {
                    arg.clone()
                }
            })
            .collect()
    }
}

impl fmt::Display for DeployCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.redacted_args().join(" "))
    }
}

impl fmt::Debug for DeployCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployCommand")
            .field("program", &self.program)
            .field("args", &self.redacted_args())
            .finish()
    }
}

impl Drop for DeployCommand {
    fn drop(&mut self) {
        self.args.zeroize();
    }
}

/// Format `KEY=VALUE` for gcloud's `--set-env-vars`
///
/// gcloud splits the list on `,`. Values containing a comma switch the separator
/// with the `^<delim>^` prefix, using the first candidate absent from the assignment.
///
/// # Errors
///
/// Returns [`DeployError::MalformedSecret`] for values with line breaks, or with a
/// comma and every candidate delimiter.
pub fn format_env_var_assignment(key: &str, value: &str) -> Result<String, DeployError> {
    let malformed = |reason: &'static str| DeployError::MalformedSecret {
        key: key.to_string(),
        reason,
    };

    if value.contains(['\n', '\r']) {
        return Err(malformed("value contains a line break"));
    }

    if !value.contains(',') {
        return Ok(format!("{key}={value}"));
    }

    ENV_VAR_DELIMITER_CANDIDATES
        .iter()
        .find(|d| !key.contains(**d) && !value.contains(**d))
        .map(|d| format!("^{d}^{key}={value}"))
        .ok_or_else(|| malformed("value contains ',' and every alternate delimiter"))
}

/// `--set-env-vars=[^d^]KEY=<redacted>`
fn redact_assignment(arg: &str) -> String {
    match arg.split_once('=') {
        Some((flag, assignment)) => match assignment.split_once('=') {
            Some((key, _)) => format!("{flag}={key}={REDACTED}"),
            None => format!("{flag}={REDACTED}"),
        },
        None => REDACTED.to_string(),
    }
}
