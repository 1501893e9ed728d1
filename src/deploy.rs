//! # Deployment
//!
//! Runs one deployment of the moderation agent:
//!
//! 1. Validate the configuration
//! 2. Resolve the API key (env file, then process environment)
//! 3. Build the gcloud command
//! 4. Print the progress message and run gcloud
//! 5. Print the success message
//!
//! Each step returns a `Result` checked before the next one starts; the first
//! failure ends the deployment. There are no retries.

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::gcloud::{CommandRunner, DeployCommand};
use crate::secret::resolve_secret;
use std::io::Write;
use tracing::{debug, info};

/// Deploys the configured function through a [`CommandRunner`]
#[derive(Debug)]
pub struct Deployer<R> {
    config: DeployConfig,
    runner: R,
    dry_run: bool,
}

impl<R: CommandRunner> Deployer<R> {
    pub fn new(config: DeployConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            dry_run: false,
        }
    }

    /// Print the command instead of running it
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Deploy, reading the API key from the process environment when the env file lacks it
    ///
    /// # Errors
    ///
    /// See [`Deployer::deploy_with`].
    pub fn deploy<W: Write>(&self, out: &mut W) -> Result<(), DeployError> {
        self.deploy_with(|key| std::env::var(key).ok(), out)
    }

    /// Deploy, with `lookup` standing in for the process environment
    ///
    /// Progress and success messages are written to `out`.
    ///
    /// # Errors
    ///
    /// - Configuration errors before gcloud runs (see [`DeployError::is_configuration_error`])
    /// - [`DeployError::ToolNotFound`] / [`DeployError::Spawn`] if gcloud cannot start
    /// - [`DeployError::CommandFailed`] if gcloud exits unsuccessfully
    pub fn deploy_with<F, W>(&self, lookup: F, out: &mut W) -> Result<(), DeployError>
    where
        F: Fn(&str) -> Option<String>,
        W: Write,
    {
        let config = &self.config;
        config.validate()?;

        let secret = resolve_secret(&config.secret_key, &config.env_file, lookup)?;
        let command = DeployCommand::build(config, &secret)?;

        if self.dry_run {
            info!("Dry run, gcloud will not be invoked");
            writeln!(out, "Dry run: {command}").map_err(DeployError::Output)?;
            return Ok(());
        }

        writeln!(
            out,
            "🚀 Deploying {} to {}...",
            config.function_name, config.region
        )
        .map_err(DeployError::Output)?;

        let outcome = self.runner.run(&command)?;
        if !outcome.success() {
            debug!(
                function = %config.function_name,
                code = ?outcome.code,
                "Deployment failed"
            );
            return Err(DeployError::CommandFailed { code: outcome.code });
        }

        info!(
            function = %config.function_name,
            region = %config.region,
            project = %config.project_id,
            "Deployment complete"
        );
        writeln!(
            out,
            "✅ Deployment complete: {} is live in {} (project {})",
            config.function_name, config.region, config.project_id
        )
        .map_err(DeployError::Output)?;

        Ok(())
    }
}
