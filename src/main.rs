//! # Moderation Agent Deploy
//!
//! Deploys the content moderation agent (an HTTP Cloud Function) to Google Cloud.
//!
//! ## Overview
//!
//! 1. **Resolve configuration** - compiled defaults, `DEPLOY_*` environment variables, then flags
//! 2. **Load the API key** - `GOOGLE_API_KEY` from the env file (default `../.env`) or the environment
//! 3. **Deploy** - runs `gcloud functions deploy` with the key as the function's env var
//!
//! ## Exit codes
//!
//! - `0`: deployed (or dry run)
//! - `1`: configuration error, e.g. missing `GOOGLE_API_KEY`
//! - `127`: gcloud not found
//! - anything else: gcloud's own exit status

use clap::Parser;
use moderation_agent_deploy::cli::Cli;
use moderation_agent_deploy::config::load_config;
use moderation_agent_deploy::gcloud::SystemRunner;
use moderation_agent_deploy::runtime::initialization::init_tracing;
use moderation_agent_deploy::{DeployError, Deployer};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(load_config());

    let deployer = Deployer::new(config, SystemRunner).dry_run(cli.dry_run);
    let mut stdout = std::io::stdout().lock();

    match deployer.deploy(&mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // gcloud has already reported its own failure
            if !matches!(err, DeployError::CommandFailed { .. }) {
                eprintln!("❌ Error: {err}");
                if let Some(hint) = err.remediation() {
                    eprintln!("   {hint}");
                }
            }
            ExitCode::from(err.exit_code())
        }
    }
}
