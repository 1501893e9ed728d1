//! # Command Line
//!
//! Flags that override the environment-derived [`DeployConfig`].
//!
//! ```bash
//! # Deploy with defaults, reading GOOGLE_API_KEY from ../.env
//! deploy-moderation-agent
//!
//! # Deploy to another project and region
//! deploy-moderation-agent --project walking-app-staging --region europe-west1
//!
//! # Show the gcloud command without running it
//! deploy-moderation-agent --dry-run
//! ```

use crate::config::{AccessPolicy, DeployConfig};
use clap::Parser;
use std::path::PathBuf;

/// Deploy the content moderation agent to Google Cloud Functions
#[derive(Parser, Debug, Default)]
#[command(name = "deploy-moderation-agent")]
#[command(about = "Deploy the content moderation agent to Google Cloud Functions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Cloud Function name
    #[arg(long)]
    pub function_name: Option<String>,

    /// GCP region
    #[arg(short, long)]
    pub region: Option<String>,

    /// GCP project ID
    #[arg(short, long)]
    pub project: Option<String>,

    /// Functions runtime (e.g. python311)
    #[arg(long)]
    pub runtime: Option<String>,

    /// Handler exported by the function source
    #[arg(long)]
    pub entry_point: Option<String>,

    /// Function source directory
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Env file to read GOOGLE_API_KEY from
    #[arg(short, long)]
    pub env_file: Option<PathBuf>,

    /// gcloud executable
    #[arg(long)]
    pub gcloud_bin: Option<String>,

    /// Require IAM authentication to call the function
    #[arg(long)]
    pub no_allow_unauthenticated: bool,

    /// Print the gcloud command (API key redacted) without running it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Apply flags on top of `config`
    pub fn apply(&self, mut config: DeployConfig) -> DeployConfig {
        if let Some(ref name) = self.function_name {
            config.function_name.clone_from(name);
        }
        if let Some(ref region) = self.region {
            config.region.clone_from(region);
        }
        if let Some(ref project) = self.project {
            config.project_id.clone_from(project);
        }
        if let Some(ref runtime) = self.runtime {
            config.runtime.clone_from(runtime);
        }
        if let Some(ref entry_point) = self.entry_point {
            config.entry_point.clone_from(entry_point);
        }
        if let Some(ref source) = self.source {
            config.source_dir.clone_from(source);
        }
        if let Some(ref env_file) = self.env_file {
            config.env_file.clone_from(env_file);
        }
        if let Some(ref gcloud_bin) = self.gcloud_bin {
            config.gcloud_bin.clone_from(gcloud_bin);
        }
        if self.no_allow_unauthenticated {
            config.access = AccessPolicy::RequireAuthentication;
        }
        config
    }
}
