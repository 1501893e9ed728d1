//! # gcloud Invocation
//!
//! Builds the `gcloud functions deploy` command line and runs it.
//!
//! - [`DeployCommand`]: argument vector built from [`crate::config::DeployConfig`] and the API key
//! - [`CommandRunner`]: seam over process execution; [`SystemRunner`] spawns gcloud

mod command;
mod runner;

pub use command::{format_env_var_assignment, DeployCommand};
pub use runner::{CommandOutcome, CommandRunner, SystemRunner};
