//! Moderation Agent Deploy Library
//!
//! Deploys the content moderation agent to Google Cloud Functions with
//! `gcloud functions deploy`, after resolving and checking its API key.
//! Tests are included in the module files and under `tests/`.

pub mod cli;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod error;
pub mod gcloud;
pub mod runtime;
pub mod secret;

pub use config::DeployConfig;
pub use deploy::Deployer;
pub use error::DeployError;
