//! # Deployment Configuration
//!
//! Deployment parameters for the moderation agent Cloud Function.
//!
//! All configuration has sensible defaults (see [`crate::constants`]) and can be
//! overridden via `DEPLOY_*` environment variables, which in turn are overridden by
//! command-line flags.

mod deploy;

pub use deploy::{AccessPolicy, DeployConfig, TriggerMode};

/// Load configuration from environment variables with defaults
pub fn load_config() -> DeployConfig {
    DeployConfig::from_env()
}
