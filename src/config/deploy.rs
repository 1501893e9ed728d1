//! # Deploy Configuration
//!
//! Function, region, project and invocation settings loaded from environment variables.

use crate::constants::{
    DEFAULT_ENTRY_POINT, DEFAULT_ENV_FILE, DEFAULT_FUNCTION_NAME, DEFAULT_GCLOUD_BIN,
    DEFAULT_PROJECT_ID, DEFAULT_REGION, DEFAULT_RUNTIME, DEFAULT_SOURCE_DIR, SECRET_ENV_KEY,
};
use crate::error::DeployError;
use std::path::PathBuf;
use std::str::FromStr;

/// How the deployed function is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// HTTPS endpoint (`--trigger-http`)
    #[default]
    Http,
}

impl TriggerMode {
    pub fn as_flag(self) -> &'static str {
        match self {
            TriggerMode::Http => "--trigger-http",
        }
    }
}

/// Who may call the deployed function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Public endpoint (`--allow-unauthenticated`)
    #[default]
    AllowUnauthenticated,
    /// IAM-authenticated callers only (`--no-allow-unauthenticated`)
    RequireAuthentication,
}

impl AccessPolicy {
    pub fn from_allow_unauthenticated(allow: bool) -> Self {
        if allow {
            AccessPolicy::AllowUnauthenticated
        } else {
            AccessPolicy::RequireAuthentication
        }
    }

    pub fn as_flag(self) -> &'static str {
        match self {
            AccessPolicy::AllowUnauthenticated => "--allow-unauthenticated",
            AccessPolicy::RequireAuthentication => "--no-allow-unauthenticated",
        }
    }
}

/// Cloud Function deployment configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// gcloud executable name or path
    pub gcloud_bin: String,
    /// Cloud Function name
    pub function_name: String,
    /// GCP region
    pub region: String,
    /// GCP project ID
    pub project_id: String,
    /// Functions runtime (e.g. `python311`)
    pub runtime: String,
    /// Exported handler in the function source
    pub entry_point: String,
    /// Directory uploaded as the function source
    pub source_dir: PathBuf,
    pub trigger: TriggerMode,
    pub access: AccessPolicy,
    /// Environment variable name of the API key passed to the function
    pub secret_key: String,
    /// Env file the API key is read from when present
    pub env_file: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            gcloud_bin: DEFAULT_GCLOUD_BIN.to_string(),
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            trigger: TriggerMode::default(),
            access: AccessPolicy::default(),
            secret_key: SECRET_ENV_KEY.to_string(),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
        }
    }
}

impl DeployConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup with defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let allow_unauthenticated = var_or_default(
            &lookup,
            "DEPLOY_ALLOW_UNAUTHENTICATED",
            defaults.access == AccessPolicy::AllowUnauthenticated,
        );

        Self {
            gcloud_bin: var_or_default(&lookup, "DEPLOY_GCLOUD_BIN", defaults.gcloud_bin),
            function_name: var_or_default(&lookup, "DEPLOY_FUNCTION_NAME", defaults.function_name),
            region: var_or_default(&lookup, "DEPLOY_REGION", defaults.region),
            project_id: var_or_default(&lookup, "DEPLOY_PROJECT_ID", defaults.project_id),
            runtime: var_or_default(&lookup, "DEPLOY_RUNTIME", defaults.runtime),
            entry_point: var_or_default(&lookup, "DEPLOY_ENTRY_POINT", defaults.entry_point),
            source_dir: var_or_default(&lookup, "DEPLOY_SOURCE_DIR", defaults.source_dir),
            trigger: defaults.trigger,
            access: AccessPolicy::from_allow_unauthenticated(allow_unauthenticated),
            secret_key: defaults.secret_key,
            env_file: var_or_default(&lookup, "DEPLOY_ENV_FILE", defaults.env_file),
        }
    }

    /// Check every parameter before anything is read or executed
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), DeployError> {
        require_non_empty("gcloud_bin", &self.gcloud_bin)?;
        require_non_empty("secret_key", &self.secret_key)?;

        for (field, value) in [
            ("function_name", &self.function_name),
            ("region", &self.region),
            ("project_id", &self.project_id),
            ("runtime", &self.runtime),
            ("entry_point", &self.entry_point),
        ] {
            require_identifier(field, value)?;
        }

        if self.env_file.as_os_str().is_empty() {
            return Err(invalid("env_file", "must not be empty"));
        }

        if !self.source_dir.is_dir() {
            return Err(DeployError::InvalidConfig {
                field: "source_dir",
                reason: format!("{} is not a directory", self.source_dir.display()),
            });
        }

        Ok(())
    }
}

/// Read a variable or return the default value
///
/// Blank and unparsable values fall back to the default.
fn var_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn invalid(field: &'static str, reason: &str) -> DeployError {
    DeployError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), DeployError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

fn require_identifier(field: &'static str, value: &str) -> Result<(), DeployError> {
    require_non_empty(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(invalid(field, "must not contain whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeployConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config, DeployConfig::default());
        assert_eq!(config.function_name, "moderation-agent");
        assert_eq!(config.region, "us-central1");
        assert_eq!(config.runtime, "python311");
        assert_eq!(config.entry_point, "moderate_content");
        assert_eq!(config.secret_key, "GOOGLE_API_KEY");
        assert_eq!(config.trigger, TriggerMode::Http);
        assert_eq!(config.access, AccessPolicy::AllowUnauthenticated);
    }

    #[test]
    fn test_env_overrides() {
        let config = DeployConfig::from_lookup(lookup_from(&[
            ("DEPLOY_FUNCTION_NAME", "moderation-agent-staging"),
            ("DEPLOY_REGION", "europe-west1"),
            ("DEPLOY_PROJECT_ID", "walking-app-staging"),
            ("DEPLOY_ENV_FILE", "/etc/moderation/.env"),
            ("DEPLOY_ALLOW_UNAUTHENTICATED", "false"),
        ]));

        assert_eq!(config.function_name, "moderation-agent-staging");
        assert_eq!(config.region, "europe-west1");
        assert_eq!(config.project_id, "walking-app-staging");
        assert_eq!(config.env_file, PathBuf::from("/etc/moderation/.env"));
        assert_eq!(config.access, AccessPolicy::RequireAuthentication);
        // Untouched fields keep their defaults
        assert_eq!(config.runtime, "python311");
    }

    #[test]
    fn test_blank_and_unparsable_overrides_fall_back() {
        let config = DeployConfig::from_lookup(lookup_from(&[
            ("DEPLOY_REGION", "   "),
            ("DEPLOY_ALLOW_UNAUTHENTICATED", "maybe"),
        ]));

        assert_eq!(config.region, "us-central1");
        assert_eq!(config.access, AccessPolicy::AllowUnauthenticated);
    }

    #[test]
    fn test_flags() {
        assert_eq!(TriggerMode::Http.as_flag(), "--trigger-http");
        assert_eq!(
            AccessPolicy::AllowUnauthenticated.as_flag(),
            "--allow-unauthenticated"
        );
        assert_eq!(
            AccessPolicy::RequireAuthentication.as_flag(),
            "--no-allow-unauthenticated"
        );
    }

    #[test]
    fn test_validate_accepts_defaults_with_existing_source() {
        let source = tempfile::tempdir().unwrap();
        let config = DeployConfig {
            source_dir: source.path().to_path_buf(),
            ..DeployConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_and_whitespace() {
        let source = tempfile::tempdir().unwrap();
        let base = DeployConfig {
            source_dir: source.path().to_path_buf(),
            ..DeployConfig::default()
        };

        let empty_region = DeployConfig {
            region: String::new(),
            ..base.clone()
        };
        match empty_region.validate() {
            Err(DeployError::InvalidConfig { field, .. }) => assert_eq!(field, "region"),
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }

        let spaced_project = DeployConfig {
            project_id: "my project".to_string(),
            ..base
        };
        match spaced_project.validate() {
            Err(DeployError::InvalidConfig { field, reason }) => {
                assert_eq!(field, "project_id");
                assert!(reason.contains("whitespace"));
            }
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_missing_source_dir() {
        let source = tempfile::tempdir().unwrap();
        let config = DeployConfig {
            source_dir: source.path().join("does-not-exist"),
            ..DeployConfig::default()
        };
        match config.validate() {
            Err(DeployError::InvalidConfig { field, .. }) => assert_eq!(field, "source_dir"),
            other => panic!("Expected InvalidConfig, got {other:?}"),
        }
    }
}
