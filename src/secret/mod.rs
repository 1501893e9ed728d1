//! # Secret Resolution
//!
//! Resolves the API key handed to the deployed function.
//!
//! Lookup order:
//! 1. The env file, when it exists (only the secret's key is read from it)
//! 2. The process environment
//!
//! The process environment is never modified. The resolved value lives in a
//! [`Secret`] that is wiped from memory on drop and redacted in debug output.

mod env_file;

pub use env_file::{read_env_file, EnvFileEntries};

use crate::constants::REDACTED;
use crate::error::DeployError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Where a secret value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    EnvFile(PathBuf),
    Environment,
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretSource::EnvFile(path) => write!(f, "{}", path.display()),
            SecretSource::Environment => f.write_str("process environment"),
        }
    }
}

/// Non-empty secret value
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    key: String,
    value: String,
    #[zeroize(skip)]
    source: SecretSource,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("key", &self.key)
            .field("value", &REDACTED)
            .field("source", &self.source)
            .finish()
    }
}

impl Secret {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw value. Only the gcloud argument builder should need this.
    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> &SecretSource {
        &self.source
    }
}

/// Resolve `key` from `env_file` (if it exists) or from `lookup`
///
/// A key present in the env file takes precedence over the environment, even
/// when its value is empty.
///
/// # Errors
///
/// - [`DeployError::EnvFile`] / [`DeployError::DuplicateKey`] for an unusable env file
/// - [`DeployError::MissingSecret`] if the value is absent or blank
pub fn resolve_secret<F>(key: &str, env_file: &Path, lookup: F) -> Result<Secret, DeployError>
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = if env_file.is_file() {
        let entries = read_env_file(env_file)?;
        entries.get_unique(key)?.map(str::to_owned)
    } else {
        debug!(path = %env_file.display(), "Env file not found, using process environment");
        None
    };

    let (value, source) = match from_file {
        Some(value) => (value, SecretSource::EnvFile(env_file.to_path_buf())),
        None => match lookup(key) {
            Some(value) => (value, SecretSource::Environment),
            None => return Err(missing(key, env_file)),
        },
    };

    if value.trim().is_empty() {
        return Err(missing(key, env_file));
    }

    info!(key, source = %source, "Resolved secret");

    Ok(Secret {
        key: key.to_string(),
        value,
        source,
    })
}

fn missing(key: &str, env_file: &Path) -> DeployError {
    DeployError::MissingSecret {
        key: key.to_string(),
        env_file: env_file.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const KEY: &str = "GOOGLE_API_KEY";

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_env_file_value_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        fs::write(&env_file, "UNRELATED=x\nGOOGLE_API_KEY=from-file\n").unwrap();

        let secret = resolve_secret(KEY, &env_file, no_env).unwrap();

        assert_eq!(secret.expose(), "from-file");
        assert_eq!(secret.source(), &SecretSource::EnvFile(env_file));
    }

    #[test]
    fn test_environment_value_used_without_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");

        let secret =
            resolve_secret(KEY, &env_file, |k| (k == KEY).then(|| "from-env".to_string())).unwrap();

        assert_eq!(secret.expose(), "from-env");
        assert_eq!(secret.source(), &SecretSource::Environment);
    }

    #[test]
    fn test_env_file_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        fs::write(&env_file, "GOOGLE_API_KEY=from-file\n").unwrap();

        let secret = resolve_secret(KEY, &env_file, |_| Some("from-env".to_string())).unwrap();

        assert_eq!(secret.expose(), "from-file");
    }

    #[test]
    fn test_env_file_without_key_falls_back_to_environment() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        fs::write(&env_file, "UNRELATED=x\n").unwrap();

        let secret = resolve_secret(KEY, &env_file, |_| Some("from-env".to_string())).unwrap();

        assert_eq!(secret.expose(), "from-env");
    }

    #[test]
    fn test_missing_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");

        match resolve_secret(KEY, &env_file, no_env) {
            Err(DeployError::MissingSecret { key, env_file: path }) => {
                assert_eq!(key, KEY);
                assert_eq!(path, env_file);
            }
            other => panic!("Expected MissingSecret, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_value_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        fs::write(&env_file, "GOOGLE_API_KEY=\n").unwrap();

        // Empty file entry shadows the environment
        let result = resolve_secret(KEY, &env_file, |_| Some("from-env".to_string()));
        assert!(matches!(result, Err(DeployError::MissingSecret { .. })));

        let result = resolve_secret(KEY, &dir.path().join("absent"), |_| Some("  ".to_string()));
        assert!(matches!(result, Err(DeployError::MissingSecret { .. })));
    }

    #[test]
    fn test_directory_is_not_an_env_file() {
        let dir = tempfile::tempdir().unwrap();

        let secret = resolve_secret(KEY, dir.path(), |_| Some("from-env".to_string())).unwrap();

        assert_eq!(secret.source(), &SecretSource::Environment);
    }

    #[test]
    fn test_debug_redacts_value() {
        let dir = tempfile::tempdir().unwrap();
        let secret =
            resolve_secret(KEY, &dir.path().join(".env"), |_| Some("hunter2".to_string())).unwrap();

        let debug = format!("{secret:?}");
        assert!(debug.contains(KEY));
        assert!(!debug.contains("hunter2"));
    }
}
