//! # Env File Parsing
//!
//! Parses a `KEY=VALUE` env file into an explicit mapping without touching the
//! process environment. Quoting, comments and `export` prefixes follow dotenv rules.

use crate::error::DeployError;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed env file
///
/// Keeps every value seen for a key so repeated definitions can be rejected
/// instead of silently picking one.
pub struct EnvFileEntries {
    path: PathBuf,
    values: BTreeMap<String, Vec<String>>,
    /// Keys whose raw value contains `$` outside single quotes
    substituted: BTreeSet<String>,
}

impl std::fmt::Debug for EnvFileEntries {
    // Values are secrets; only list the keys
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvFileEntries")
            .field("path", &self.path)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EnvFileEntries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of `key`, which must be defined at most once and literally
    ///
    /// # Errors
    ///
    /// - [`DeployError::DuplicateKey`] if the file defines `key` more than once
    /// - [`DeployError::MalformedSecret`] if the value relies on `$VAR` substitution
    pub fn get_unique(&self, key: &str) -> Result<Option<&str>, DeployError> {
        let value = match self.values.get(key).map(Vec::as_slice) {
            None | Some([]) => return Ok(None),
            Some([value]) => value.as_str(),
            Some(values) => {
                return Err(DeployError::DuplicateKey {
                    key: key.to_string(),
                    path: self.path.clone(),
                    count: values.len(),
                })
            }
        };

        // dotenvy expands $VAR from the process environment
        if self.substituted.contains(key) {
            return Err(DeployError::MalformedSecret {
                key: key.to_string(),
                reason: "value contains '$' outside single quotes",
            });
        }

        Ok(Some(value))
    }
}

/// Parse the env file at `path`
///
/// # Errors
///
/// Returns [`DeployError::EnvFile`] if the file cannot be opened or any line fails to parse.
pub fn read_env_file(path: &Path) -> Result<EnvFileEntries, DeployError> {
    let env_file_error = |source| DeployError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = dotenvy::from_path_iter(path).map_err(env_file_error)?;

    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for item in iter {
        let (key, value) = item.map_err(env_file_error)?;
        values.entry(key).or_default().push(value);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| env_file_error(dotenvy::Error::Io(e)))?;
    let substituted = substituted_keys(&raw);

    debug!(
        path = %path.display(),
        keys = values.len(),
        "Parsed env file"
    );

    Ok(EnvFileEntries {
        path: path.to_path_buf(),
        values,
        substituted,
    })
}

/// Keys whose unparsed value would be subject to `$` expansion
///
/// Single-quoted values are literal in dotenv syntax; anything else with a `$`
/// is flagged rather than guessed at.
fn substituted_keys(raw: &str) -> BTreeSet<String> {
    raw.lines()
        .map(str::trim_start)
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.strip_prefix("export ").unwrap_or(line))
        .filter_map(|line| line.split_once('='))
        .filter(|(_, value)| {
            let value = value.trim_start();
            !value.starts_with('\'') && value.contains('$')
        })
        .map(|(key, _)| key.trim().to_string())
        .collect()
}
