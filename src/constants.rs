//! # Constants
//!
//! Default deployment parameters for the moderation agent Cloud Function.
//! Every value here can be overridden through `DEPLOY_*` environment variables
//! or CLI flags (see [`crate::config::DeployConfig`]).

/// gcloud executable, resolved on `PATH` before invocation
pub const DEFAULT_GCLOUD_BIN: &str = "gcloud";

/// Cloud Function name
pub const DEFAULT_FUNCTION_NAME: &str = "moderation-agent";

/// GCP region the function is deployed to
pub const DEFAULT_REGION: &str = "us-central1";

/// GCP project ID
pub const DEFAULT_PROJECT_ID: &str = "moderation-agent";

/// Functions runtime identifier
pub const DEFAULT_RUNTIME: &str = "python311";

/// HTTP handler exported by the function source
pub const DEFAULT_ENTRY_POINT: &str = "moderate_content";

/// Function source directory (uploaded by gcloud)
pub const DEFAULT_SOURCE_DIR: &str = ".";

/// Env file holding the API key, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = "../.env";

/// Environment variable carrying the Gemini API key into the function
pub const SECRET_ENV_KEY: &str = "GOOGLE_API_KEY";

/// Exit status for configuration errors (missing secret, bad env file, invalid config)
pub const EXIT_CONFIG_ERROR: u8 = 1;

/// Exit status when gcloud cannot be found or started (shell convention)
pub const EXIT_TOOL_NOT_FOUND: u8 = 127;

/// Delimiters tried, in order, when the secret contains a comma.
/// gcloud accepts `^<delim>^KEY=VALUE` to change the list separator.
pub const ENV_VAR_DELIMITER_CANDIDATES: [char; 6] = ['@', ':', '|', '#', '~', '+'];

/// Placeholder printed instead of the secret value
pub const REDACTED: &str = "<redacted>";
