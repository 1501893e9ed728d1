//! # Initialization
//!
//! Tracing subscriber setup.

use tracing::warn;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "moderation_agent_deploy=info";

/// Initialize the tracing subscriber
///
/// Log lines go to stderr so stdout only carries the progress and result messages.
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
    {
        // Already initialized (e.g. by a test harness)
        warn!("Tracing subscriber init returned error: {}", e);
    }
}
