//! Tracing subscriber set-up for binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GIGBOUNTY_LOG";

const DEFAULT_FILTER: &str = "info";

/// Builds the log filter from `GIGBOUNTY_LOG`, then `RUST_LOG`, then `info`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a formatted subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed.
#[must_use]
pub fn init_tracing() -> bool {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
