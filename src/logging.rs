//! Subscriber setup for the command-line drivers.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "GAUSS_MAX_LOG";

/// Installs a stderr `fmt` subscriber filtered by `GAUSS_MAX_LOG`
/// (default `warn`). Does nothing if a global subscriber already exists.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
