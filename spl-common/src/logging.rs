//! Tracing initialization

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `default_filter` applies when RUST_LOG is unset. Later calls are
/// no-ops, so tests and embedding hosts may both call this freely.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
