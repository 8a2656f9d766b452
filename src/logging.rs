//! Tracing setup
//!
//! Host applications normally install their own subscriber; this helper is
//! for binaries and tests that just want formatted output filtered by
//! `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `info` when the variable is unset or invalid.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
