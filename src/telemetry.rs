//! Logging setup shared by both binaries.
//!
//! Logs go to stderr so stdout stays free for RPC responses and the
//! terminal view. Filtering follows `RUST_LOG`, defaulting to `phonebook=info`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "phonebook=info";

/// Installs the global `fmt` subscriber. Calling it twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
