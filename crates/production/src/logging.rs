//! Tracing setup for the validator binary.

/// Initialize the global tracing subscriber, honoring `RUST_LOG` via
/// `EnvFilter`. Falls back to `info` level when unset.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
