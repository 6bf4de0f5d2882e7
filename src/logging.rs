//! tracing-subscriber setup. Logs go to stderr so stdout carries tool results only.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over `fallback` (from `LOG_LEVEL` or `--log-level`).
pub fn init_tracing(fallback: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}
