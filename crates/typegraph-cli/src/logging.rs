// Tracing initialization for the CLI. Logs go to stderr so SDL on stdout stays clean.
use tracing_subscriber::{fmt, EnvFilter, prelude::*};

pub fn init_logging(level: &str) {
    // Prefer RUST_LOG from env, otherwise use the --log-level filter.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
