//! Tracing subscriber setup for the `contacts` binary.

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `-v` raises the level to `info`,
/// `-vv` to `debug`, and without flags the configured filter applies.
pub fn init_tracing(config_filter: &str, verbosity: u8) {
    let fallback = match verbosity {
        0 => config_filter.to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed (tests); that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
