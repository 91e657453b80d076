//! Logging bootstrap: the `tracing` subscriber for the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialise the global `tracing` subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise `log_level` is used, falling back to
/// `"info"` when it is not a valid filter directive.
pub fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(normalise_level(log_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A second initialisation (e.g. from tests) is not an error worth surfacing
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

/// Accept the usual upper-case level names as well as tracing's own.
fn normalise_level(level: &str) -> String {
    match level.to_uppercase().as_str() {
        "WARNING" => "warn".to_string(),
        "CRITICAL" => "error".to_string(),
        _ => level.to_lowercase(),
    }
}
