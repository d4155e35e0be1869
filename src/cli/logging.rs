//! Logging initialization

/// Initialize logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` wins when set; otherwise the debug flag or the configured
/// level decides.
pub fn init_logging(debug: bool, configured_level: &str) {
    let fallback = if debug { "debug" } else { configured_level };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_target(debug)
        .init();
}
