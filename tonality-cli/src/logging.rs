use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes stderr logging.
///
/// `RUST_LOG` takes precedence; otherwise each `-v` raises the level from
/// `warn` to `info` to `debug`.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tonality={level},tonality_core={level}")));

    // Logs go to stderr so predictions on stdout stay pipeable.
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}
