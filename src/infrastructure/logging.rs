use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber.
///
/// Output goes to stderr so `inspect` can keep stdout for its JSON report.
/// `RUST_LOG` overrides the configured level. A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    }
}
