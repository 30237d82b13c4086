//! Logging setup for errmap
//!
//! Installs a `tracing-subscriber` registry with an env filter and a text or
//! JSON formatting layer

use errmap_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Initialize the global `tracing` subscriber from configuration
///
/// An invalid filter directive falls back to `info` and is reported as a
/// warning through the freshly installed subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init(config: &TelemetryConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let (filter, rejected) = build_filter(&config.log_filter);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true);

            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;
        }
    }

    if let Some(error) = rejected {
        tracing::warn!(directive = %config.log_filter, %error, "invalid log filter, falling back to info");
    }

    Ok(())
}

/// Parse `directive`, returning the `info` fallback and the parse error when
/// it is invalid
fn build_filter(directive: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    }
}
