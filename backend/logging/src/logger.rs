//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control, a console layer
//! (human or JSON) and an optional daily rolling NDJSON file.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy)]
pub struct LoggerOptions<'a> {
    /// Default filter when `RUST_LOG` is unset, e.g. "info".
    pub level: &'a str,
    /// Directory for `fitment.log.YYYY-MM-DD`; console only when `None`.
    pub dir: Option<&'a Path>,
    /// JSON console output.
    pub json: bool,
}

/// Initialize the global subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init_logger(options: LoggerOptions<'_>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.level));

    let file_layer = options.dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "fitment.log");
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let json_console = options
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stdout));
    let plain_console = (!options.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(plain_console)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let options = LoggerOptions {
            level: "warn",
            dir: None,
            json: false,
        };
        init_logger(options);
        init_logger(LoggerOptions { json: true, ..options });
        tracing::warn!("still logging");
    }
}
