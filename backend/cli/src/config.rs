use std::path::Path;

use anyhow::Result;
use tracing::warn;

use fitment_config::{default_config_path, load_and_prepare, validate, FitmentConfig};
use fitment_logging::{init_logger, LoggerOptions};

/// Load the config from `path`, or the default location.
pub async fn load(path: Option<&Path>) -> Result<FitmentConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };
    load_and_prepare(&path).await
}

/// Install the subscriber. One-shot commands only log warnings unless
/// `RUST_LOG` says otherwise, so stdout stays clean for their output.
pub fn init_logging(config: &FitmentConfig, quiet: bool) {
    let level = if quiet { "warn" } else { config.logging.level.as_str() };
    init_logger(LoggerOptions {
        level,
        dir: config.logging.dir.as_deref(),
        json: config.logging.json,
    });

    // Warnings raised while loading predate the subscriber.
    for warning in validate(config).warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
}
