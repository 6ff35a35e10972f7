//! `fitment-config`: runtime configuration for the fitment assistant.
//!
//! Provides:
//! - Typed config schema (server, provider, logging, section labels)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Well-known env var overrides
//! - Default value application
//! - Validation and redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, ollama_model_tag};
pub use env::{
    apply_env_overrides, apply_env_overrides_with, collect_referenced_vars, resolve_env_vars,
    resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, default_config_path, load_raw_config};
pub use redact::redact;
pub use schema::{FitmentConfig, LoggingConfig, ProviderConfig, ProviderKind, SectionsConfig, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::Path;

use anyhow::{Context, Result};
use fitment_core::FitmentError;

/// Load, substitute env vars, apply env overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<FitmentConfig> {
    let value = load_raw_config(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: FitmentConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        return Err(FitmentError::ConfigError(messages.join("; ")).into());
    }

    Ok(config)
}

/// Redacted JSON snapshot of `config`, safe to log.
pub fn redacted_snapshot(config: &FitmentConfig) -> serde_json::Value {
    serde_json::to_value(config)
        .map(|v| redact(&v))
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_defaults_without_file() {
        let config = load_and_prepare(Path::new("/nonexistent/fitment/config.yaml"))
            .await
            .unwrap();
        assert!(config.provider.ollama_model.contains(':'));
        assert_eq!(config.label_set().unwrap().len(), 7);
    }

    #[test]
    fn snapshot_hides_key() {
        let mut config = FitmentConfig::default();
        config.provider.openai_api_key = Some("sk-secret-value".into());
        let snapshot = redacted_snapshot(&config);
        assert_eq!(snapshot["provider"]["openaiApiKey"], "sk-s***");
    }
}
