//! Config validation: errors stop startup, warnings are logged.

use thiserror::Error;

use crate::schema::{FitmentConfig, ProviderKind};

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &FitmentConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_provider(config, &mut report);
    validate_sections(config, &mut report);
    report
}

fn validate_server(config: &FitmentConfig, report: &mut ValidationReport) {
    if config.server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Upload limit must be greater than zero");
    }
    if config.server.bind.trim().is_empty() {
        report.error("server.bind", "Bind address cannot be empty");
    }
}

fn validate_provider(config: &FitmentConfig, report: &mut ValidationReport) {
    let provider = &config.provider;
    match provider.kind {
        ProviderKind::OpenAi if provider.openai_api_key.is_none() => {
            report.error(
                "provider.openaiApiKey",
                "OPENAI_API_KEY is required when the provider is openai",
            );
        }
        ProviderKind::Ollama if !provider.ollama_url.starts_with("http") => {
            report.error("provider.ollamaUrl", "Ollama URL must start with http:// or https://");
        }
        _ => {}
    }
    if provider.max_tokens == 0 {
        report.error("provider.maxTokens", "maxTokens must be greater than zero");
    }
    if !(0.0..=2.0).contains(&provider.temperature) {
        report.warn(
            "provider.temperature",
            format!("Temperature {} is outside the usual 0.0-2.0 range", provider.temperature),
        );
    }
    if provider.timeout_secs == 0 {
        report.warn("provider.timeoutSecs", "A zero timeout disables the request timeout");
    }
}

fn validate_sections(config: &FitmentConfig, report: &mut ValidationReport) {
    let labels = match config.label_set() {
        Ok(labels) => labels,
        Err(e) => {
            report.error("sections", e.to_string());
            return;
        }
    };
    for (earlier, later) in labels.prefix_collisions() {
        report.warn(
            "sections.labels",
            format!(
                "\"{earlier}\" is declared before \"{later}\" and may shadow it; declare the longer label first"
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SectionsConfig;
    use fitment_core::{Label, SectionKind};

    #[test]
    fn default_config_is_valid() {
        let report = validate(&FitmentConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn openai_without_key_is_an_error() {
        let mut config = FitmentConfig::default();
        config.provider.kind = ProviderKind::OpenAi;
        let report = validate(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "provider.openaiApiKey");
    }

    #[test]
    fn bad_labels_are_errors_and_collisions_warnings() {
        let mut config = FitmentConfig::default();
        config.sections = Some(SectionsConfig {
            labels: vec![],
            fallback: "OVERVIEW".into(),
        });
        assert!(!validate(&config).is_valid());

        config.sections = Some(SectionsConfig {
            labels: vec![
                Label::new("TIPS", SectionKind::Prose),
                Label::new("TIPS-SUMMARY", SectionKind::Prose),
            ],
            fallback: "TIPS".into(),
        });
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
