//! Fitment assistant configuration schema.
//!
//! Typed for serde YAML/JSON. Every section has serde defaults, so an empty
//! file (or no file at all) is a valid configuration.

use std::path::PathBuf;

use fitment_core::{FitmentError, Label, LabelSet};
use serde::{Deserialize, Serialize};

use crate::defaults;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitmentConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Section headings; the built-in seven labels when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionsConfig>,
}

impl FitmentConfig {
    /// Build the label set the parser and prompt builder use.
    pub fn label_set(&self) -> Result<LabelSet, FitmentError> {
        match &self.sections {
            Some(sections) => LabelSet::new(sections.labels.clone(), &sections.fallback),
            None => Ok(LabelSet::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Largest accepted image upload in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: defaults::DEFAULT_PORT,
            max_upload_bytes: defaults::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    OpenAi,
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Mock => "mock",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = FitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(FitmentError::ConfigError(format!(
                "unknown provider \"{other}\" (expected ollama, openai or mock)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub ollama_url: String,
    pub ollama_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_organization: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            ollama_url: defaults::DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: defaults::DEFAULT_OLLAMA_MODEL.to_string(),
            openai_api_key: None,
            openai_model: defaults::DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: defaults::DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_organization: None,
            max_tokens: defaults::DEFAULT_MAX_TOKENS,
            temperature: defaults::DEFAULT_TEMPERATURE,
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Model name sent to the selected backend.
    pub fn model(&self) -> &str {
        match self.kind {
            ProviderKind::Ollama => &self.ollama_model,
            ProviderKind::OpenAi => &self.openai_model,
            ProviderKind::Mock => "mock",
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for rolling NDJSON logs; console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// JSON console output instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionsConfig {
    /// Declaration order is match order.
    pub labels: Vec<Label>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_fallback() -> String {
    "OVERVIEW".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitment_core::SectionKind;

    #[test]
    fn empty_yaml_is_default() {
        let config: FitmentConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.port, defaults::DEFAULT_PORT);
        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.label_set().unwrap(), LabelSet::default());
    }

    #[test]
    fn parses_custom_sections() {
        let yaml = r#"
provider:
  kind: openai
  openaiApiKey: sk-test
sections:
  fallback: overview
  labels:
    - name: OVERVIEW
      kind: prose
    - name: TOOLS
      kind: list
      splitCommas: true
      minEntries: 1
      defaults: [Gloves]
"#;
        let config: FitmentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.model(), defaults::DEFAULT_OPENAI_MODEL);

        let labels = config.label_set().unwrap();
        assert_eq!(labels.fallback().name, "OVERVIEW");
        assert!(matches!(
            &labels.get("TOOLS").unwrap().kind,
            SectionKind::List(policy) if policy.split_commas && policy.min_entries == 1
        ));
    }

    #[test]
    fn provider_kind_from_str() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("gemini".parse::<ProviderKind>().is_err());
    }
}
