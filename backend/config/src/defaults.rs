//! Config defaults and post-load normalisation.

use crate::schema::FitmentConfig;

pub const DEFAULT_PORT: u16 = 3000;

/// 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llava";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: FitmentConfig) -> FitmentConfig {
    let config = apply_provider_defaults(config);
    apply_logging_defaults(config)
}

/// Tag bare Ollama model names, trim URL slashes, drop blank secrets.
fn apply_provider_defaults(mut config: FitmentConfig) -> FitmentConfig {
    let provider = &mut config.provider;

    provider.ollama_model = ollama_model_tag(&provider.ollama_model);
    provider.ollama_url = provider.ollama_url.trim().trim_end_matches('/').to_string();
    provider.openai_base_url = provider.openai_base_url.trim().trim_end_matches('/').to_string();

    for secret in [&mut provider.openai_api_key, &mut provider.openai_organization] {
        if secret.as_deref().is_some_and(|s| s.trim().is_empty()) {
            *secret = None;
        }
    }
    config
}

fn apply_logging_defaults(mut config: FitmentConfig) -> FitmentConfig {
    if config.logging.level.trim().is_empty() {
        config.logging.level = "info".to_string();
    }
    config
}

/// Ollama resolves untagged names to `:latest`; make that explicit.
pub fn ollama_model_tag(model: &str) -> String {
    let model = model.trim();
    let model = if model.is_empty() { DEFAULT_OLLAMA_MODEL } else { model };
    if model.contains(':') {
        model.to_string()
    } else {
        format!("{model}:latest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_bare_ollama_models() {
        assert_eq!(ollama_model_tag("llava"), "llava:latest");
        assert_eq!(ollama_model_tag("llava:13b"), "llava:13b");
        assert_eq!(ollama_model_tag("  "), "llava:latest");
    }

    #[test]
    fn normalises_provider_fields() {
        let mut config = FitmentConfig::default();
        config.provider.ollama_url = "http://gpu-box:11434/".into();
        config.provider.openai_api_key = Some("   ".into());
        config.logging.level = String::new();

        let config = apply_all_defaults(config);
        assert_eq!(config.provider.ollama_url, "http://gpu-box:11434");
        assert_eq!(config.provider.ollama_model, "llava:latest");
        assert!(config.provider.openai_api_key.is_none());
        assert_eq!(config.logging.level, "info");
    }
}
