pub mod mock;
pub mod ollama;
pub mod openai;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

use fitment_config::{ProviderConfig, ProviderKind};
use fitment_core::{FitmentError, VisionProvider};

pub use mock::{MockFailure, MockProvider};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Registry of vision providers, looked up by name.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn VisionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn VisionProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn VisionProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the provider selected by `config.kind`.
pub fn provider_from_config(config: &ProviderConfig) -> Result<Arc<dyn VisionProvider>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| FitmentError::ConfigError(format!("failed to build HTTP client: {e}")))?;

    let provider: Arc<dyn VisionProvider> = match config.kind {
        ProviderKind::Ollama => Arc::new(
            OllamaProvider::new()
                .with_client(client)
                .with_base_url(&config.ollama_url),
        ),
        ProviderKind::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                FitmentError::ConfigError("OPENAI_API_KEY is required for the openai provider".into())
            })?;
            let mut provider = OpenAiProvider::new(api_key)
                .with_client(client)
                .with_base_url(&config.openai_base_url);
            if let Some(org) = &config.openai_organization {
                provider = provider.with_organization(org);
            }
            Arc::new(provider)
        }
        ProviderKind::Mock => Arc::new(MockProvider::new()),
    };
    Ok(provider)
}

/// Map a reqwest send failure onto the error taxonomy.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> anyhow::Error {
    if err.is_connect() || err.is_timeout() {
        FitmentError::BackendUnreachable {
            provider: provider.to_string(),
            message: err.to_string(),
        }
        .into()
    } else {
        FitmentError::Backend {
            provider: provider.to_string(),
            message: err.to_string(),
        }
        .into()
    }
}
