use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use fitment_core::{FitmentError, VisionProvider, VisionRequest, VisionResponse};

use super::transport_error;

const PROVIDER: &str = "openai";

/// OpenAI chat completions (or any compatible endpoint) with image input.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    organization: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            organization: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn chat_body(request: &VisionRequest) -> ChatRequest<'_> {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(json!({ "role": "system", "content": request.system_prompt }));
    }

    let mut parts = vec![json!({ "type": "text", "text": request.user_prompt })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "type": "image_url",
            "image_url": { "url": image.data_url() }
        }));
    }
    messages.push(json!({ "role": "user", "content": parts }));

    ChatRequest {
        model: &request.model,
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Reply text, whether the API sent a plain string or a list of text parts.
fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &VisionRequest) -> Result<VisionResponse> {
        let start = Instant::now();

        debug!(model = %request.model, has_image = request.image.is_some(), "Sending request to OpenAI");

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&chat_body(request));
        if let Some(org) = &self.organization {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(FitmentError::Backend {
                provider: PROVIDER.to_string(),
                message: format!("{status}: {message}"),
            }
            .into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = chat_response
            .choices
            .first()
            .map(|c| content_text(&c.message.content))
            .unwrap_or_default();

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(VisionResponse {
            content,
            provider: PROVIDER.to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitment_core::ImageAttachment;

    #[test]
    fn user_message_carries_text_then_image() {
        let request = VisionRequest {
            model: "gpt-4o-mini".into(),
            system_prompt: "system".into(),
            user_prompt: "Analyse this".into(),
            image: Some(ImageAttachment {
                mime_type: "image/png".into(),
                base64: "iVBORw0KGgo=".into(),
            }),
            max_tokens: 512,
            temperature: 0.2,
        };
        let body = serde_json::to_value(chat_body(&request)).unwrap();

        assert_eq!(body["messages"][0]["content"], "system");
        let parts = body["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts[0]["text"], "Analyse this");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/png;base64,iVBORw0KGgo="
        );
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn content_parts_are_joined() {
        assert_eq!(content_text(&json!("RESULT: ok")), "RESULT: ok");
        assert_eq!(
            content_text(&json!([{ "type": "text", "text": "RESULT: " }, { "type": "text", "text": "ok" }])),
            "RESULT: ok"
        );
        assert_eq!(content_text(&Value::Null), "");
    }

    #[test]
    fn empty_choices_parse() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
