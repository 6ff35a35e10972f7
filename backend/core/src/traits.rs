use anyhow::Result;
use async_trait::async_trait;

/// Trait for multimodal LLM backends that look at a part photo.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &VisionRequest) -> Result<VisionResponse>;
}

/// An image already encoded for transport.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub base64: String,
}

impl ImageAttachment {
    /// `data:` URL form used by OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Request to a vision provider.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub image: Option<ImageAttachment>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from a vision provider.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_embeds_mime_and_payload() {
        let image = ImageAttachment {
            mime_type: "image/png".into(),
            base64: "AAAA".into(),
        };
        assert_eq!(image.data_url(), "data:image/png;base64,AAAA");
    }
}
