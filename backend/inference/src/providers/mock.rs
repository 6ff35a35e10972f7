use anyhow::Result;
use async_trait::async_trait;

use fitment_core::{FitmentError, VisionProvider, VisionRequest, VisionResponse};

/// Reply used when no fixed response is set; every default heading present.
pub const CANNED_REPLY: &str = "\
RESULT: Compatible with the selected vehicle.
COMPATIBILITY: Matches the listed bolt pattern and connector.
OVERVIEW: Front brake pad set with wear sensor.
SKILL LEVEL REQUIRED: Moderate - needs a jack and axle stands.
HOW TO:
Tools: Jack, Wheel brace, C-clamp
Steps:
1. Loosen the wheel nuts and raise the car.
2. Remove the caliper and old pads.
3. Fit the new pads and refit the caliper.
TIPS:
- Bed the pads in gently for the first 200 km.
- Check the brake fluid level afterwards.
RELATED PRODUCTS:
- Brake discs
";

/// How a mock should fail, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Unreachable,
    Backend,
}

/// A vision provider that returns canned responses.
pub struct MockProvider {
    fixed_response: Option<String>,
    failure: Option<MockFailure>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            fixed_response: None,
            failure: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    pub fn failing(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, req: &VisionRequest) -> Result<VisionResponse> {
        match self.failure {
            Some(MockFailure::Unreachable) => {
                return Err(FitmentError::BackendUnreachable {
                    provider: "mock".into(),
                    message: "connection refused".into(),
                }
                .into())
            }
            Some(MockFailure::Backend) => {
                return Err(FitmentError::Backend {
                    provider: "mock".into(),
                    message: "500 Internal Server Error: model crashed".into(),
                }
                .into())
            }
            None => {}
        }

        Ok(VisionResponse {
            content: self
                .fixed_response
                .clone()
                .unwrap_or_else(|| CANNED_REPLY.to_string()),
            provider: "mock".to_string(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
