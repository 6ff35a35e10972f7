//! The analysis pipeline: prompt, call the vision model, parse the reply.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};

use fitment_config::{FitmentConfig, ProviderConfig};
use fitment_core::{FitmentError, ImageAttachment, LabelSet, VehicleDetails, VisionProvider, VisionRequest};
use fitment_logging::{AnalysisEvent, EventLogger};
use fitment_understanding::{FitmentReport, HeadingMatcher};

use crate::prompt::{build_system_prompt, build_user_prompt};
use crate::providers::provider_from_config;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Per-request model parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyserSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl AnalyserSettings {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            model: config.model().to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

/// A parsed reply plus where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub request_id: String,
    pub raw_text: String,
    pub report: FitmentReport,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub tokens_used: u64,
}

pub struct FitmentAnalyser {
    provider: Arc<dyn VisionProvider>,
    matcher: HeadingMatcher,
    system_prompt: String,
    settings: AnalyserSettings,
}

impl FitmentAnalyser {
    pub fn new(
        provider: Arc<dyn VisionProvider>,
        labels: &LabelSet,
        settings: AnalyserSettings,
    ) -> Result<Self, FitmentError> {
        Ok(Self {
            provider,
            matcher: HeadingMatcher::new(labels)?,
            system_prompt: build_system_prompt(labels),
            settings,
        })
    }

    /// Build the provider and label set described by `config`.
    pub fn from_config(config: &FitmentConfig) -> Result<Self> {
        let provider = provider_from_config(&config.provider)?;
        let labels = config.label_set()?;
        Ok(Self::new(
            provider,
            &labels,
            AnalyserSettings::from_config(&config.provider),
        )?)
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn labels(&self) -> &LabelSet {
        self.matcher.labels()
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Parse a reply with this analyser's labels.
    pub fn parse(&self, raw: &str) -> FitmentReport {
        FitmentReport::with_matcher(raw, &self.matcher)
    }

    /// Run one photo through the model and parse the reply.
    #[instrument(skip_all, fields(provider = %self.provider.name(), model = %self.settings.model))]
    pub async fn analyse(&self, details: &VehicleDetails, image: ImageAttachment) -> Result<AnalysisOutcome> {
        details.validate()?;

        let request_id = format!(
            "req-{}-{}",
            Utc::now().timestamp_millis(),
            REQUEST_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let request = VisionRequest {
            model: self.settings.model.clone(),
            system_prompt: self.system_prompt.clone(),
            user_prompt: build_user_prompt(details),
            image: Some(image),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        debug!(request_id = %request_id, year = %details.year, make = %details.make, model = %details.model, "starting analysis");
        let start = Instant::now();

        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                EventLogger::log_event(
                    &request_id,
                    AnalysisEvent::Failed {
                        provider: self.provider.name().to_string(),
                        error_msg: format!("{e:#}"),
                    },
                );
                return Err(e);
            }
        };
        let infer_ms = start.elapsed().as_millis() as u64;

        let raw_text = response.content.trim().to_string();
        if raw_text.is_empty() {
            let err = FitmentError::EmptyCompletion(response.provider.clone());
            EventLogger::log_event(
                &request_id,
                AnalysisEvent::Failed {
                    provider: response.provider,
                    error_msg: err.to_string(),
                },
            );
            return Err(err.into());
        }

        let report = self.parse(&raw_text);
        let fallback = used_fallback(&report, self.labels());
        info!(request_id = %request_id, infer_ms, chars = raw_text.len(), "model reply parsed");

        EventLogger::log_event(
            &request_id,
            AnalysisEvent::Completed {
                provider: response.provider.clone(),
                model: response.model.clone(),
                status: report.status().map(|s| format!("{s:?}").to_lowercase()),
                infer_ms,
                reply_chars: raw_text.chars().count(),
                fallback,
            },
        );

        Ok(AnalysisOutcome {
            request_id,
            raw_text,
            report,
            provider: response.provider,
            model: response.model,
            latency_ms: infer_ms,
            tokens_used: response.tokens_used,
        })
    }
}

/// True when only the fallback section has content.
fn used_fallback(report: &FitmentReport, labels: &LabelSet) -> bool {
    let fallback = labels.fallback().name.as_str();
    report
        .sections
        .iter()
        .all(|(label, body)| body.is_empty() == (label != fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockFailure, MockProvider};
    use fitment_understanding::{FitmentStatus, NormalizedBody};

    fn details() -> VehicleDetails {
        VehicleDetails {
            year: "2016".into(),
            make: "Honda".into(),
            model: "Civic".into(),
            product_url: None,
            notes: "Oil filter".into(),
        }
    }

    fn image() -> ImageAttachment {
        ImageAttachment {
            mime_type: "image/jpeg".into(),
            base64: "/9j/4AAQSkZJRg==".into(),
        }
    }

    fn analyser(provider: MockProvider) -> FitmentAnalyser {
        FitmentAnalyser::new(Arc::new(provider), &LabelSet::default(), AnalyserSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn canned_reply_produces_full_report() {
        let outcome = analyser(MockProvider::new())
            .analyse(&details(), image())
            .await
            .unwrap();

        assert_eq!(outcome.provider, "mock");
        assert_eq!(outcome.report.status(), Some(FitmentStatus::Ok));
        match &outcome.report.card("HOW TO").unwrap().body {
            NormalizedBody::Procedure { tools, steps, .. } => {
                assert_eq!(tools.len(), 3);
                assert_eq!(steps.len(), 3);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert!(!used_fallback(&outcome.report, &LabelSet::default()));
    }

    #[tokio::test]
    async fn headingless_reply_falls_back_to_overview() {
        let outcome = analyser(MockProvider::new().with_response("Looks like a wiper blade."))
            .analyse(&details(), image())
            .await
            .unwrap();

        assert_eq!(outcome.report.sections.body("OVERVIEW"), "Looks like a wiper blade.");
        assert!(used_fallback(&outcome.report, &LabelSet::default()));
        assert!(outcome.report.banner.is_none());
    }

    #[tokio::test]
    async fn blank_reply_is_empty_completion() {
        let err = analyser(MockProvider::new().with_response("  \n "))
            .analyse(&details(), image())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FitmentError>(),
            Some(FitmentError::EmptyCompletion(_))
        ));
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let err = analyser(MockProvider::new().failing(MockFailure::Unreachable))
            .analyse(&details(), image())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FitmentError>(),
            Some(FitmentError::BackendUnreachable { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_details_never_reach_provider() {
        let mut details = details();
        details.make.clear();
        let err = analyser(MockProvider::new().failing(MockFailure::Backend))
            .analyse(&details, image())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FitmentError>(),
            Some(FitmentError::InvalidInput(_))
        ));
    }
}
