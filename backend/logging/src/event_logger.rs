//! Analysis Event Logger
//!
//! One structured record per analysis request, emitted through `tracing` so
//! it lands in the NDJSON file alongside everything else.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    Completed {
        provider: String,
        model: String,
        /// Banner status, if the reply had a RESULT or COMPATIBILITY section.
        status: Option<String>,
        infer_ms: u64,
        reply_chars: usize,
        /// Whether the whole reply fell back to a single section.
        fallback: bool,
    },
    Failed {
        provider: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: AnalysisEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact and emit one event. Returns the entry that was logged.
    pub fn log_event(request_id: &str, mut event: AnalysisEvent) -> EventLogEntry {
        if let AnalysisEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        let entry = EventLogEntry {
            request_id: request_id.to_string(),
            timestamp: Utc::now(),
            event,
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        match &entry.event {
            AnalysisEvent::Completed { .. } => info!(target: "fitment::analysis", event = %json, "analysis completed"),
            AnalysisEvent::Failed { .. } => warn!(target: "fitment::analysis", event = %json, "analysis failed"),
        }
        entry
    }
}
