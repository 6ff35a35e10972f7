//! Structured logging for the fitment assistant.
//!
//! Console and rolling-file subscribers, log redaction, and per-analysis
//! event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, EventLogEntry, EventLogger};
pub use logger::{init_logger, LoggerOptions};
pub use redact::redact_sensitive_data;
