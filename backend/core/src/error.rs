use thiserror::Error;

/// Top-level error type for the fitment assistant.
///
/// The response parser never produces these; they come from input
/// validation, upload handling and the inference backends.
#[derive(Debug, Error)]
pub enum FitmentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid section labels: {0}")]
    InvalidLabels(String),

    #[error("image too large: {size} bytes (max {limit})")]
    UploadTooLarge { size: usize, limit: usize },

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("{provider} is not reachable: {message}")]
    BackendUnreachable { provider: String, message: String },

    #[error("{provider} responded with an error: {message}")]
    Backend { provider: String, message: String },

    #[error("received an empty completion from {0}")]
    EmptyCompletion(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
