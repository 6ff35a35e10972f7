//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use fitment_core::FitmentError;

/// An error rendered as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

fn status_for(err: &FitmentError) -> StatusCode {
    match err {
        FitmentError::InvalidInput(_) | FitmentError::UnsupportedMedia(_) => StatusCode::BAD_REQUEST,
        FitmentError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        FitmentError::BackendUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        FitmentError::Backend { .. } | FitmentError::EmptyCompletion(_) => StatusCode::BAD_GATEWAY,
        FitmentError::InvalidLabels(_) | FitmentError::ConfigError(_) | FitmentError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<FitmentError> for ApiError {
    fn from(err: FitmentError) -> Self {
        Self {
            status: status_for(&err),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let status = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<FitmentError>())
            .map_or(StatusCode::INTERNAL_SERVER_ERROR, status_for);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "{}", self.message);
        } else {
            warn!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
