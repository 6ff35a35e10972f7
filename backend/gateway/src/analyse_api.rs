//! `POST /api/analyse`: multipart photo plus vehicle details in, parsed
//! report out.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use fitment_core::VehicleDetails;
use fitment_media::UploadedImage;
use fitment_render::Renderer;
use fitment_understanding::{FitmentReport, SectionMap};

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyseResponse {
    pub raw_text: String,
    pub sections: SectionMap,
    pub report: FitmentReport,
    pub html: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

#[derive(Default)]
struct AnalyseForm {
    image: Option<(Bytes, Option<String>)>,
    details: VehicleDetails,
}

fn multipart_error(err: MultipartError) -> ApiError {
    let status = match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    ApiError {
        status,
        message: err.body_text(),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyseForm, ApiError> {
    let mut form = AnalyseForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            form.image = Some((data, content_type));
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "year" => form.details.year = value,
            "make" => form.details.make = value,
            "model" => form.details.model = value,
            "productUrl" => form.details.product_url = Some(value),
            "notes" => form.details.notes = value,
            _ => {}
        }
    }
    Ok(form)
}

/// Handler for `POST /api/analyse`.
pub async fn analyse(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let form = read_form(multipart).await?;

    let (data, content_type) = form
        .image
        .ok_or_else(|| ApiError::bad_request("Please upload an image file."))?;
    form.details.validate()?;
    let image = UploadedImage::from_upload(data, content_type.as_deref(), state.max_upload_bytes)?;

    info!(
        bytes = image.len(),
        mime = %image.mime_type,
        year = %form.details.year,
        make = %form.details.make,
        model = %form.details.model,
        "Analyse request"
    );

    let outcome = state.analyser.analyse(&form.details, image.to_attachment()).await?;

    Ok(Json(AnalyseResponse {
        html: Renderer::to_html(&outcome.report),
        sections: outcome.report.sections.clone(),
        report: outcome.report,
        raw_text: outcome.raw_text,
        provider: outcome.provider,
        model: outcome.model,
        latency_ms: outcome.latency_ms,
    }))
}
