//! `fitment analyse`

use std::path::Path;

use anyhow::Result;

use fitment_config::FitmentConfig;
use fitment_core::VehicleDetails;
use fitment_inference::FitmentAnalyser;
use fitment_media::UploadedImage;
use fitment_render::Renderer;

use crate::terminal_output::{note_info, paint_report};

pub async fn run(config: &FitmentConfig, image: &Path, details: VehicleDetails, json: bool) -> Result<()> {
    details.validate()?;
    let image = UploadedImage::from_path(image, config.server.max_upload_bytes).await?;
    let analyser = FitmentAnalyser::from_config(config)?;

    if !json {
        note_info(&format!(
            "Asking {} ({}) about a {} byte {} image...",
            analyser.provider_name(),
            analyser.model(),
            image.len(),
            image.mime_type
        ));
    }

    let outcome = analyser.analyse(&details, image.to_attachment()).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", paint_report(&Renderer::to_plain_text(&outcome.report), outcome.report.status()));
    }
    Ok(())
}
