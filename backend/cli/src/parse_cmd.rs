//! `fitment parse`: run a saved reply through the parser without a model.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use fitment_config::FitmentConfig;
use fitment_understanding::FitmentReport;
use fitment_render::Renderer;

use crate::terminal_output::paint_report;

pub async fn run(config: &FitmentConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
    };

    let report = FitmentReport::from_text(&raw, &config.label_set()?);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", paint_report(&Renderer::to_plain_text(&report), report.status()));
    }
    Ok(())
}
