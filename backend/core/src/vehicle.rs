use serde::{Deserialize, Serialize};

use crate::error::FitmentError;

/// Vehicle metadata submitted alongside the part photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub year: String,
    pub make: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    pub notes: String,
}

impl VehicleDetails {
    /// Check required fields. Year must be numeric.
    pub fn validate(&self) -> Result<(), FitmentError> {
        let missing: Vec<&str> = [
            ("year", &self.year),
            ("make", &self.make),
            ("model", &self.model),
            ("notes", &self.notes),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(FitmentError::InvalidInput(format!(
                "Year, make, model, and description/notes are required (missing: {}).",
                missing.join(", ")
            )));
        }
        if !self.year.trim().chars().all(|c| c.is_ascii_digit()) {
            return Err(FitmentError::InvalidInput(format!(
                "Year must be numeric, got \"{}\".",
                self.year.trim()
            )));
        }
        Ok(())
    }

    /// Product URL if one was given and it is not blank.
    pub fn product_url(&self) -> Option<&str> {
        self.product_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
