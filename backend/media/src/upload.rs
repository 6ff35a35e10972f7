//! Validated image uploads.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use fitment_core::{FitmentError, ImageAttachment};
use tracing::debug;

use crate::mime_detect::{detect_mime_type, is_image, sniff_image_mime};

/// 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// An image that passed the size and type checks.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadedImage {
    /// Validate an upload.
    ///
    /// The declared content type must be `image/*`. When the bytes carry a
    /// known image signature that type wins over the declared one.
    pub fn from_upload(
        data: Bytes,
        declared_mime: Option<&str>,
        max_bytes: usize,
    ) -> Result<Self, FitmentError> {
        if data.is_empty() {
            return Err(FitmentError::InvalidInput(
                "Please upload an image file.".to_string(),
            ));
        }
        if data.len() > max_bytes {
            return Err(FitmentError::UploadTooLarge {
                size: data.len(),
                limit: max_bytes,
            });
        }

        let declared = declared_mime.map(str::trim).filter(|m| !m.is_empty());
        if let Some(mime) = declared {
            if !is_image(mime) {
                return Err(FitmentError::UnsupportedMedia(format!(
                    "only image uploads are allowed (got {mime})"
                )));
            }
        }

        let mime_type = match (sniff_image_mime(&data), declared) {
            (Some(sniffed), _) => sniffed.to_string(),
            (None, Some(declared)) => declared.to_ascii_lowercase(),
            (None, None) => {
                return Err(FitmentError::UnsupportedMedia(
                    "could not recognise the image format".to_string(),
                ))
            }
        };

        debug!(bytes = data.len(), mime = %mime_type, "Accepted image upload");
        Ok(Self { mime_type, data })
    }

    /// Read and validate an image from disk (CLI use).
    pub async fn from_path(path: &Path, max_bytes: usize) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image: {}", path.display()))?;
        let declared = detect_mime_type(path);
        let declared = is_image(declared).then_some(declared);
        Ok(Self::from_upload(Bytes::from(data), declared, max_bytes)?)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Base64-encode for transport.
    pub fn to_attachment(&self) -> ImageAttachment {
        ImageAttachment {
            mime_type: self.mime_type.clone(),
            base64: STANDARD.encode(&self.data),
        }
    }
}
