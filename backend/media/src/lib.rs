//! Upload handling for part photos: size limit, image type checks, and
//! base64 encoding for the inference backends.
//!
//! Images are forwarded as uploaded; no resizing or re-encoding happens here.

pub mod mime_detect;
pub mod upload;

pub use mime_detect::{detect_mime_type, is_image, sniff_image_mime};
pub use upload::{UploadedImage, DEFAULT_MAX_UPLOAD_BYTES};
