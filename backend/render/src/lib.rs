//! Renderers for fitment reports
//!
//! Lays a [`FitmentReport`](fitment_understanding::FitmentReport) out as an
//! HTML fragment (status banner plus one card per section) or as plain text
//! for the terminal.

pub mod html;
pub mod text;

pub use html::to_html;
pub use text::to_plain_text;

pub struct Renderer;

impl Renderer {
    pub fn to_html(report: &fitment_understanding::FitmentReport) -> String {
        html::to_html(report)
    }

    pub fn to_plain_text(report: &fitment_understanding::FitmentReport) -> String {
        text::to_plain_text(report)
    }
}
