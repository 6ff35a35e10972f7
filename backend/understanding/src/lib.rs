//! Response understanding for the fitment assistant.
//!
//! Everything here is pure: raw completion text in, structured sections out.
//! No I/O, no shared state, safe to call from any number of requests.

pub mod classify;
pub mod escape;
pub mod normalize;
pub mod report;
pub mod sections;

pub use classify::{banner_status, classify, FitmentStatus};
pub use escape::{escape_html, unescape_html};
pub use normalize::{normalize, NormalizedBody, DEFAULT_TOOLS, NOT_PROVIDED};
pub use report::{Banner, FitmentReport, SectionCard};
pub use sections::{extract, HeadingMatcher, SectionMap};
