pub mod error;
pub mod traits;
pub mod types;
pub mod vehicle;

pub use error::FitmentError;
pub use traits::{ImageAttachment, VisionProvider, VisionRequest, VisionResponse};
pub use types::{Label, LabelSet, ListPolicy, SectionKind};
pub use vehicle::VehicleDetails;
