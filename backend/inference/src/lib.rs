pub mod analyser;
pub mod prompt;
pub mod providers;

pub use analyser::{AnalyserSettings, AnalysisOutcome, FitmentAnalyser};
pub use prompt::{build_system_prompt, build_user_prompt};
pub use providers::{provider_from_config, ProviderRegistry};
