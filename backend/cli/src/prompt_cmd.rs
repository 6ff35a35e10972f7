//! `fitment prompt`

use anyhow::Result;

use fitment_config::FitmentConfig;
use fitment_inference::build_system_prompt;

pub fn run(config: &FitmentConfig) -> Result<()> {
    println!("{}", build_system_prompt(&config.label_set()?));
    Ok(())
}
