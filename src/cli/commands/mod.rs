use anyhow::{ Context, Result };
use log::info;
use std::path::Path;
use std::sync::Arc;

use cbc_synth::config::SynthConfig;
use cbc_synth::implementations::key_verifier::KeyVerifierRunner;
use cbc_synth::implementations::llm_oracle::LlmSynthesisOracle;
use cbc_synth::implementations::pipeline::Pipeline;

pub mod evaluate;
pub mod extract;
pub mod synthesize;

/// Load the configuration file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<SynthConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SynthConfig::from_file(path).with_context(||
                format!("Failed to load configuration from {}", path.display())
            )
        }
        None => Ok(SynthConfig::default()),
    }
}

/// Pipeline backed by the configured LLM provider and KeY
pub fn build_pipeline(config: SynthConfig) -> Result<Pipeline> {
    let oracle = LlmSynthesisOracle::new(config.oracle.clone()).context(
        "Failed to set up the synthesis oracle"
    )?;
    let verifier = KeyVerifierRunner::new(config.verifier.clone());
    Ok(Pipeline::new(config, Arc::new(oracle), Arc::new(verifier)))
}
