use anyhow::{ Context, Result };
use std::fs;
use std::path::Path;

use cbc_synth::config::SynthConfig;
use cbc_synth::implementations::contract_extractor::ContractExtractor;
use cbc_synth::implementations::model_reader::ModelReader;
use cbc_synth::implementations::prompt_builder::PromptBuilder;
use cbc_synth::implementations::skeleton::SkeletonFormat;
use cbc_synth::models::attempt::AttemptHistory;

use crate::cli::ui;

/// Extract command that shows what the oracle would be asked
pub async fn execute(
    config: &SynthConfig,
    statement_path: &Path,
    statement: &str,
    model: &Path,
    cbc_id: &str
) -> Result<()> {
    let content = fs
        ::read_to_string(statement_path)
        .with_context(|| format!("Failed to read {}", statement_path.display()))?;
    let format = SkeletonFormat::from_path(statement_path);
    let contract = ContractExtractor::new(format).extract(&content, statement)?;

    let model_content = fs
        ::read_to_string(model)
        .with_context(|| format!("Failed to read {}", model.display()))?;
    let variables = ModelReader::read(&model_content, cbc_id)?;

    ui::display_contract(&contract, &variables);

    let prompt = PromptBuilder::new(config.retry.feedback_window).build(
        &contract,
        &variables,
        &AttemptHistory::new()
    );
    ui::print_header("First prompt");
    ui::print_prompt(&prompt);

    Ok(())
}
