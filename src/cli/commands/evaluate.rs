use anyhow::{ bail, Result };
use colored::*;
use std::path::Path;

use cbc_synth::config::SynthConfig;
use cbc_synth::implementations::evaluation::{
    self,
    EvaluationResult,
    EvaluationSummary,
    Evaluator,
    SkipList,
};

use crate::cli::commands::build_pipeline;
use crate::cli::ui;

/// Evaluate command that runs every statement of the selected projects
pub async fn execute(
    config: SynthConfig,
    diagrams: &Path,
    projects: Option<&[String]>,
    skip: &[String],
    runs: u32,
    results: Option<&Path>
) -> Result<EvaluationSummary> {
    if runs == 0 {
        bail!("--runs must be at least 1");
    }

    let skip = SkipList::parse(skip)?;

    ui::print_header("CbC Synthesis Evaluation");
    let tasks = evaluation::collect_tasks(diagrams, projects, &skip)?;
    ui::print_info(&format!("Collected {} statements, {} run(s) each", tasks.len(), runs));
    if tasks.is_empty() {
        ui::print_warning("Nothing to evaluate");
    }

    let pipeline = build_pipeline(config)?;
    let progress = ui::evaluation_progress((tasks.len() as u64) * (runs as u64));
    let mut running = EvaluationSummary::default();
    let records = Evaluator::new(&pipeline).run(&tasks, runs, |record| {
        running.add(record.result);
        progress.set_message(ui::tally(&running));
        let mark = match record.result {
            EvaluationResult::Verified => "✓".green(),
            EvaluationResult::Exhausted => "✗".yellow(),
            EvaluationResult::Fatal => "⚠".red(),
        };
        progress.println(
            format!("{} {} {} (run {}/{})", mark, record.project, record.statement_file, record.run + 1, runs)
        );
        progress.inc(1);
    }).await;
    progress.finish_and_clear();

    let summary = EvaluationSummary::from_records(&records);
    ui::print_summary(&summary);

    if let Some(path) = results {
        evaluation::save_results(&records, path)?;
        ui::print_success(&format!("Results saved to {}", path.display()));
    }

    Ok(summary)
}
