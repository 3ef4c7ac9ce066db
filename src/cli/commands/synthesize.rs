use anyhow::Result;
use std::path::{ Path, PathBuf };

use cbc_synth::config::SynthConfig;
use cbc_synth::implementations::pipeline::{ FatalReport, RunStatus };
use cbc_synth::implementations::session::SessionRequest;

use crate::cli::commands::build_pipeline;
use crate::cli::ui;

/// Arguments of the synthesize command
pub struct SynthesizeArgs<'a> {
    pub src_dir: &'a Path,
    pub project: &'a str,
    pub statement: &'a str,
    pub statement_path: &'a Path,
    pub model: &'a Path,
    pub cbc_id: &'a str,
    pub slot: &'a str,
    pub loop_update: bool,
    pub max_attempts: Option<u32>,
    pub output: Option<&'a Path>,
    pub report: Option<&'a Path>,
}

impl SynthesizeArgs<'_> {
    fn project_dir(&self) -> PathBuf {
        self.src_dir.join(format!("prove{}", self.project))
    }
}

/// Synthesize command that runs the attempt loop for one statement
pub async fn execute(mut config: SynthConfig, args: SynthesizeArgs<'_>) -> Result<RunStatus> {
    if let Some(max_attempts) = args.max_attempts {
        config.retry.max_attempts = max_attempts;
        config.validate()?;
    }

    ui::print_header("CbC Statement Synthesis");
    ui::print_result("Project", args.project);
    ui::print_result("Statement", args.statement);
    ui::print_result("Skeleton", &args.statement_path.display().to_string());
    ui::print_result("Max attempts", &config.retry.max_attempts.to_string());

    let request = SessionRequest {
        skeleton_path: args.statement_path.to_path_buf(),
        statement_id: args.statement.to_string(),
        model_path: args.model.to_path_buf(),
        component_id: args.cbc_id.to_string(),
        context_dir: Some(args.project_dir()),
        slot: args.slot.to_string(),
        loop_update: args.loop_update,
    };

    let pipeline = build_pipeline(config)?;
    let spinner = ui::spinner_with_message("Synthesizing and verifying...");
    let result = pipeline.run(&request, args.output).await;
    spinner.finish_and_clear();
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(path) = args.report {
                FatalReport::new(&request, &e).save(path)?;
                ui::print_info(&format!("Fatal run report saved to {}", path.display()));
            }
            return Err(e.into());
        }
    };

    ui::print_report(&report);
    if let Some(path) = args.output {
        if report.status == RunStatus::Verified {
            ui::print_success(&format!("Verified artifact saved to {}", path.display()));
        }
    }
    if let Some(path) = args.report {
        report.save(path)?;
        ui::print_info(&format!("Run report saved to {}", path.display()));
    }

    Ok(report.status)
}
