use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Arc;

use chrono::{ DateTime, Utc };
use log::{ info, warn };
use serde::Serialize;

use crate::config::SynthConfig;
use crate::errors::{ SynthError, SynthResult };
use crate::implementations::retry_controller::{ PipelineOutcome, RetryController };
use crate::implementations::session::{ Session, SessionRequest };
use crate::models::attempt::AttemptHistory;
use crate::models::contract::Contract;
use crate::traits::synthesis_oracle::SynthesisOracle;
use crate::traits::verifier_runner::VerifierRunner;

/// How a completed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Verified,
    Exhausted,
}

impl RunStatus {
    /// Process exit code for this status
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Verified => 0,
            RunStatus::Exhausted => 1,
        }
    }
}

/// Serializable record of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub statement_id: String,
    pub skeleton: PathBuf,
    pub slot: String,
    pub contract: Contract,
    pub status: RunStatus,
    /// Evaluated attempts, the verified one included
    pub attempts: u32,
    pub verified_candidate: Option<String>,
    pub history: AttemptHistory,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl RunReport {
    pub fn save(&self, path: &Path) -> SynthResult<()> {
        write_report(self, path)
    }
}

/// Report of a run stopped by a fatal error, in the shape of [`RunReport`]
/// minus the fields only a completed run has
#[derive(Debug, Clone, Serialize)]
pub struct FatalReport {
    pub statement_id: String,
    pub skeleton: PathBuf,
    pub slot: String,
    /// Always `"fatal"`
    pub status: &'static str,
    pub error: String,
    pub finished_at: DateTime<Utc>,
}

impl FatalReport {
    pub fn new(request: &SessionRequest, error: &SynthError) -> Self {
        Self {
            statement_id: request.statement_id.clone(),
            skeleton: request.skeleton_path.clone(),
            slot: request.slot.clone(),
            status: "fatal",
            error: error.to_string(),
            finished_at: Utc::now(),
        }
    }

    pub fn save(&self, path: &Path) -> SynthResult<()> {
        write_report(self, path)
    }
}

fn write_report<T: Serialize>(report: &T, path: &Path) -> SynthResult<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| {
        SynthError::SystemError(format!("Failed to serialize report: {}", e))
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!("Run report saved to {}", path.display());
    Ok(())
}

/// One synthesis problem from skeleton to report
pub struct Pipeline {
    config: SynthConfig,
    controller: RetryController,
}

impl Pipeline {
    pub fn new(
        config: SynthConfig,
        oracle: Arc<dyn SynthesisOracle>,
        verifier: Arc<dyn VerifierRunner>
    ) -> Self {
        let controller = RetryController::new(
            oracle,
            verifier,
            config.retry.clone(),
            &config.interpreter
        );
        Self { config, controller }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Run the attempt loop for `request`
    ///
    /// When `output` is given, a verified artifact is written there before the
    /// working copy is released. The working copy is removed on every path.
    pub async fn run(&self, request: &SessionRequest, output: Option<&Path>) -> SynthResult<RunReport> {
        let started_at = Utc::now();
        let mut session = Session::open(request, &self.config)?;

        let result = self.drive(&mut session, output).await;
        if let Err(e) = session.close() {
            warn!("{}", e);
        }
        let Finished { contract, outcome } = result?;
        let finished_at = Utc::now();
        let (status, attempts, verified_candidate, history) = match outcome {
            PipelineOutcome::Succeeded { candidate, attempt, history, .. } =>
                (RunStatus::Verified, attempt, Some(candidate.text().to_string()), history),
            PipelineOutcome::Exhausted { history } =>
                (RunStatus::Exhausted, history.len() as u32, None, history),
        };

        let report = RunReport {
            statement_id: request.statement_id.clone(),
            skeleton: request.skeleton_path.clone(),
            slot: request.slot.clone(),
            contract,
            status,
            attempts,
            verified_candidate,
            history,
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
        };
        Ok(report)
    }

    async fn drive(&self, session: &mut Session, output: Option<&Path>) -> SynthResult<Finished> {
        let outcome = self.controller.run(session).await?;
        if let (PipelineOutcome::Succeeded { artifact, .. }, Some(path)) = (&outcome, output) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, artifact)?;
            info!("Verified artifact written to {}", path.display());
        }
        Ok(Finished {
            contract: session.contract().clone(),
            outcome,
        })
    }
}

struct Finished {
    contract: Contract,
    outcome: PipelineOutcome,
}
