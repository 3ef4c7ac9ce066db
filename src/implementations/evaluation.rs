use std::collections::{ BTreeSet, HashMap };
use std::fs;
use std::path::{ Path, PathBuf };

use chrono::{ DateTime, Utc };
use log::{ info, warn };
use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use crate::errors::{ SynthError, SynthResult };
use crate::implementations::config::ConfigError;
use crate::implementations::pipeline::{ Pipeline, RunStatus };
use crate::implementations::session::SessionRequest;
use crate::implementations::skeleton;

/// One statement file found under a project's proof folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationTask {
    pub project: String,
    /// File stem, e.g. `Statement3`
    pub statement_file: String,
    pub statement_path: PathBuf,
    pub model_path: PathBuf,
    pub context_dir: PathBuf,
    /// Value of the `//statementid` marker
    pub cbc_id: String,
}

impl EvaluationTask {
    pub fn request(&self, run: u32) -> SessionRequest {
        SessionRequest {
            skeleton_path: self.statement_path.clone(),
            statement_id: self.cbc_id.clone(),
            model_path: self.model_path.clone(),
            component_id: self.cbc_id.clone(),
            context_dir: Some(self.context_dir.clone()),
            slot: run.to_string(),
            loop_update: false,
        }
    }
}

/// Outcome of a single evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationResult {
    Verified,
    Exhausted,
    Fatal,
}

impl From<RunStatus> for EvaluationResult {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Verified => EvaluationResult::Verified,
            RunStatus::Exhausted => EvaluationResult::Exhausted,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub project: String,
    pub statement_file: String,
    pub cbc_id: String,
    pub run: u32,
    pub result: EvaluationResult,
    pub attempts: Option<u32>,
    pub verified_candidate: Option<String>,
    pub error: Option<String>,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub verified: usize,
    pub exhausted: usize,
    pub fatal: usize,
}

impl EvaluationSummary {
    pub fn from_records(records: &[EvaluationRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.add(record.result);
        }
        summary
    }

    /// Count one more run
    pub fn add(&mut self, result: EvaluationResult) {
        self.total += 1;
        match result {
            EvaluationResult::Verified => {
                self.verified += 1;
            }
            EvaluationResult::Exhausted => {
                self.exhausted += 1;
            }
            EvaluationResult::Fatal => {
                self.fatal += 1;
            }
        }
    }

    /// Whole-number percentage of `count` in the total
    pub fn percent(&self, count: usize) -> usize {
        if self.total == 0 { 0 } else { (100 * count) / self.total }
    }
}

#[derive(Debug, Serialize)]
struct EvaluationResults<'a> {
    generated_at: DateTime<Utc>,
    summary: EvaluationSummary,
    records: &'a [EvaluationRecord],
}

/// Statement numbers left out of an evaluation, per project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    statements: HashMap<String, BTreeSet<u32>>,
}

impl SkipList {
    /// Parse `Project:1,2` entries; repeated projects accumulate
    pub fn parse(entries: &[String]) -> SynthResult<Self> {
        let mut skip = Self::default();
        for entry in entries {
            let invalid = || {
                SynthError::ConfigError(
                    ConfigError::InvalidValue(
                        format!("skip entry `{}` is not of the form Project:1,2", entry)
                    )
                )
            };
            let (project, numbers) = entry.split_once(':').ok_or_else(invalid)?;
            let project = project.trim();
            if project.is_empty() {
                return Err(invalid());
            }
            let numbers = numbers
                .split(',')
                .map(|n| n.trim().parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid())?;
            skip.statements.entry(project.to_string()).or_default().extend(numbers);
        }
        Ok(skip)
    }

    pub fn skips(&self, project: &str, statement: u32) -> bool {
        self.statements.get(project).map_or(false, |numbers| numbers.contains(&statement))
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Projects under `diagrams`, taken from `prove<Project>` folder names
pub fn available_projects(diagrams: &Path) -> SynthResult<Vec<String>> {
    let mut projects = Vec::new();
    for entry in fs::read_dir(diagrams)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(project) = name.strip_prefix("prove") {
            if !project.is_empty() {
                projects.push(project.to_string());
            }
        }
    }
    projects.sort();
    Ok(projects)
}

/// Collect every `Statement<N>.key` of the selected projects that `skip` does
/// not name
///
/// Projects without a proof folder or a `<Project>.model.yaml` next to it are
/// skipped with a warning, as are statement files without a statement id.
pub fn collect_tasks(
    diagrams: &Path,
    projects: Option<&[String]>,
    skip: &SkipList
) -> SynthResult<Vec<EvaluationTask>> {
    if !diagrams.is_dir() {
        return Err(
            SynthError::SystemError(format!("Diagrams directory not found: {}", diagrams.display()))
        );
    }

    let projects = match projects {
        Some(selected) => selected.to_vec(),
        None => available_projects(diagrams)?,
    };
    let statement_file = Regex::new(r"^Statement(\d+)\.key$").map_err(|e|
        SynthError::SystemError(e.to_string())
    )?;

    let mut tasks = Vec::new();
    for project in projects {
        let prove_dir = diagrams.join(format!("prove{}", project));
        let model_path = diagrams.join(format!("{}.model.yaml", project));
        if !prove_dir.is_dir() {
            warn!("Proof folder not found for project '{}': {}", project, prove_dir.display());
            continue;
        }
        if !model_path.is_file() {
            warn!("Model file not found for project '{}': {}", project, model_path.display());
            continue;
        }

        for entry in WalkDir::new(&prove_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| SynthError::SystemError(e.to_string()))?;
            let name = entry.file_name().to_string_lossy();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(number) = statement_file.captures(&name).map(|c| c[1].parse::<u32>().ok()) else {
                continue;
            };
            if number.map_or(false, |n| skip.skips(&project, n)) {
                info!("Skipping {} {}", project, name);
                continue;
            }

            let content = fs::read_to_string(entry.path())?;
            let Some(cbc_id) = skeleton::marker(&content, "statementid") else {
                warn!("No statement id in {}", entry.path().display());
                continue;
            };

            tasks.push(EvaluationTask {
                project: project.clone(),
                statement_file: name.trim_end_matches(".key").to_string(),
                statement_path: entry.path().to_path_buf(),
                model_path: model_path.clone(),
                context_dir: prove_dir.clone(),
                cbc_id,
            });
        }
    }

    info!("Collected {} tasks for evaluation", tasks.len());
    Ok(tasks)
}

/// Runs every task `runs` times, one after another
pub struct Evaluator<'a> {
    pipeline: &'a Pipeline,
}

impl<'a> Evaluator<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self { pipeline }
    }

    /// `on_record` is called after every run; fatal errors are recorded, not raised
    pub async fn run<F>(&self, tasks: &[EvaluationTask], runs: u32, mut on_record: F) -> Vec<EvaluationRecord>
        where F: FnMut(&EvaluationRecord)
    {
        let mut records = Vec::with_capacity(tasks.len() * (runs as usize));
        for task in tasks {
            for run in 0..runs {
                let started_at = Utc::now();
                let record = match self.pipeline.run(&task.request(run), None).await {
                    Ok(report) =>
                        EvaluationRecord {
                            project: task.project.clone(),
                            statement_file: task.statement_file.clone(),
                            cbc_id: task.cbc_id.clone(),
                            run,
                            result: report.status.into(),
                            attempts: Some(report.attempts),
                            verified_candidate: report.verified_candidate,
                            error: None,
                            duration_ms: report.duration_ms,
                        },
                    Err(e) => {
                        warn!("{} {} run {} failed: {}", task.project, task.statement_file, run, e);
                        EvaluationRecord {
                            project: task.project.clone(),
                            statement_file: task.statement_file.clone(),
                            cbc_id: task.cbc_id.clone(),
                            run,
                            result: EvaluationResult::Fatal,
                            attempts: None,
                            verified_candidate: None,
                            error: Some(e.to_string()),
                            duration_ms: (Utc::now() - started_at).num_milliseconds(),
                        }
                    }
                };
                on_record(&record);
                records.push(record);
            }
        }
        records
    }
}

/// Write records and their summary as pretty JSON
pub fn save_results(records: &[EvaluationRecord], path: &Path) -> SynthResult<()> {
    let results = EvaluationResults {
        generated_at: Utc::now(),
        summary: EvaluationSummary::from_records(records),
        records,
    };
    let json = serde_json::to_string_pretty(&results).map_err(|e|
        SynthError::SystemError(format!("Failed to serialize results: {}", e))
    )?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!("Results saved to {}", path.display());
    Ok(())
}
