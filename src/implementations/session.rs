use std::fs;
use std::path::{ Path, PathBuf };

use log::{ debug, info, warn };
use tempfile::TempDir;

use crate::config::SynthConfig;
use crate::errors::{ SynthError, SynthResult };
use crate::implementations::contract_extractor::ContractExtractor;
use crate::implementations::model_reader::ModelReader;
use crate::implementations::skeleton::SkeletonFormat;
use crate::models::attempt::AttemptHistory;
use crate::models::contract::{ Contract, VariableSet };

/// Everything needed to start a run for one statement
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub skeleton_path: PathBuf,
    pub statement_id: String,
    pub model_path: PathBuf,
    pub component_id: String,
    /// Project directory the verifier runs from; the skeleton's directory when unset
    pub context_dir: Option<PathBuf>,
    /// Distinguishes working copies of concurrent runs on the same skeleton
    pub slot: String,
    /// Force the loop-update hint regardless of markers in the skeleton
    pub loop_update: bool,
}

/// State owned by a single pipeline run
///
/// The working copy lives in a private temporary directory that is removed
/// when the session is closed or dropped, whichever way the run ends. The
/// original skeleton is never written.
#[derive(Debug)]
pub struct Session {
    original_path: PathBuf,
    format: SkeletonFormat,
    base_content: String,
    work_dir: TempDir,
    working_copy: PathBuf,
    context_dir: PathBuf,
    contract: Contract,
    variables: VariableSet,
    history: AttemptHistory,
}

impl Session {
    /// Extract the contract and variables, then set up the working copy
    pub fn open(request: &SessionRequest, config: &SynthConfig) -> SynthResult<Self> {
        let format = SkeletonFormat::from_path(&request.skeleton_path);
        let base_content = fs::read_to_string(&request.skeleton_path).map_err(|e| {
            SynthError::ParseError(
                format!("cannot read proof skeleton {}: {}", request.skeleton_path.display(), e)
            )
        })?;
        let contract = ContractExtractor::new(format)
            .extract(&base_content, &request.statement_id)?;
        let contract = if request.loop_update {
            contract.with_loop_update(true)
        } else {
            contract
        };

        let model_content = fs::read_to_string(&request.model_path).map_err(|e| {
            SynthError::ModelError(
                format!("cannot read model description {}: {}", request.model_path.display(), e)
            )
        })?;
        let variables = ModelReader::read(&model_content, &request.component_id)?;

        let context_dir = resolve_context_dir(request);
        let work_dir = create_work_dir(request, config)?;
        let file_name = request.skeleton_path
            .file_name()
            .ok_or_else(|| {
                SynthError::ParseError(
                    format!("{} is not a file path", request.skeleton_path.display())
                )
            })?;
        let working_copy = work_dir.path().join(file_name);
        fs::write(&working_copy, &base_content)?;

        for name in &config.verifier.support_files {
            let source = context_dir.join(name);
            if source.is_file() {
                fs::copy(&source, work_dir.path().join(name))?;
                debug!("Copied support file {}", source.display());
            }
        }

        info!("Working copy at {}", working_copy.display());

        Ok(Self {
            original_path: request.skeleton_path.clone(),
            format,
            base_content,
            work_dir,
            working_copy,
            context_dir,
            contract,
            variables,
            history: AttemptHistory::new(),
        })
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn format(&self) -> SkeletonFormat {
        self.format
    }

    /// Skeleton content as read at session start
    pub fn base_content(&self) -> &str {
        &self.base_content
    }

    pub fn working_copy(&self) -> &Path {
        &self.working_copy
    }

    pub fn context_dir(&self) -> &Path {
        &self.context_dir
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    pub fn history(&self) -> &AttemptHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut AttemptHistory {
        &mut self.history
    }

    /// Replace the working copy with `content`
    pub fn write_working_copy(&self, content: &str) -> SynthResult<()> {
        fs::write(&self.working_copy, content)?;
        Ok(())
    }

    /// Remove the working copy, reporting cleanup failures
    pub fn close(self) -> SynthResult<()> {
        let path = self.work_dir.path().to_path_buf();
        self.work_dir
            .close()
            .map_err(|e| {
                SynthError::SystemError(format!("failed to remove {}: {}", path.display(), e))
            })?;
        debug!("Removed working directory {}", path.display());
        Ok(())
    }
}

fn resolve_context_dir(request: &SessionRequest) -> PathBuf {
    let fallback = request.skeleton_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    match &request.context_dir {
        Some(dir) if dir.is_dir() => dir.clone(),
        Some(dir) => {
            warn!("Project directory {} not found, using {}", dir.display(), fallback.display());
            fallback
        }
        None => fallback,
    }
}

fn create_work_dir(request: &SessionRequest, config: &SynthConfig) -> SynthResult<TempDir> {
    let stem = request.skeleton_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");
    let prefix = format!("temp_{}_{}_", stem, request.slot);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);

    let dir = match &config.work_root {
        Some(root) => {
            fs::create_dir_all(root)?;
            builder.tempdir_in(root)?
        }
        None => builder.tempdir()?,
    };
    Ok(dir)
}
