//! Scripted oracle and verifier doubles shared by the test modules.

use std::collections::VecDeque;
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::SynthConfig;
use crate::errors::{ OracleError, SynthResult };
use crate::implementations::session::SessionRequest;
use crate::models::verification::VerifierRun;
use crate::traits::synthesis_oracle::SynthesisOracle;
use crate::traits::verifier_runner::VerifierRunner;

pub const COUNTER_JAVA: &str = include_str!("fixtures/Counter.java");
pub const STATEMENT_KEY: &str = include_str!("fixtures/Statement1.key");
pub const MODEL_YAML: &str = include_str!("fixtures/model.yaml");

pub const STATEMENT_KEY_ID: &str = "6d1f0c2a-3b4e-4f5a-9c8d-1e2f3a4b5c6d";

pub const PROOF_CLOSED: &str = "Proof loaded.\nProof closed.\nOpen goals: 0\n";
pub const PROOF_OPEN: &str = "Proof loaded.\nProof open.\nOpen goals: 1\nCounterexample: x = 0, y = 1\n";

/// Oracle replaying a fixed list of responses, repeating the last one
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
    last: Mutex<Option<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new(responses: Vec<Result<String, OracleError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisOracle for ScriptedOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.responses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                response
            }
            None => last.clone().unwrap_or(Err(OracleError::EmptyOrMalformed)),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Oracle that never answers within any reasonable budget
pub struct StalledOracle {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SynthesisOracle for StalledOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("x = x + 1;".to_string())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

type Judge = dyn Fn(&str) -> SynthResult<VerifierRun> + Send + Sync;

/// Verifier deciding from the content of the working copy
pub struct ScriptedVerifier {
    judge: Box<Judge>,
    runs: AtomicUsize,
    seen: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl ScriptedVerifier {
    pub fn new(judge: impl Fn(&str) -> SynthResult<VerifierRun> + Send + Sync + 'static) -> Self {
        Self {
            judge: Box::new(judge),
            runs: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Closes the proof exactly when the artifact contains `statement`
    pub fn accepting(statement: &'static str) -> Self {
        Self::new(move |artifact| {
            if artifact.contains(statement) {
                Ok(VerifierRun::completed(0, PROOF_CLOSED))
            } else {
                Ok(VerifierRun::completed(0, PROOF_OPEN))
            }
        })
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Artifact and context directory of every run
    pub fn seen(&self) -> Vec<(PathBuf, PathBuf)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerifierRunner for ScriptedVerifier {
    async fn run(
        &self,
        artifact: &Path,
        context_dir: &Path,
        _budget: Duration
    ) -> SynthResult<VerifierRun> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((artifact.to_path_buf(), context_dir.to_path_buf()));
        let content = fs::read_to_string(artifact)?;
        (self.judge)(&content)
    }

    fn name(&self) -> &str {
        "scripted-verifier"
    }
}

/// Skeleton and model written to a temporary project directory
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Counter.java"), COUNTER_JAVA).unwrap();
        fs::write(dir.path().join("Statement1.key"), STATEMENT_KEY).unwrap();
        fs::write(dir.path().join("model.yaml"), MODEL_YAML).unwrap();
        fs::create_dir_all(dir.path().join("work")).unwrap();
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn work_root(&self) -> PathBuf {
        self.path("work")
    }

    /// Entries left under the work root
    pub fn leftover_work_dirs(&self) -> usize {
        fs::read_dir(self.work_root()).unwrap().count()
    }

    pub fn config(&self, max_attempts: u32) -> SynthConfig {
        let mut config = SynthConfig::default();
        config.retry.max_attempts = max_attempts;
        config.retry.rate_limit_backoff_ms = 1;
        config.work_root = Some(self.work_root());
        config
    }

    pub fn java_request(&self, statement: &str) -> SessionRequest {
        SessionRequest {
            skeleton_path: self.path("Counter.java"),
            statement_id: statement.to_string(),
            model_path: self.path("model.yaml"),
            component_id: statement.to_string(),
            context_dir: None,
            slot: "0".to_string(),
            loop_update: false,
        }
    }

    pub fn key_request(&self) -> SessionRequest {
        SessionRequest {
            skeleton_path: self.path("Statement1.key"),
            statement_id: STATEMENT_KEY_ID.to_string(),
            model_path: self.path("model.yaml"),
            component_id: STATEMENT_KEY_ID.to_string(),
            context_dir: None,
            slot: "0".to_string(),
            loop_update: false,
        }
    }
}
