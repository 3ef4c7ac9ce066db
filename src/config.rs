use std::fs;
use std::path::{ Path, PathBuf };
use std::time::Duration;

use serde::{ Deserialize, Serialize };

use crate::implementations::config::{ ConfigError, OracleConfig };

/// Configuration for a synthesis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub oracle: OracleConfig,
    pub retry: RetryPolicy,
    pub verifier: VerifierConfig,
    pub interpreter: InterpreterConfig,
    /// Parent directory for working copies; the system temp dir when unset
    pub work_root: Option<PathBuf>,
}

impl SynthConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: SynthConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("retry.max_attempts must be at least 1".to_string()));
        }
        if self.retry.tool_error_escalation == Some(0) {
            return Err(
                ConfigError::InvalidValue(
                    "retry.tool_error_escalation must be at least 1 (or null to disable)".to_string()
                )
            );
        }
        if self.interpreter.success_markers.is_empty() {
            return Err(
                ConfigError::InvalidValue("interpreter.success_markers must not be empty".to_string())
            );
        }
        Ok(())
    }
}

/// Attempt budget and transient-failure handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Evaluated attempts before giving up
    pub max_attempts: u32,
    /// Re-requests of the same step on oracle rate limits/timeouts and verifier timeouts
    pub transient_retries: u32,
    /// First back-off after a rate limit, doubled on every re-request
    pub rate_limit_backoff_ms: u64,
    /// Most recent failed attempts quoted in the prompt
    pub feedback_window: usize,
    /// Consecutive identical tool errors that end the run; `None` never escalates
    pub tool_error_escalation: Option<u32>,
    pub oracle_timeout_secs: u64,
    pub verifier_timeout_secs: u64,
}

impl RetryPolicy {
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    pub fn verifier_timeout(&self) -> Duration {
        Duration::from_secs(self.verifier_timeout_secs)
    }

    pub fn backoff(&self, re_request: u32) -> Duration {
        Duration::from_millis(self.rate_limit_backoff_ms.saturating_mul(1u64 << re_request.min(16)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            transient_retries: 2,
            rate_limit_backoff_ms: 1000,
            feedback_window: 3,
            tool_error_escalation: Some(3),
            oracle_timeout_secs: 180,
            verifier_timeout_secs: 300,
        }
    }
}

/// How the KeY verifier is launched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Java executable; resolved from `$JAVA`, `$JAVA_HOME` or `PATH` when unset
    pub java: Option<PathBuf>,
    /// Path to the KeY executable jar
    pub key_jar: PathBuf,
    /// Arguments placed between the jar and the artifact path
    pub args: Vec<String>,
    /// Files copied from the project context next to the working copy
    pub support_files: Vec<String>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            java: None,
            key_jar: PathBuf::from("key-2.13.0-exe.jar"),
            args: vec!["--auto".to_string()],
            support_files: vec!["helper.key".to_string()],
        }
    }
}

/// Markers recognized in verifier output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub success_markers: Vec<String>,
    pub failure_markers: Vec<String>,
    /// Upper bound on diagnostic lines kept per outcome
    pub max_diagnostic_lines: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            success_markers: vec!["proof closed".to_string(), "all goals closed".to_string()],
            failure_markers: vec![
                "proof open".to_string(),
                "open goals:".to_string(),
                "counterexample".to_string(),
                "not proved".to_string(),
                "proof failed".to_string()
            ],
            max_diagnostic_lines: 20,
        }
    }
}
