use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::implementations::config::ConfigError;

/// Fatal error types for a synthesis run
///
/// Every variant ends the run regardless of how many attempts remain. Failures
/// that a new candidate could fix never show up here; they are recorded in the
/// attempt history instead.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Splice error: {0}")]
    SpliceError(String),

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Verifier reported the same tool error {count} times in a row: {diagnostic}")]
    RecurringToolError { count: u32, diagnostic: String },

    #[error("Error in external tool {tool}: {message}")]
    ExternalToolError { tool: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("System error: {0}")]
    SystemError(String),
}

impl From<std::io::Error> for SynthError {
    fn from(err: std::io::Error) -> Self {
        SynthError::SystemError(err.to_string())
    }
}

/// Result type specific to synthesis operations
pub type SynthResult<T> = Result<T, SynthError>;

/// Failures the synthesis oracle surfaces to the controller
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum OracleError {
    #[error("oracle rate limited the request: {0}")]
    RateLimited(String),

    #[error("oracle did not answer in time")]
    Timeout,

    #[error("oracle response contained no extractable code")]
    EmptyOrMalformed,

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

impl From<OracleError> for SynthError {
    fn from(err: OracleError) -> Self {
        SynthError::OracleUnavailable(err.to_string())
    }
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
}

impl RecoverableError for OracleError {
    fn is_recoverable(&self) -> bool {
        !matches!(self, OracleError::Unavailable(_))
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            OracleError::RateLimited(_) => Some("back off and resend the same prompt".to_string()),
            OracleError::Timeout => Some("resend the same prompt".to_string()),
            OracleError::EmptyOrMalformed => {
                Some("record a failed attempt and ask again with feedback".to_string())
            }
            OracleError::Unavailable(_) => None,
        }
    }
}

impl RecoverableError for SynthError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            SynthError::ParseError(_) => Some("fix the proof skeleton".to_string()),
            SynthError::ModelError(_) => Some("fix the model description".to_string()),
            SynthError::ConfigError(_) => Some("fix the configuration file".to_string()),
            _ => None,
        }
    }
}
