use std::fmt;

use serde::Serialize;

/// Classified result of one verifier run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "diagnostic", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified, // All proof obligations closed
    Refuted(String), // Verifier found the candidate wrong
    ToolError(String), // Verifier misbehaved or printed nothing we recognize
    Timeout, // Verifier exceeded its time budget
}

/// Discriminant of a `VerificationOutcome`, handy for tallies and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Verified,
    Refuted,
    ToolError,
    Timeout,
}

impl VerificationOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            VerificationOutcome::Verified => OutcomeKind::Verified,
            VerificationOutcome::Refuted(_) => OutcomeKind::Refuted,
            VerificationOutcome::ToolError(_) => OutcomeKind::ToolError,
            VerificationOutcome::Timeout => OutcomeKind::Timeout,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            VerificationOutcome::Refuted(d) | VerificationOutcome::ToolError(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationOutcome::Verified => write!(f, "Verified"),
            VerificationOutcome::Refuted(diagnostic) => write!(f, "Refuted: {}", diagnostic),
            VerificationOutcome::ToolError(diagnostic) => write!(f, "Tool error: {}", diagnostic),
            VerificationOutcome::Timeout => write!(f, "Timeout"),
        }
    }
}

/// Raw result of invoking the verifier once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierRun {
    /// Process exit code; `None` when the process was killed or timed out
    pub exit_status: Option<i32>,
    /// Interleaved stdout and stderr
    pub output: String,
    pub timed_out: bool,
}

impl VerifierRun {
    pub fn completed(exit_status: i32, output: impl Into<String>) -> Self {
        Self {
            exit_status: Some(exit_status),
            output: output.into(),
            timed_out: false,
        }
    }

    pub fn timed_out(output: impl Into<String>) -> Self {
        Self {
            exit_status: None,
            output: output.into(),
            timed_out: true,
        }
    }
}
