use std::fmt;

use serde::Serialize;

use crate::errors::OracleError;
use crate::models::candidate::CandidateSnippet;
use crate::models::verification::VerificationOutcome;

/// Why an attempt did not produce a verified candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "outcome", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// The oracle never yielded a usable candidate
    Oracle(OracleError),
    /// The verifier rejected the spliced candidate
    Verification(VerificationOutcome),
}

impl AttemptFailure {
    /// Text fed back to the oracle on the next attempt
    pub fn diagnostic(&self) -> String {
        match self {
            AttemptFailure::Oracle(OracleError::EmptyOrMalformed) =>
                "The previous response contained no code fragment.".to_string(),
            AttemptFailure::Oracle(err) => format!("The oracle request failed: {}", err),
            AttemptFailure::Verification(VerificationOutcome::Refuted(d)) =>
                format!("The verifier refuted the candidate:\n{}", d),
            AttemptFailure::Verification(VerificationOutcome::ToolError(d)) =>
                format!("The verifier could not process the candidate:\n{}", d),
            AttemptFailure::Verification(VerificationOutcome::Timeout) =>
                "The verifier timed out on the candidate; prefer simpler code.".to_string(),
            AttemptFailure::Verification(VerificationOutcome::Verified) =>
                "The candidate was verified.".to_string(),
        }
    }

    pub fn tool_error(&self) -> Option<&str> {
        match self {
            AttemptFailure::Verification(VerificationOutcome::ToolError(d)) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Oracle(err) => write!(f, "Oracle: {}", err),
            AttemptFailure::Verification(outcome) => write!(f, "{}", outcome),
        }
    }
}

/// Wall time spent in the two external calls of an attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTimings {
    pub oracle_ms: u64,
    pub verifier_ms: u64,
    /// Transient re-requests issued before the attempt settled
    pub re_requests: u32,
}

/// One failed attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub index: u32,
    pub candidate: Option<CandidateSnippet>,
    pub failure: AttemptFailure,
    pub timings: StageTimings,
}

/// Append-only log of failed attempts for a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttemptHistory {
    attempts: Vec<Attempt>,
}

impl AttemptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter()
    }

    pub fn last(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    /// The newest `n` attempts, oldest first
    pub fn recent(&self, n: usize) -> &[Attempt] {
        let start = self.attempts.len().saturating_sub(n);
        &self.attempts[start..]
    }

    /// Length of the run of identical tool errors at the end of the history
    pub fn trailing_tool_errors(&self) -> u32 {
        let Some(last) = self.attempts.last().and_then(|a| a.failure.tool_error()) else {
            return 0;
        };
        self.attempts
            .iter()
            .rev()
            .take_while(|a| a.failure.tool_error() == Some(last))
            .count() as u32
    }
}
