pub mod attempt;
pub mod candidate;
pub mod contract;
pub mod verification;

// Re-export common model types
pub use attempt::{Attempt, AttemptFailure, AttemptHistory, StageTimings};
pub use candidate::CandidateSnippet;
pub use contract::{Contract, Variable, VariableSet};
pub use verification::{OutcomeKind, VerificationOutcome, VerifierRun};
