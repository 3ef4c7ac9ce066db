pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ InterpreterConfig, RetryPolicy, SynthConfig, VerifierConfig };
pub use errors::{ OracleError, RecoverableError, SynthError, SynthResult };
pub use implementations::config::{ ConfigError, OracleConfig };
pub use implementations::{
    ContractExtractor,
    ControllerState,
    KeyVerifierRunner,
    LlmSynthesisOracle,
    ModelReader,
    Pipeline,
    PipelineOutcome,
    PromptBuilder,
    ResultInterpreter,
    RetryController,
    RunReport,
    RunStatus,
    Session,
    SessionRequest,
    Splicer,
};
pub use models::{
    attempt::{ Attempt, AttemptFailure, AttemptHistory, StageTimings },
    candidate::CandidateSnippet,
    contract::{ Contract, Variable, VariableSet },
    verification::{ OutcomeKind, VerificationOutcome, VerifierRun },
};
pub use traits::{ SynthesisOracle, VerifierRunner };
