pub mod config;
pub mod contract_extractor;
pub mod evaluation;
pub mod key_verifier;
pub mod llm_oracle;
pub mod model_reader;
pub mod pipeline;
pub mod prompt_builder;
pub mod result_interpreter;
pub mod retry_controller;
pub mod scanner;
pub mod session;
pub mod skeleton;
pub mod splicer;

pub use contract_extractor::ContractExtractor;
pub use key_verifier::KeyVerifierRunner;
pub use llm_oracle::LlmSynthesisOracle;
pub use model_reader::ModelReader;
pub use pipeline::{ Pipeline, RunReport, RunStatus };
pub use prompt_builder::PromptBuilder;
pub use result_interpreter::ResultInterpreter;
pub use retry_controller::{ ControllerState, PipelineOutcome, RetryController };
pub use session::{ Session, SessionRequest };
pub use splicer::Splicer;
