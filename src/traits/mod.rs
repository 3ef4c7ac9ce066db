pub mod synthesis_oracle;
pub mod verifier_runner;

// Re-export traits
pub use synthesis_oracle::SynthesisOracle;
pub use verifier_runner::VerifierRunner;
