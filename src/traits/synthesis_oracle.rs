use async_trait::async_trait;

use crate::errors::OracleError;

/// Capability that turns a prompt into candidate code text
///
/// Implementations return the raw response; extracting the code fragment is
/// the caller's job. Swapping providers never touches the retry loop.
#[async_trait]
pub trait SynthesisOracle: Send + Sync {
    /// Send one prompt and return the raw response text
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;

    /// Short name used in logs and reports
    fn name(&self) -> &str;
}
