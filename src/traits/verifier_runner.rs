use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::SynthResult;
use crate::models::verification::VerifierRun;

/// Batch invocation of the formal verifier over a spliced artifact
#[async_trait]
pub trait VerifierRunner: Send + Sync {
    /// Run the verifier on `artifact` from `context_dir`, giving up after `budget`.
    ///
    /// Expiry is reported as a `VerifierRun` with `timed_out` set. An `Err`
    /// means the verifier could not be started at all.
    async fn run(
        &self,
        artifact: &Path,
        context_dir: &Path,
        budget: Duration,
    ) -> SynthResult<VerifierRun>;

    /// Short name used in logs and reports
    fn name(&self) -> &str;
}
