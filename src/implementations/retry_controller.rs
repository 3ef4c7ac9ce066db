use std::sync::Arc;
use std::time::{ Duration, Instant };

use log::{ debug, info, warn };

use crate::config::{ InterpreterConfig, RetryPolicy };
use crate::errors::{ OracleError, RecoverableError, SynthError, SynthResult };
use crate::implementations::prompt_builder::PromptBuilder;
use crate::implementations::result_interpreter::ResultInterpreter;
use crate::implementations::session::Session;
use crate::implementations::splicer::Splicer;
use crate::models::attempt::{ Attempt, AttemptFailure, AttemptHistory, StageTimings };
use crate::models::candidate::CandidateSnippet;
use crate::models::verification::{ VerificationOutcome, VerifierRun };
use crate::traits::synthesis_oracle::SynthesisOracle;
use crate::traits::verifier_runner::VerifierRunner;

/// States of the attempt loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Prompting,
    AwaitingOracle,
    Splicing,
    Verifying,
    Evaluating,
    Retrying,
    Succeeded,
    Exhausted,
}

impl ControllerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Succeeded | ControllerState::Exhausted)
    }
}

/// Non-fatal end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Succeeded {
        candidate: CandidateSnippet,
        /// Full content of the verified artifact
        artifact: String,
        attempt: u32,
        /// Failed attempts before the verified one
        history: AttemptHistory,
    },
    Exhausted {
        history: AttemptHistory,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Succeeded { .. })
    }

    pub fn history(&self) -> &AttemptHistory {
        match self {
            PipelineOutcome::Succeeded { history, .. } => history,
            PipelineOutcome::Exhausted { history } => history,
        }
    }
}

/// Drives prompt, oracle, splice, verify and interpret until a terminal state
///
/// Each attempt splices into the skeleton content captured when the session
/// was opened, so a rejected candidate never leaks into the next attempt.
/// Oracle rate limits and timeouts, as well as verifier timeouts, are
/// re-requested up to `transient_retries` times before they count as a failed
/// attempt. Malformed inputs, splice mismatches and an unavailable oracle end
/// the run with an error.
pub struct RetryController {
    oracle: Arc<dyn SynthesisOracle>,
    verifier: Arc<dyn VerifierRunner>,
    policy: RetryPolicy,
    prompts: PromptBuilder,
    interpreter: ResultInterpreter,
}

impl RetryController {
    pub fn new(
        oracle: Arc<dyn SynthesisOracle>,
        verifier: Arc<dyn VerifierRunner>,
        policy: RetryPolicy,
        interpreter: &InterpreterConfig
    ) -> Self {
        let prompts = PromptBuilder::new(policy.feedback_window);
        Self {
            oracle,
            verifier,
            policy,
            prompts,
            interpreter: ResultInterpreter::new(interpreter),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn run(&self, session: &mut Session) -> SynthResult<PipelineOutcome> {
        let splicer = Splicer::new(session.format(), session.contract().statement_id());
        // Catch a region mismatch before spending an oracle call
        splicer.region(session.base_content())?;

        let mut state = ControllerState::Idle;
        let mut attempt_index = 0u32;
        let mut prompt = String::new();
        let mut candidate: Option<CandidateSnippet> = None;
        let mut artifact = String::new();
        let mut failure: Option<AttemptFailure> = None;
        let mut timings = StageTimings::default();

        info!(
            "Synthesizing `{}` with {} via {} (max {} attempts)",
            session.contract().statement_id(),
            self.oracle.name(),
            self.verifier.name(),
            self.policy.max_attempts
        );

        loop {
            let next = match state {
                ControllerState::Idle => ControllerState::Prompting,

                ControllerState::Prompting => {
                    attempt_index += 1;
                    candidate = None;
                    failure = None;
                    timings = StageTimings::default();
                    prompt = self.prompts.build(
                        session.contract(),
                        session.variables(),
                        session.history()
                    );
                    debug!("Attempt {} prompt is {} characters", attempt_index, prompt.len());
                    ControllerState::AwaitingOracle
                }

                ControllerState::AwaitingOracle => {
                    match self.request_candidate(&prompt, attempt_index, &mut timings).await? {
                        Ok(snippet) => {
                            candidate = Some(snippet);
                            ControllerState::Splicing
                        }
                        Err(err) => {
                            failure = Some(AttemptFailure::Oracle(err));
                            ControllerState::Evaluating
                        }
                    }
                }

                ControllerState::Splicing => {
                    let snippet = candidate
                        .as_ref()
                        .ok_or_else(|| {
                            SynthError::SystemError("no candidate to splice".to_string())
                        })?;
                    artifact = splicer.splice(session.base_content(), snippet)?;
                    session.write_working_copy(&artifact)?;
                    ControllerState::Verifying
                }

                ControllerState::Verifying => {
                    let outcome = self.verify(session, &mut timings).await?;
                    if !outcome.is_verified() {
                        failure = Some(AttemptFailure::Verification(outcome));
                    }
                    ControllerState::Evaluating
                }

                ControllerState::Evaluating => {
                    match failure.take() {
                        None => {
                            info!("Attempt {} verified", attempt_index);
                            ControllerState::Succeeded
                        }
                        Some(failure) => {
                            info!("Attempt {} failed: {}", attempt_index, failure);
                            session.history_mut().push(Attempt {
                                index: attempt_index,
                                candidate: candidate.take(),
                                failure,
                                timings,
                            });
                            self.check_recurring_tool_error(session.history())?;

                            if attempt_index < self.policy.max_attempts {
                                ControllerState::Retrying
                            } else {
                                ControllerState::Exhausted
                            }
                        }
                    }
                }

                ControllerState::Retrying => ControllerState::Prompting,

                ControllerState::Succeeded => {
                    let candidate = candidate.take().ok_or_else(|| {
                        SynthError::SystemError("verified attempt without a candidate".to_string())
                    })?;
                    return Ok(PipelineOutcome::Succeeded {
                        candidate,
                        artifact: std::mem::take(&mut artifact),
                        attempt: attempt_index,
                        history: session.history().clone(),
                    });
                }

                ControllerState::Exhausted => {
                    warn!("No verified candidate after {} attempts", attempt_index);
                    return Ok(PipelineOutcome::Exhausted {
                        history: session.history().clone(),
                    });
                }
            };

            debug!("{:?} -> {:?}", state, next);
            state = next;
        }
    }

    /// Ask the oracle for a candidate, re-requesting transient failures
    ///
    /// The outer `Err` is fatal; the inner one is a failed attempt.
    async fn request_candidate(
        &self,
        prompt: &str,
        attempt_index: u32,
        timings: &mut StageTimings
    ) -> SynthResult<Result<CandidateSnippet, OracleError>> {
        let mut re_requests = 0u32;
        loop {
            let start = Instant::now();
            let response = match
                tokio::time::timeout(self.policy.oracle_timeout(), self.oracle.complete(prompt)).await
            {
                Ok(response) => response,
                Err(_) => Err(OracleError::Timeout),
            };
            timings.oracle_ms += start.elapsed().as_millis() as u64;

            let err = match
                response.and_then(|raw| CandidateSnippet::from_response(&raw, attempt_index))
            {
                Ok(snippet) => {
                    debug!("Candidate for attempt {}:\n{}", attempt_index, snippet.text());
                    return Ok(Ok(snippet));
                }
                Err(err) => err,
            };

            if !err.is_recoverable() {
                return Err(err.into());
            }

            let delay = match &err {
                OracleError::RateLimited(_) => self.policy.backoff(re_requests),
                OracleError::Timeout => Duration::ZERO,
                _ => {
                    return Ok(Err(err));
                }
            };
            if re_requests >= self.policy.transient_retries {
                return Ok(Err(err));
            }

            re_requests += 1;
            timings.re_requests += 1;
            warn!(
                "{} ({}), re-request {}/{} in {} ms",
                err,
                err.recovery_strategy().unwrap_or_default(),
                re_requests,
                self.policy.transient_retries,
                delay.as_millis()
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Run the verifier on the working copy, re-running on timeouts
    async fn verify(
        &self,
        session: &Session,
        timings: &mut StageTimings
    ) -> SynthResult<VerificationOutcome> {
        let budget = self.policy.verifier_timeout();
        let mut re_requests = 0u32;
        loop {
            let start = Instant::now();
            let run = match
                tokio::time::timeout(
                    budget,
                    self.verifier.run(session.working_copy(), session.context_dir(), budget)
                ).await
            {
                Ok(run) => run?,
                Err(_) => VerifierRun::timed_out(String::new()),
            };
            timings.verifier_ms += start.elapsed().as_millis() as u64;

            let outcome = self.interpreter.interpret(&run);
            debug!("Verifier outcome: {:?}", outcome.kind());
            if outcome != VerificationOutcome::Timeout || re_requests >= self.policy.transient_retries {
                return Ok(outcome);
            }

            re_requests += 1;
            timings.re_requests += 1;
            warn!(
                "Verifier timed out after {}s, re-run {}/{}",
                budget.as_secs(),
                re_requests,
                self.policy.transient_retries
            );
        }
    }

    fn check_recurring_tool_error(&self, history: &AttemptHistory) -> SynthResult<()> {
        let Some(threshold) = self.policy.tool_error_escalation else {
            return Ok(());
        };
        let count = history.trailing_tool_errors();
        if count < threshold {
            return Ok(());
        }
        let diagnostic = history
            .last()
            .and_then(|a| a.failure.tool_error())
            .unwrap_or_default()
            .to_string();
        Err(SynthError::RecurringToolError { count, diagnostic })
    }
}
