use log::debug;

use crate::config::InterpreterConfig;
use crate::models::verification::{ VerificationOutcome, VerifierRun };

/// Lines of context kept after each failure marker line
const CONTEXT_LINES: usize = 2;

/// Classifies verifier runs into outcomes
///
/// Total by construction: anything not positively recognized as a success
/// or a refutation becomes a `ToolError`.
#[derive(Debug, Clone)]
pub struct ResultInterpreter {
    success_markers: Vec<String>,
    failure_markers: Vec<String>,
    max_diagnostic_lines: usize,
}

impl ResultInterpreter {
    pub fn new(config: &InterpreterConfig) -> Self {
        Self {
            success_markers: config.success_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            failure_markers: config.failure_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            max_diagnostic_lines: config.max_diagnostic_lines.max(1),
        }
    }

    pub fn interpret(&self, run: &VerifierRun) -> VerificationOutcome {
        if run.timed_out {
            return VerificationOutcome::Timeout;
        }

        let lines: Vec<&str> = run.output.lines().collect();
        let failure_lines: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_failure_line(line))
            .map(|(i, _)| i)
            .collect();

        if !failure_lines.is_empty() {
            debug!("Verifier output has {} failure marker lines", failure_lines.len());
            return VerificationOutcome::Refuted(self.refutation_diagnostic(&lines, &failure_lines));
        }

        let has_success = lines.iter().any(|line| self.is_success_line(line));
        if has_success && run.exit_status == Some(0) {
            return VerificationOutcome::Verified;
        }

        VerificationOutcome::ToolError(self.tool_error_diagnostic(run, &lines, has_success))
    }

    fn is_failure_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        if is_zero_open_goals(&lower) {
            return false;
        }
        self.failure_markers.iter().any(|m| lower.contains(m.as_str()))
    }

    fn is_success_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.success_markers.iter().any(|m| lower.contains(m.as_str())) || is_zero_open_goals(&lower)
    }

    fn refutation_diagnostic(&self, lines: &[&str], failure_lines: &[usize]) -> String {
        let mut kept: Vec<usize> = Vec::new();
        for &i in failure_lines {
            for j in i..(i + 1 + CONTEXT_LINES).min(lines.len()) {
                if !kept.contains(&j) && !lines[j].trim().is_empty() {
                    kept.push(j);
                }
            }
        }
        kept.sort_unstable();
        kept.truncate(self.max_diagnostic_lines);
        kept.iter()
            .map(|&i| lines[i].trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn tool_error_diagnostic(&self, run: &VerifierRun, lines: &[&str], has_success: bool) -> String {
        let status = match run.exit_status {
            Some(code) => format!("verifier exited with status {}", code),
            None => "verifier was terminated by a signal".to_string(),
        };
        let reason = if has_success {
            "success marker present but exit status abnormal"
        } else {
            "no recognized success or failure marker"
        };

        let tail: Vec<&str> = lines
            .iter()
            .rev()
            .filter(|l| !l.trim().is_empty())
            .take(self.max_diagnostic_lines.saturating_sub(1))
            .map(|l| l.trim_end())
            .collect();

        let mut diagnostic = format!("{} ({})", status, reason);
        for line in tail.into_iter().rev() {
            diagnostic.push('\n');
            diagnostic.push_str(line);
        }
        diagnostic
    }
}

/// KeY prints the number of open goals even when the proof closed
fn is_zero_open_goals(lower: &str) -> bool {
    lower
        .find("open goals:")
        .map_or(false, |i| lower[i + "open goals:".len()..].trim_start().starts_with('0'))
}
