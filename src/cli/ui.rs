use colored::*;
use console::Term;
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use cbc_synth::models::attempt::AttemptHistory;
use cbc_synth::models::contract::{ Contract, VariableSet };
use cbc_synth::implementations::evaluation::EvaluationSummary;
use cbc_synth::implementations::pipeline::{ RunReport, RunStatus };

fn term_width() -> usize {
    (Term::stdout().size().1 as usize).max(40)
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Kinds of one-line status notices
#[derive(Debug, Clone, Copy)]
enum Notice {
    Error,
    Warning,
    Success,
    Info,
}

impl Notice {
    /// Label right-aligned to eight columns
    fn label(self) -> ColoredString {
        let (text, color) = match self {
            Notice::Error => ("error", Color::Red),
            Notice::Warning => ("warning", Color::Yellow),
            Notice::Success => ("verified", Color::Green),
            Notice::Info => ("info", Color::Blue),
        };
        format!("{:>8}", text).color(color).bold()
    }
}

/// Wrap `message` under a right-aligned label; errors and warnings go to stderr
fn notify(notice: Notice, message: &str) {
    let indent = " ".repeat(9);
    let options = textwrap::Options::new(term_width().saturating_sub(2)).subsequent_indent(&indent);
    let text = wrap(&format!("{} {}", notice.label(), message), options).join("\n");
    match notice {
        Notice::Error | Notice::Warning => eprintln!("{}", text),
        Notice::Success | Notice::Info => println!("{}", text),
    }
}

pub fn print_error(message: &str) {
    notify(Notice::Error, message);
}

pub fn print_warning(message: &str) {
    notify(Notice::Warning, message);
}

pub fn print_success(message: &str) {
    notify(Notice::Success, message);
}

pub fn print_info(message: &str) {
    notify(Notice::Info, message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Print an oracle prompt
///
/// `## ` lines become headings. Clause sections are printed verbatim since
/// wrapping would split formulas; prose is wrapped to the terminal.
pub fn print_prompt(prompt: &str) {
    const VERBATIM: [&str; 3] = ["Precondition", "Postcondition", "Assignable"];
    let width = term_width().saturating_sub(4);
    let mut verbatim = false;
    for line in prompt.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            verbatim = VERBATIM.contains(&heading.trim());
            println!("{}", heading.bold().cyan());
        } else if verbatim || line.starts_with("- ") || line.starts_with("```") {
            println!("{}", if verbatim { line.yellow() } else { line.normal() });
        } else {
            for wrapped_line in wrap(line, width) {
                println!("{}", wrapped_line);
            }
        }
    }
}

/// Progress over `total` evaluation runs; the message shows the running tally
pub fn evaluation_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:30.green/red} {pos}/{len} runs  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb.set_message(tally(&EvaluationSummary::default()));
    pb
}

/// `verified/exhausted/fatal` counts for the progress message
pub fn tally(summary: &EvaluationSummary) -> String {
    format!(
        "{} verified, {} exhausted, {} fatal",
        summary.verified.to_string().green(),
        summary.exhausted.to_string().yellow(),
        summary.fatal.to_string().red()
    )
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Show an extracted contract and its variables
pub fn display_contract(contract: &Contract, variables: &VariableSet) {
    print_header(&format!("Contract of {}", contract.statement_id()));
    print_result("Precondition", contract.precondition());
    print_result("Postcondition", contract.postcondition());
    print_result("Assignable", contract.assignable());
    if contract.is_loop_update() {
        print_result("Loop update", "yes");
    }

    println!("\n{}", "Variables".bold());
    for var in variables.iter() {
        let access = if var.modifiable {
            "modifiable".green()
        } else {
            "read-only".dimmed()
        };
        println!("  {} : {} ({})", var.name.cyan(), var.ty, access);
    }
}

/// Display Java code
pub fn display_code(code: &str) {
    println!("{}", "```java".dimmed());
    for line in code.lines() {
        println!("{}", line.cyan());
    }
    println!("{}", "```".dimmed());
}

/// Print every failed attempt with its wrapped diagnostic
pub fn print_history(history: &AttemptHistory) {
    let width = term_width();
    for attempt in history.iter() {
        println!(
            "{} {} ({} ms oracle, {} ms verifier)",
            format!("Attempt {}:", attempt.index).bold(),
            attempt.failure.to_string().red(),
            attempt.timings.oracle_ms,
            attempt.timings.verifier_ms
        );
        if let Some(candidate) = &attempt.candidate {
            display_code(candidate.text());
        }
        for wrapped_line in wrap(&attempt.failure.diagnostic(), width.saturating_sub(4)) {
            println!("  {}", wrapped_line.dimmed());
        }
    }
}

/// Print the final status of a run
pub fn print_report(report: &RunReport) {
    match report.status {
        RunStatus::Verified => {
            print_success(
                &format!("Verified candidate found on attempt {}", report.attempts)
            );
            if let Some(candidate) = &report.verified_candidate {
                display_code(candidate);
            }
        }
        RunStatus::Exhausted => {
            print_warning(
                &format!("No verified candidate after {} attempts", report.attempts)
            );
        }
    }
    if !report.history.is_empty() {
        print_header("Failed attempts");
        print_history(&report.history);
    }
    print_result("Duration", &format!("{} ms", report.duration_ms));
}

/// Print an evaluation summary
pub fn print_summary(summary: &EvaluationSummary) {
    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("{}", "EVALUATION SUMMARY".bold());
    println!("{}", rule);
    println!("Total runs:      {}", summary.total);
    println!(
        "Verified:        {} ({}%)",
        summary.verified.to_string().green(),
        summary.percent(summary.verified)
    );
    println!(
        "Exhausted:       {} ({}%)",
        summary.exhausted.to_string().yellow(),
        summary.percent(summary.exhausted)
    );
    println!(
        "Fatal:           {} ({}%)",
        summary.fatal.to_string().red(),
        summary.percent(summary.fatal)
    );
    println!("{}\n", rule);
}
