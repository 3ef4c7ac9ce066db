use std::fmt::Write;

use crate::models::attempt::AttemptHistory;
use crate::models::contract::{ Contract, VariableSet };

/// Default system prompt for the synthesis oracle
pub const SYSTEM_PROMPT: &str =
    r#"You synthesize small Java statement blocks for Correctness-by-Construction refinements checked with KeY.

Produce the smallest statement block that, started in any state satisfying the precondition, ends in a state satisfying the postcondition.

Rules:
- Assign only variables marked modifiable. Never write to any other variable, including elements of read-only arrays.
- Prefer straight-line, loop-free code unless the statement is a loop update.
- Use only the declared variables and their types. Do not introduce helper methods, classes or imports.
- Keep every array access within the bounds implied by the precondition.
- When a variant is given, make it strictly decrease.
- Output code only: a single ```java block, no explanations."#;

/// Composes oracle prompts from the contract, the variables and past failures
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    feedback_window: usize,
}

impl PromptBuilder {
    pub fn new(feedback_window: usize) -> Self {
        Self { feedback_window }
    }

    /// Build the prompt for the next attempt. Same inputs, same prompt.
    pub fn build(
        &self,
        contract: &Contract,
        variables: &VariableSet,
        history: &AttemptHistory
    ) -> String {
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "Synthesize the Java statements for `{}`.\n",
            contract.statement_id()
        );
        let _ = writeln!(prompt, "## Precondition\n{}\n", contract.precondition());
        let _ = writeln!(prompt, "## Postcondition\n{}\n", contract.postcondition());
        let _ = writeln!(prompt, "## Assignable\n{}\n", contract.assignable());

        prompt.push_str("## Variables\n");
        for var in variables.iter() {
            let access = if var.modifiable { "modifiable" } else { "read-only" };
            let _ = writeln!(prompt, "- `{}`: {} ({})", var.name, var.ty, access);
        }
        prompt.push('\n');

        let modifiable: Vec<&str> = variables
            .modifiable()
            .map(|v| v.name.as_str())
            .collect();
        if modifiable.is_empty() {
            prompt.push_str(
                "No variable is modifiable: the statements must not assign any variable.\n\n"
            );
        } else {
            let _ = writeln!(
                prompt,
                "Only these variables may be assigned: {}. Every other variable must keep its value.\n",
                modifiable.join(", ")
            );
        }

        if contract.is_loop_update() {
            prompt.push_str(
                "This statement is a loop update: preserve the loop invariant and strictly decrease the variant.\n\n"
            );
        }

        self.append_feedback(&mut prompt, history);

        prompt.push_str("Respond with the Java statements only, in a single ```java code block.\n");
        prompt
    }

    fn append_feedback(&self, prompt: &mut String, history: &AttemptHistory) {
        if history.is_empty() || self.feedback_window == 0 {
            return;
        }

        prompt.push_str("## Feedback from previous attempts\n");
        let recent = history.recent(self.feedback_window);
        let omitted = history.len() - recent.len();
        if omitted > 0 {
            let _ = writeln!(prompt, "({} earlier failed attempts not shown)", omitted);
        }

        for attempt in recent {
            let _ = writeln!(prompt, "\n### Attempt {}", attempt.index);
            if let Some(candidate) = &attempt.candidate {
                let _ = writeln!(prompt, "Candidate:\n```java\n{}\n```", candidate.text());
            }
            let _ = writeln!(prompt, "{}", attempt.failure.diagnostic());
        }

        prompt.push_str(
            "\nDo not repeat a rejected candidate. Fix the problems reported above.\n\n"
        );
    }
}
