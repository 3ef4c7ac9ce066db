#[cfg(test)]
mod tests {
    use crate::config::InterpreterConfig;
    use crate::implementations::result_interpreter::ResultInterpreter;
    use crate::models::verification::{ OutcomeKind, VerificationOutcome, VerifierRun };

    fn interpreter() -> ResultInterpreter {
        ResultInterpreter::new(&InterpreterConfig::default())
    }

    #[test]
    fn test_classification_corpus() {
        let corpus = vec![
            (VerifierRun::completed(0, "Proof closed.\nOpen goals: 0"), OutcomeKind::Verified),
            (VerifierRun::completed(0, "All goals closed"), OutcomeKind::Verified),
            (VerifierRun::completed(0, "open goals: 0"), OutcomeKind::Verified),
            (VerifierRun::completed(0, "Proof open.\nOpen goals: 2"), OutcomeKind::Refuted),
            (VerifierRun::completed(1, "Counterexample found: x = -1"), OutcomeKind::Refuted),
            (VerifierRun::completed(0, "Proof closed.\nproof failed on branch 3"), OutcomeKind::Refuted),
            (VerifierRun::completed(1, "Proof closed."), OutcomeKind::ToolError),
            (VerifierRun::completed(0, ""), OutcomeKind::ToolError),
            (VerifierRun::completed(0, "Loading problem...\nDone."), OutcomeKind::ToolError),
            (VerifierRun::completed(137, "java.lang.OutOfMemoryError"), OutcomeKind::ToolError),
            (
                VerifierRun {
                    exit_status: None,
                    output: "Proof closed".to_string(),
                    timed_out: false,
                },
                OutcomeKind::ToolError,
            ),
            (VerifierRun::timed_out("Proof closed."), OutcomeKind::Timeout),
            (VerifierRun::timed_out(""), OutcomeKind::Timeout)
        ];

        let interpreter = interpreter();
        for (run, expected) in corpus {
            let outcome = interpreter.interpret(&run);
            assert_eq!(outcome.kind(), expected, "misclassified {:?}", run);
        }
    }

    #[test]
    fn test_refutation_keeps_marker_context() {
        let output =
            "Loading\nProof open.\nGoal 12: x >= 0\nwith x = -1\nunrelated 1\nunrelated 2\n";
        let outcome = interpreter().interpret(&VerifierRun::completed(0, output));

        match outcome {
            VerificationOutcome::Refuted(diagnostic) => {
                assert_eq!(diagnostic, "Proof open.\nGoal 12: x >= 0\nwith x = -1");
            }
            other => panic!("expected Refuted, got {:?}", other),
        }
    }

    #[test]
    fn test_tool_error_reports_status_and_tail() {
        let output = "line 1\nline 2\n\nException in thread main\n";
        let outcome = interpreter().interpret(&VerifierRun::completed(3, output));

        let diagnostic = outcome.diagnostic().unwrap().to_string();
        assert!(diagnostic.starts_with("verifier exited with status 3"));
        assert!(diagnostic.ends_with("line 1\nline 2\nException in thread main"));
    }

    #[test]
    fn test_diagnostics_are_capped() {
        let config = InterpreterConfig {
            max_diagnostic_lines: 3,
            ..InterpreterConfig::default()
        };
        let output: String = (0..50).map(|i| format!("counterexample {}\n", i)).collect();
        let outcome = ResultInterpreter::new(&config).interpret(&VerifierRun::completed(0, output));

        assert_eq!(outcome.kind(), OutcomeKind::Refuted);
        assert_eq!(outcome.diagnostic().unwrap().lines().count(), 3);
    }

    #[test]
    fn test_custom_markers() {
        let config = InterpreterConfig {
            success_markers: vec!["QED".to_string()],
            failure_markers: vec!["REFUTED".to_string()],
            max_diagnostic_lines: 5,
        };
        let interpreter = ResultInterpreter::new(&config);

        assert!(interpreter.interpret(&VerifierRun::completed(0, "qed")).is_verified());
        assert_eq!(
            interpreter.interpret(&VerifierRun::completed(0, "Proof closed")).kind(),
            OutcomeKind::ToolError
        );
        assert_eq!(
            interpreter.interpret(&VerifierRun::completed(0, "refuted: x")).kind(),
            OutcomeKind::Refuted
        );
    }
}
