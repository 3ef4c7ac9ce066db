#[cfg(test)]
mod tests {
    use crate::errors::SynthError;
    use crate::implementations::contract_extractor::ContractExtractor;
    use crate::implementations::skeleton::{ self, SkeletonFormat };
    use crate::tests::stubs::{ COUNTER_JAVA, STATEMENT_KEY, STATEMENT_KEY_ID };

    fn jml() -> ContractExtractor {
        ContractExtractor::new(SkeletonFormat::Jml)
    }

    fn assert_parse_error(result: Result<impl std::fmt::Debug, SynthError>, needle: &str) {
        match result {
            Err(SynthError::ParseError(message)) => {
                assert!(message.contains(needle), "unexpected message: {}", message);
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_extracts_simple_jml_contract() {
        let contract = jml().extract(COUNTER_JAVA, "increment").unwrap();

        assert_eq!(contract.statement_id(), "increment");
        assert_eq!(contract.precondition(), "x >= 0 & y == x");
        assert_eq!(contract.postcondition(), "x == \\old(x) + 1 & y == \\old(y)");
        assert_eq!(contract.assignable(), "x");
        assert!(!contract.is_loop_update());
    }

    #[test]
    fn test_keeps_quantified_clauses_byte_exact() {
        let contract = jml().extract(COUNTER_JAVA, "pushBase").unwrap();

        assert_eq!(
            contract.precondition(),
            "true & \\old(data) == data & data != null & data.length >= 0"
        );
        assert_eq!(
            contract.postcondition(),
            "(\\exists int z;(0 <= z && z < data.length&& data[z] == newTop))&& (\\forall int k; (0 <= k && k < \\old(data).length==> (\\exists int z; (0 <= z && z < data.length&& data[z] == \\old(data)[k])))) && data[data.length - 1] == newTop"
        );
        assert_eq!(contract.assignable(), "data[*]");
    }

    #[test]
    fn test_declaration_with_throws_clause() {
        let contract = jml().extract(COUNTER_JAVA, "pushCons").unwrap();
        assert_eq!(contract.assignable(), "\\nothing");
    }

    #[test]
    fn test_call_site_is_not_a_declaration() {
        let source =
            r#"
class A {
	void caller() {
		target(1);
	}

	/*@ requires a > 0;
	  @ ensures b == a;
	  @ assignable b;
	  @*/
	void target(int a) {
		;
	}
}
"#;
        let contract = jml().extract(source, "target").unwrap();
        assert_eq!(contract.precondition(), "a > 0");
        assert_eq!(contract.postcondition(), "b == a");
    }

    #[test]
    fn test_unknown_statement_is_parse_error() {
        assert_parse_error(jml().extract(COUNTER_JAVA, "decrement"), "not found");
    }

    #[test]
    fn test_missing_clause_is_parse_error() {
        let source =
            "/*@ requires x > 0;\n  @ assignable x;\n  @*/\nvoid f() {\n}\n";
        assert_parse_error(jml().extract(source, "f"), "missing `ensures`");
    }

    #[test]
    fn test_duplicate_clause_is_parse_error() {
        let source =
            "/*@ requires x > 0;\n  @ requires x < 9;\n  @ ensures x == 1;\n  @ assignable x;\n  @*/\nvoid f() {\n}\n";
        assert_parse_error(jml().extract(source, "f"), "twice");
    }

    #[test]
    fn test_unbalanced_clause_is_parse_error() {
        let source =
            "/*@ requires (x > 0;\n  @ ensures x == 1;\n  @ assignable x;\n  @*/\nvoid f() {\n}\n";
        assert_parse_error(jml().extract(source, "f"), "requires");
    }

    #[test]
    fn test_unterminated_clause_is_parse_error() {
        let source = "/*@ requires x > 0;\n  @ ensures x == 1;\n  @ assignable x\n  @*/\nvoid f() {\n}\n";
        assert_parse_error(jml().extract(source, "f"), "assignable");
    }

    #[test]
    fn test_method_without_spec_block_is_parse_error() {
        let source = "/*@ requires true; ensures true; assignable x; @*/\nvoid g() {}\nvoid f() {\n}\n";
        assert_parse_error(jml().extract(source, "f"), "no JML specification block");
    }

    #[test]
    fn test_extracts_key_problem_contract() {
        let contract = ContractExtractor::new(SkeletonFormat::KeyProblem)
            .extract(STATEMENT_KEY, STATEMENT_KEY_ID)
            .unwrap();

        assert_eq!(contract.precondition(), "(x >= 0 & y = x)");
        assert_eq!(contract.postcondition(), "(x = _oldx + 1 & y = _oldy)");
        assert_eq!(contract.assignable(), "x");
        assert!(contract.is_loop_update());
    }

    #[test]
    fn test_explicit_pre_post_blocks_take_precedence() {
        let content = STATEMENT_KEY.replace(
            "\\problem",
            "\\pre{ x >= 0 }\n\\POST { x = _oldx + 1 & {y} = y }\n\\problem"
        );
        let contract = ContractExtractor::new(SkeletonFormat::KeyProblem)
            .extract(&content, STATEMENT_KEY_ID)
            .unwrap();

        assert_eq!(contract.precondition(), "x >= 0");
        assert_eq!(contract.postcondition(), "x = _oldx + 1 & {y} = y");
        assert_eq!(contract.assignable(), "x");
    }

    #[test]
    fn test_single_or_commented_block_falls_back_to_problem() {
        let extractor = ContractExtractor::new(SkeletonFormat::KeyProblem);

        let only_pre = STATEMENT_KEY.replace("\\problem", "\\pre{ x >= 0 }\n\\problem");
        let contract = extractor.extract(&only_pre, STATEMENT_KEY_ID).unwrap();
        assert_eq!(contract.precondition(), "(x >= 0 & y = x)");

        let commented = STATEMENT_KEY.replace(
            "\\problem",
            "// \\pre{ false }\n// \\post{ false }\n\\problem"
        );
        let contract = extractor.extract(&commented, STATEMENT_KEY_ID).unwrap();
        assert_eq!(contract.precondition(), "(x >= 0 & y = x)");
        assert_eq!(contract.postcondition(), "(x = _oldx + 1 & y = _oldy)");
    }

    #[test]
    fn test_unclosed_pre_block_is_parse_error() {
        let content = STATEMENT_KEY.replace("\\problem", "\\pre{ x >= 0\n\\problem");
        assert!(
            matches!(
                ContractExtractor::new(SkeletonFormat::KeyProblem).extract(&content, STATEMENT_KEY_ID),
                Err(SynthError::ParseError(_))
            )
        );
    }

    #[test]
    fn test_key_problem_bound_to_other_statement() {
        let result = ContractExtractor::new(SkeletonFormat::KeyProblem).extract(
            STATEMENT_KEY,
            "another-id"
        );
        assert_parse_error(result, "not found");
    }

    #[test]
    fn test_key_problem_without_mutable_marker() {
        let content = STATEMENT_KEY.replace("//mutable:{x}\n", "");
        let result = ContractExtractor::new(SkeletonFormat::KeyProblem).extract(
            &content,
            STATEMENT_KEY_ID
        );
        assert_parse_error(result, "mutable");
    }

    #[test]
    fn test_markers_are_read_from_comments() {
        assert_eq!(skeleton::marker(STATEMENT_KEY, "statementid").as_deref(), Some(STATEMENT_KEY_ID));
        assert_eq!(skeleton::marker(STATEMENT_KEY, "mutable").as_deref(), Some("x"));
        assert_eq!(skeleton::marker(STATEMENT_KEY, "missing"), None);
    }

    #[test]
    fn test_format_follows_extension() {
        use std::path::Path;
        assert_eq!(SkeletonFormat::from_path(Path::new("a/Statement3.key")), SkeletonFormat::KeyProblem);
        assert_eq!(SkeletonFormat::from_path(Path::new("Helper.java")), SkeletonFormat::Jml);
    }
}
