#[cfg(test)]
mod tests {
    use crate::errors::SynthError;
    use crate::implementations::skeleton::SkeletonFormat;
    use crate::implementations::splicer::Splicer;
    use crate::models::candidate::CandidateSnippet;
    use crate::tests::stubs::{ COUNTER_JAVA, STATEMENT_KEY, STATEMENT_KEY_ID };

    fn candidate(text: &str) -> CandidateSnippet {
        CandidateSnippet::new(text, 1)
    }

    #[test]
    fn test_splice_replaces_only_the_region() {
        let splicer = Splicer::new(SkeletonFormat::Jml, "increment");
        let region = splicer.region(COUNTER_JAVA).unwrap();
        let code = "\n\t\tx = x + 1;\n\t";

        let spliced = splicer.splice(COUNTER_JAVA, &candidate(code)).unwrap();

        assert_eq!(splicer.read_region(&spliced).unwrap(), code);
        assert_eq!(&spliced[..region.start], &COUNTER_JAVA[..region.start]);
        assert_eq!(
            &spliced[region.start + code.len()..],
            &COUNTER_JAVA[region.end..]
        );
    }

    #[test]
    fn test_splice_is_idempotent() {
        let splicer = Splicer::new(SkeletonFormat::Jml, "pushBase");
        let code = candidate("data = new int[] { newTop };");

        let first = splicer.splice(COUNTER_JAVA, &code).unwrap();
        let second = splicer.splice(COUNTER_JAVA, &code).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_other_methods_untouched() {
        let splicer = Splicer::new(SkeletonFormat::Jml, "pushBase");
        let spliced = splicer.splice(COUNTER_JAVA, &candidate("data = null;")).unwrap();

        let increment = Splicer::new(SkeletonFormat::Jml, "increment");
        assert_eq!(
            increment.read_region(&spliced).unwrap(),
            increment.read_region(COUNTER_JAVA).unwrap()
        );
        // The contract block is still readable after splicing
        assert!(spliced.contains("@ assignable data[*];"));
    }

    #[test]
    fn test_splice_into_key_problem() {
        let splicer = Splicer::new(SkeletonFormat::KeyProblem, STATEMENT_KEY_ID);
        let spliced = splicer.splice(STATEMENT_KEY, &candidate("x = x + 1;")).unwrap();

        assert!(spliced.contains("\\<{x = x + 1;}\\>"));
        assert!(spliced.starts_with("\\javaSource \"src\";"));
        assert!(spliced.ends_with("(x = _oldx + 1 & y = _oldy)\n}\n"));
    }

    #[test]
    fn test_missing_region_is_splice_error() {
        let splicer = Splicer::new(SkeletonFormat::Jml, "absent");
        match splicer.splice(COUNTER_JAVA, &candidate("x = 1;")) {
            Err(SynthError::SpliceError(message)) => assert!(message.contains("absent")),
            other => panic!("expected SpliceError, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_line_comment_keeps_method_closed() {
        let splicer = Splicer::new(SkeletonFormat::Jml, "increment");
        let region = splicer.region(COUNTER_JAVA).unwrap();
        let code = CandidateSnippet::from_response("```java\nx = x + 1; // increment x\n```", 1).unwrap();
        assert_eq!(code.text(), "x = x + 1; // increment x");

        let spliced = splicer.splice(COUNTER_JAVA, &code).unwrap();

        assert_eq!(splicer.read_region(&spliced).unwrap(), "x = x + 1; // increment x\n");
        assert_eq!(
            &spliced[region.start + code.text().len() + 1..],
            &COUNTER_JAVA[region.end..]
        );
        // Later methods are still found after the commented candidate
        let push_base = Splicer::new(SkeletonFormat::Jml, "pushBase");
        assert_eq!(
            push_base.read_region(&spliced).unwrap(),
            push_base.read_region(COUNTER_JAVA).unwrap()
        );
    }

    #[test]
    fn test_trailing_line_comment_keeps_modality_closed() {
        let splicer = Splicer::new(SkeletonFormat::KeyProblem, STATEMENT_KEY_ID);
        let spliced = splicer.splice(STATEMENT_KEY, &candidate("x = x + 1; // bump")).unwrap();

        assert_eq!(splicer.read_region(&spliced).unwrap(), "x = x + 1; // bump\n");
        assert!(spliced.contains("\\<{x = x + 1; // bump\n}\\>"));
        assert!(spliced.ends_with("(x = _oldx + 1 & y = _oldy)\n}\n"));
    }

    #[test]
    fn test_closed_candidates_are_spliced_verbatim() {
        let splicer = Splicer::new(SkeletonFormat::KeyProblem, STATEMENT_KEY_ID);
        for code in [
            "x = x + 1;",
            "s = \"http://host\";",
            "x = x + 1; /* bump */",
            "// bump\nx = x + 1;",
            "x = x + 1; // bump\n",
        ] {
            let spliced = splicer.splice(STATEMENT_KEY, &candidate(code)).unwrap();
            assert_eq!(splicer.read_region(&spliced).unwrap(), code);
        }
    }
}
