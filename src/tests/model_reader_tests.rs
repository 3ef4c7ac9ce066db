#[cfg(test)]
mod tests {
    use crate::errors::SynthError;
    use crate::implementations::model_reader::ModelReader;
    use crate::tests::stubs::MODEL_YAML;

    fn model_error(content: &str, component: &str) -> String {
        match ModelReader::read(content, component) {
            Err(SynthError::ModelError(message)) => message,
            other => panic!("expected ModelError, got {:?}", other),
        }
    }

    #[test]
    fn test_reads_component_variables_in_order() {
        let variables = ModelReader::read(MODEL_YAML, "pushBase").unwrap();

        let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["data", "newTop"]);
        assert_eq!(variables.get("data").unwrap().ty, "int[]");
        assert!(variables.get("data").unwrap().modifiable);
        assert!(!variables.get("newTop").unwrap().modifiable);
    }

    #[test]
    fn test_component_without_modifiable_variables() {
        let variables = ModelReader::read(MODEL_YAML, "frozen").unwrap();
        assert_eq!(variables.len(), 1);
        assert_eq!(variables.modifiable().count(), 0);
    }

    #[test]
    fn test_accepts_json_documents() {
        let json =
            r#"{"components": [{"id": "c1", "variables": [{"name": "n", "type": "int"}], "modifiable": ["n"]}]}"#;
        let variables = ModelReader::read(json, "c1").unwrap();
        assert!(variables.get("n").unwrap().modifiable);
    }

    #[test]
    fn test_unknown_component() {
        let message = model_error(MODEL_YAML, "nope");
        assert!(message.contains("`nope` not found"));
    }

    #[test]
    fn test_modifiable_must_be_declared() {
        let content =
            "components:\n  - id: c\n    variables:\n      - { name: a, type: int }\n    modifiable: [a, b]\n";
        let message = model_error(content, "c");
        assert!(message.contains("`b`"));
    }

    #[test]
    fn test_duplicate_variable_names() {
        let content =
            "components:\n  - id: c\n    variables:\n      - { name: a, type: int }\n      - { name: a, type: long }\n";
        let message = model_error(content, "c");
        assert!(message.contains("declared twice"));
    }

    #[test]
    fn test_component_without_variables() {
        let content = "components:\n  - id: c\n    modifiable: []\n";
        let message = model_error(content, "c");
        assert!(message.contains("no variables"));
    }

    #[test]
    fn test_unparsable_model() {
        let message = model_error("components: [ {id: c, variables: oops", "c");
        assert!(message.contains("cannot parse"));
    }
}
