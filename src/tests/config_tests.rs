#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use crate::config::{ RetryPolicy, SynthConfig };
    use crate::errors::{ OracleError, RecoverableError, SynthError };
    use crate::implementations::config::{ ConfigError, OracleConfig };

    #[test]
    fn test_defaults() {
        let config = SynthConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.transient_retries, 2);
        assert_eq!(config.retry.feedback_window, 3);
        assert_eq!(config.retry.tool_error_escalation, Some(3));
        assert_eq!(config.verifier.args, vec!["--auto".to_string()]);
        assert_eq!(config.interpreter.max_diagnostic_lines, 20);
        assert_eq!(config.oracle.provider, "openai");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "retry:\n  max_attempts: 5\n  tool_error_escalation: null\noracle:\n  provider: anthropic\n  temperature: 0.0\nverifier:\n  key_jar: /opt/key/key.jar\n"
        ).unwrap();

        let config = SynthConfig::from_file(&path).unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.tool_error_escalation, None);
        assert_eq!(config.retry.transient_retries, 2);
        assert_eq!(config.oracle.provider, "anthropic");
        assert_eq!(config.oracle.max_tokens, 2048);
        assert_eq!(config.verifier.key_jar.to_str(), Some("/opt/key/key.jar"));
        assert_eq!(config.verifier.support_files, vec!["helper.key".to_string()]);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "retry:\n  max_attempts: 0\n").unwrap();

        assert!(matches!(SynthConfig::from_file(&path), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_zero_escalation_threshold_rejected() {
        let mut config = SynthConfig::default();
        config.retry.tool_error_escalation = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = SynthConfig::from_file(std::path::Path::new("/nonexistent/cbc-synth.yaml"));
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy { rate_limit_backoff_ms: 100, ..RetryPolicy::default() };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
        assert_eq!(policy.oracle_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn test_api_key_from_config_wins() {
        let config = OracleConfig {
            provider: "mistral".to_string(),
            api_key: Some("secret".to_string()),
            ..OracleConfig::default()
        };
        assert_eq!(
            config.get_api_key().unwrap(),
            ("mistral".to_string(), "secret".to_string())
        );
    }

    #[test]
    fn test_error_recoverability() {
        assert!(OracleError::RateLimited("HTTP 429".to_string()).is_recoverable());
        assert!(OracleError::Timeout.is_recoverable());
        assert!(OracleError::EmptyOrMalformed.is_recoverable());
        assert!(!OracleError::Unavailable("HTTP 401".to_string()).is_recoverable());
        assert!(OracleError::Unavailable("x".to_string()).recovery_strategy().is_none());

        let fatal: SynthError = OracleError::Unavailable("HTTP 401".to_string()).into();
        assert!(matches!(fatal, SynthError::OracleUnavailable(_)));
        assert!(!fatal.is_recoverable());
    }
}
