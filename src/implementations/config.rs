use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Known providers and the environment variables holding their keys
const PROVIDER_KEYS: [(&str, &str); 5] = [
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("azure", "AZURE_OPENAI_API_KEY"),
    ("mistral", "MISTRAL_API_KEY"),
    ("together", "TOGETHER_API_KEY"),
];

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OracleConfig {
    /// Preferred provider (openai, anthropic, azure, mistral, together)
    pub provider: String,

    /// API key for the LLM service; falls back to the provider's environment variable
    pub api_key: Option<String>,

    /// API endpoint for the LLM service
    pub api_endpoint: Option<String>,

    /// API model to use
    pub model: Option<String>,

    /// Maximum tokens for API calls
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0)
    pub temperature: f32,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// System prompt sent with every request; the built-in rules when unset
    pub system_prompt: Option<String>,

    /// Additional API parameters merged into the request body
    pub parameters: HashMap<String, String>,
}

impl OracleConfig {
    /// Get the API key, checking environment variables if not in config
    /// If the preferred provider key is not found, it will try other providers
    pub fn get_api_key(&self) -> Result<(String, String), ConfigError> {
        use log::{ debug, info };

        if let Some(api_key) = &self.api_key {
            debug!("Using API key from config");
            return Ok((self.provider.clone(), api_key.clone()));
        }

        let preferred = self.provider.to_lowercase();
        if let Some((_, env_var)) = PROVIDER_KEYS.iter().find(|(p, _)| *p == preferred) {
            match std::env::var(env_var) {
                Ok(key) => {
                    info!("Using preferred provider: {}", preferred);
                    return Ok((preferred, key));
                }
                Err(_) => {
                    debug!("Preferred provider {} not available, trying others", preferred);
                }
            }
        } else {
            debug!("Unknown provider: {}, will try known providers", preferred);
        }

        for (provider, env_var) in PROVIDER_KEYS {
            if provider == preferred {
                continue;
            }
            if let Ok(key) = std::env::var(env_var) {
                info!("Using alternative provider: {} (preferred was {})", provider, preferred);
                return Ok((provider.to_string(), key));
            }
            debug!("Provider {} not available", provider);
        }

        Err(ConfigError::MissingApiKey("No API keys found for any provider".to_string()))
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            provider: "openai".to_string(),
            api_key: None,
            api_endpoint: None,
            model: None,
            max_tokens: 2048,
            temperature: 0.2,
            request_timeout_secs: 120,
            system_prompt: None,
            parameters: HashMap::new(),
        }
    }
}
