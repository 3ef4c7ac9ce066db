use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };

use crate::errors::{ OracleError, SynthError, SynthResult };
use crate::implementations::config::OracleConfig;
use crate::implementations::prompt_builder::SYSTEM_PROMPT;
use crate::traits::synthesis_oracle::SynthesisOracle;

/// OpenAI-compatible request and response types
#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Wire format spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiFormat {
    Anthropic,
    OpenAiCompatible,
}

/// Synthesis oracle backed by a hosted LLM
///
/// The API key is resolved once at construction, either from the config or
/// from the provider environment variables (`OPENAI_API_KEY`,
/// `ANTHROPIC_API_KEY`, `AZURE_OPENAI_API_KEY`, `MISTRAL_API_KEY`,
/// `TOGETHER_API_KEY`).
#[derive(Clone)]
pub struct LlmSynthesisOracle {
    http_client: reqwest::Client,
    provider: String,
    api_key: String,
    api_endpoint: String,
    model: String,
    format: ApiFormat,
    config: OracleConfig,
}

impl LlmSynthesisOracle {
    pub fn new(config: OracleConfig) -> SynthResult<Self> {
        let (provider, api_key) = config.get_api_key()?;

        let http_client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SynthError::SystemError(format!("Failed to create HTTP client: {}", e)))?;

        // Adjust endpoint and model based on the provider
        let (default_endpoint, default_model, format) = match provider.as_str() {
            "anthropic" =>
                ("https://api.anthropic.com/v1/messages", "claude-3-5-sonnet-latest", ApiFormat::Anthropic),
            "mistral" =>
                ("https://api.mistral.ai/v1/chat/completions", "mistral-large-latest", ApiFormat::OpenAiCompatible),
            "together" =>
                (
                    "https://api.together.xyz/v1/chat/completions",
                    "meta-llama/Llama-3-70b-chat-hf",
                    ApiFormat::OpenAiCompatible,
                ),
            "azure" => {
                if config.api_endpoint.is_none() {
                    return Err(
                        SynthError::OracleUnavailable(
                            "Azure OpenAI endpoint must be configured".to_string()
                        )
                    );
                }
                ("", "gpt-4o", ApiFormat::OpenAiCompatible)
            }
            _ => ("https://api.openai.com/v1/chat/completions", "gpt-4o", ApiFormat::OpenAiCompatible),
        };

        let api_endpoint = config.api_endpoint.clone().unwrap_or_else(|| default_endpoint.to_string());
        let model = config.model.clone().unwrap_or_else(|| default_model.to_string());
        info!("Using {} provider with model {}", provider, model);
        debug!("API endpoint: {}", api_endpoint);

        Ok(Self {
            http_client,
            provider,
            api_key,
            api_endpoint,
            model,
            format,
            config,
        })
    }

    fn system_prompt(&self) -> &str {
        self.config.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT)
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = match self.format {
            ApiFormat::Anthropic =>
                serde_json::json!({
                    "model": self.model,
                    "max_tokens": self.config.max_tokens,
                    "temperature": self.config.temperature,
                    "system": self.system_prompt(),
                    "messages": [{ "role": "user", "content": prompt }]
                }),
            ApiFormat::OpenAiCompatible =>
                serde_json::json!({
                    "model": self.model,
                    "max_tokens": self.config.max_tokens,
                    "temperature": self.config.temperature,
                    "messages": [
                        { "role": "system", "content": self.system_prompt() },
                        { "role": "user", "content": prompt }
                    ]
                }),
        };

        if let Some(object) = body.as_object_mut() {
            for (key, value) in &self.config.parameters {
                object.insert(key.clone(), serde_json::Value::String(value.clone()));
            }
        }
        body
    }

    fn extract_content(&self, response_text: &str) -> Result<String, OracleError> {
        let response_json: serde_json::Value = serde_json::from_str(response_text).map_err(|e| {
            warn!("Failed to parse response as JSON: {}", e);
            OracleError::EmptyOrMalformed
        })?;

        let content = match self.format {
            ApiFormat::Anthropic =>
                response_json["content"]
                    .as_array()
                    .and_then(|items| items.iter().find_map(|item| item["text"].as_str()))
                    .map(|s| s.to_string()),
            ApiFormat::OpenAiCompatible =>
                serde_json
                    ::from_value::<ChatResponse>(response_json)
                    .ok()
                    .and_then(|r| r.choices.into_iter().next())
                    .map(|choice| choice.message.content),
        };

        match content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                warn!("No content in {} response", self.provider);
                Err(OracleError::EmptyOrMalformed)
            }
        }
    }
}

#[async_trait]
impl SynthesisOracle for LlmSynthesisOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        info!("Making LLM API request to {}", self.provider);
        debug!("Prompt length: {} characters", prompt.len());

        let request = self.http_client
            .post(&self.api_endpoint)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));

        let request = match self.format {
            ApiFormat::Anthropic =>
                request.header("x-api-key", &self.api_key).header("anthropic-version", "2023-06-01"),
            ApiFormat::OpenAiCompatible =>
                request.header("Authorization", format!("Bearer {}", self.api_key)),
        };

        let response = request.send().await.map_err(|e| {
            warn!("Network error when calling {} API: {}", self.provider, e);
            if e.is_timeout() {
                OracleError::Timeout
            } else if e.is_connect() {
                OracleError::RateLimited(format!("connection failed: {}", e))
            } else {
                OracleError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());
            warn!("API error: HTTP {} - {}", status, error_text);
            return Err(classify_status(status, &error_text));
        }

        let response_text = response.text().await.map_err(|e| {
            warn!("Failed to get response text: {}", e);
            if e.is_timeout() { OracleError::Timeout } else { OracleError::EmptyOrMalformed }
        })?;
        debug!("Response length: {} characters", response_text.len());

        self.extract_content(&response_text)
    }

    fn name(&self) -> &str {
        &self.provider
    }
}

/// Map a non-success HTTP status onto the oracle failure taxonomy
pub fn classify_status(status: u16, body: &str) -> OracleError {
    match status {
        408 | 504 => OracleError::Timeout,
        429 | 500 | 502 | 503 | 529 => OracleError::RateLimited(format!("HTTP {}", status)),
        _ => OracleError::Unavailable(format!("HTTP {}: {}", status, body.trim())),
    }
}
