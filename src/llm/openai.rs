//! OpenAI Client
//!
//! Blocking chat-completions client for the optional LLM features.

use serde::Deserialize;

use super::{LlmClient, LlmError};
use crate::config::LlmConfig;

/// Default OpenAI model
const DEFAULT_MODEL: &str = "gpt-4o";

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::blocking::Client,
    model: String,
    endpoint: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::blocking::Client::new(),
            model: model.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.1,
        }
    }

    /// Create from the `llm:` config section, reading the key from the
    /// configured environment variable
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;
        let mut client = Self::with_model(api_key, &config.model);
        client.endpoint = config.endpoint.clone();
        client.temperature = config.temperature;
        Ok(client)
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(&LlmConfig::default())
    }

    fn call_api(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": self.temperature
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                provider: self.provider_name().to_string(),
                status,
                body,
            });
        }

        #[derive(Deserialize)]
        struct Message {
            content: String,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api_response: ApiResponse = response.json()?;
        api_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| LlmError::EmptyResponse(self.provider_name().to_string()))
    }
}

impl LlmClient for OpenAiClient {
    fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.call_api(system_prompt, user_prompt)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
