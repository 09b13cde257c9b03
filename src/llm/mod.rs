//! LLM collaborator
//!
//! The extraction core never talks to a model directly. Optional features
//! (real-actor fallback, end-of-process refinement, syntax polishing) go
//! through the blocking `LlmClient` port, which the pipeline receives by
//! injection.

pub mod openai;
pub mod prompts;
pub mod scripted;

use thiserror::Error;

pub use openai::OpenAiClient;
pub use scripted::ScriptedLlm;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0} environment variable not set")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{0} returned no choices")]
    EmptyResponse(String),

    #[error("Expected a true/false answer, got '{0}'")]
    MalformedBoolean(String),

    #[error("Expected diagram syntax, got '{0}'")]
    MalformedSyntax(String),

    #[error("No LLM client configured but feature '{0}' requires one")]
    NotConfigured(String),
}

/// Blocking LLM interface
pub trait LlmClient {
    /// Call the LLM with system + user prompts, return raw text response
    fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}

/// Map a classifier answer to a boolean. Only true/yes and false/no are
/// accepted (case-insensitive, surrounding whitespace ignored); anything else
/// is an error rather than a silent default.
pub fn normalize_boolean_result(result: &str) -> Result<bool, LlmError> {
    match result.trim().to_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(LlmError::MalformedBoolean(result.trim().to_string())),
    }
}

/// Ask a yes/no question.
pub fn classify(client: &dyn LlmClient, prompt: &str) -> Result<bool, LlmError> {
    tracing::debug!(
        provider = client.provider_name(),
        model = client.model_name(),
        "classifier call"
    );
    let answer = client.chat(prompts::CLASSIFIER_SYSTEM, prompt)?;
    normalize_boolean_result(&answer)
}
