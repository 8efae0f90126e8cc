//! Core `Proofreader` trait and `ApiProofreader` implementation.
//!
//! `ApiProofreader` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint: Ollama (OpenAI mode), OpenAI, Groq, LM Studio, vLLM, etc.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{LlmConfig, LlmProvider};

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the proofreading service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error, or a non-success status.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The response carried no text content at all.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// Proofreading is switched off in the configuration.
    #[error("proofreading is disabled in the configuration")]
    Disabled,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Proofreader trait
// ---------------------------------------------------------------------------

/// Async trait for the external proofreading service.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Proofreader>`).
///
/// # Arguments
/// * `instruction` – System instruction for the model.
/// * `prompt`      – Prefix template followed by the captured text.
///
/// The returned string is the raw model output; callers trim it and check
/// for the incompatible-content sentinel.
#[async_trait]
pub trait Proofreader: Send + Sync {
    async fn proofread(&self, instruction: &str, prompt: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiProofreader
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`LlmConfig`] passed to [`ApiProofreader::from_config`].
pub struct ApiProofreader {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiProofreader {
    /// Build an `ApiProofreader` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, instruction: &str, prompt: &str) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if !instruction.is_empty() {
            messages.push(serde_json::json!({ "role": "system", "content": instruction }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": prompt }));

        serde_json::json!({
            "model":       self.config.model,
            "messages":    messages,
            "stream":      false,
            "temperature": self.config.temperature
        })
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
///
/// An empty string is returned as-is; the caller decides what empty means.
fn extract_content(json: &serde_json::Value) -> Result<String, LlmError> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl Proofreader for ApiProofreader {
    /// Send the request to the configured endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn proofread(&self, instruction: &str, prompt: &str) -> Result<String, LlmError> {
        if !self.config.enabled || self.config.provider == LlmProvider::Disabled {
            return Err(LlmError::Disabled);
        }

        let body = self.request_body(instruction, prompt);
        let mut req = self.client.post(self.chat_url()).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Request(format!("server returned {status}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        extract_content(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
