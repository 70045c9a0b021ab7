//! OpenAI-compatible completion provider
//!
//! Sends chat-completion requests to an OpenAI-style HTTP endpoint with
//! deterministic decoding (temperature 0) and a system instruction demanding
//! JSON-only output.
//!
//! There is deliberately no retry at this layer: the analysis pipeline
//! retries parse failures with a *different* prompt, so each invocation makes
//! exactly one metered outbound call.

use crate::LlmError;
use docaudit_domain::traits::CompletionProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for completion requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// System instruction sent with every request
const SYSTEM_INSTRUCTION: &str = "Return ONLY valid JSON that matches the specified schema.";

/// OpenAI-compatible chat-completions provider
///
/// The credential is optional at construction time; a missing credential
/// surfaces as `LlmError::Configuration` on the first call, before any
/// network traffic.
pub struct OpenAiProvider {
    api_base: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: credential for the completion service, if configured
    /// - `model`: model identifier (e.g. "gpt-4o-mini")
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: model.into(),
            api_key,
            client,
        }
    }

    /// Override the API base URL (e.g. for a compatible self-hosted gateway)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send one completion request and return the raw response text
    ///
    /// # Errors
    ///
    /// - `LlmError::Configuration` if no credential is configured
    /// - `LlmError::Service` on network failure or a non-success status
    ///   (auth, quota, server errors)
    /// - `LlmError::InvalidResponse` if the body cannot be decoded
    pub fn request(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::Configuration)?;

        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Service(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Service(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("failed to decode body: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response carries no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        Ok(content)
    }
}

impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.request(prompt)
    }
}
