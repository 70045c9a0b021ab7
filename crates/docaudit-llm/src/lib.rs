//! Docaudit Completion Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `docaudit-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic scripted provider for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions HTTP client
//!
//! # Examples
//!
//! ```
//! use docaudit_llm::MockProvider;
//! use docaudit_domain::traits::CompletionProvider;
//!
//! let provider = MockProvider::new("{\"type\":\"report\"}");
//! let raw = provider.complete("classify this").unwrap();
//! assert_eq!(raw, "{\"type\":\"report\"}");
//! ```

#![warn(missing_docs)]

pub mod openai;

use docaudit_domain::traits::CompletionProvider;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during completion operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No credential configured for the completion service
    #[error("completion credential is not configured")]
    Configuration,

    /// Network or remote failure calling the completion service
    #[error("completion service error: {0}")]
    Service(String),

    /// Response body could not be decoded
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

/// A single scripted mock outcome
#[derive(Debug, Clone)]
enum ScriptedReply {
    Text(String),
    ServiceError(String),
}

/// Mock completion provider for deterministic testing
///
/// Returns a fixed default response, or scripted responses in order when a
/// script is queued. No network calls are made.
///
/// # Examples
///
/// ```
/// use docaudit_llm::MockProvider;
/// use docaudit_domain::traits::CompletionProvider;
///
/// // Fixed response for every prompt
/// let provider = MockProvider::new("ok");
/// assert_eq!(provider.complete("anything").unwrap(), "ok");
///
/// // Scripted sequence: consumed call by call, then back to the default
/// let provider = MockProvider::new("default");
/// provider.enqueue("first");
/// provider.enqueue("second");
/// assert_eq!(provider.complete("p").unwrap(), "first");
/// assert_eq!(provider.complete("p").unwrap(), "second");
/// assert_eq!(provider.complete("p").unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response to be returned on the next unscripted call
    pub fn enqueue(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Text(response.into()));
    }

    /// Queue a service error to be returned on the next unscripted call
    pub fn enqueue_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::ServiceError(message.into()));
    }

    /// Number of completion calls made so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// The prompt passed to the nth call, if it happened
    pub fn prompt(&self, call: usize) -> Option<String> {
        self.prompts.lock().unwrap().get(call).cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::ServiceError(message)) => Err(LlmError::Service(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("fixed");
        assert_eq!(provider.complete("any prompt").unwrap(), "fixed");
        assert_eq!(provider.complete("another").unwrap(), "fixed");
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_mock_provider_script_order() {
        let provider = MockProvider::new("default");
        provider.enqueue("a");
        provider.enqueue("b");

        assert_eq!(provider.complete("p1").unwrap(), "a");
        assert_eq!(provider.complete("p2").unwrap(), "b");
        assert_eq!(provider.complete("p3").unwrap(), "default");
    }

    #[test]
    fn test_mock_provider_scripted_error() {
        let provider = MockProvider::default();
        provider.enqueue_error("quota exhausted");

        let result = provider.complete("p");
        assert!(matches!(result, Err(LlmError::Service(_))));

        // Errors still count as calls
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_records_prompts() {
        let provider = MockProvider::default();
        provider.complete("first prompt").unwrap();
        provider.complete("second prompt").unwrap();

        assert_eq!(provider.prompt(0).unwrap(), "first prompt");
        assert_eq!(provider.prompt(1).unwrap(), "second prompt");
        assert_eq!(provider.prompt(2), None);
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("x");
        let provider2 = provider1.clone();

        provider1.complete("p").unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
