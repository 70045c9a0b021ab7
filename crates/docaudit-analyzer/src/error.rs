//! Error types for the analysis pipeline

use docaudit_domain::DocumentId;
use docaudit_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during an analysis invocation
///
/// Every terminal failure is distinguishable by kind so the calling layer
/// can map it to an appropriate external response (missing document vs.
/// upstream model misbehavior vs. configuration problem).
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Referenced document does not exist; surfaced before any completion call
    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),

    /// Completion credential is not configured; fatal, never retried
    #[error("completion credential is not configured")]
    Configuration,

    /// Transport or remote failure calling the completion service; fatal per
    /// attempt, never retried here
    #[error("completion service failure: {0}")]
    Completion(String),

    /// Both parse attempts failed
    #[error("model returned unparseable JSON")]
    UnparseableModelOutput,

    /// Persistence failure
    #[error("store error: {0}")]
    Store(String),
}

impl From<LlmError> for AnalyzerError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Configuration => AnalyzerError::Configuration,
            LlmError::Service(message) => AnalyzerError::Completion(message),
            LlmError::InvalidResponse(message) => AnalyzerError::Completion(message),
        }
    }
}
