//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis pipeline and
//! infrastructure. Implementations live in other crates.

use crate::{AnalysisResult, Document, DocumentId, DocumentSummary, ResultId, StoredAnalysis};

/// Trait for persisting documents and analysis results
///
/// Implemented by the infrastructure layer (docaudit-store)
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Insert a new document, returning its assigned id
    fn insert_document(
        &mut self,
        filename: &str,
        text: &str,
        created_at: u64,
    ) -> Result<DocumentId, Self::Error>;

    /// Get a document by id
    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error>;

    /// List documents newest-first, without text payloads
    fn list_documents(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<DocumentSummary>, Self::Error>;

    /// Total number of stored documents
    fn count_documents(&self) -> Result<u64, Self::Error>;

    /// Persist an analysis result for a document, returning the row id
    ///
    /// Each call appends an independent row; earlier results for the same
    /// document are never superseded or overwritten.
    fn save_result(
        &mut self,
        doc_id: DocumentId,
        result: &AnalysisResult,
        created_at: u64,
    ) -> Result<ResultId, Self::Error>;

    /// Most recent analysis result for a document, if any
    fn latest_result(&self, doc_id: DocumentId) -> Result<Option<StoredAnalysis>, Self::Error>;

    /// Total number of stored analysis results
    fn count_results(&self) -> Result<u64, Self::Error>;
}

/// Trait for text-completion operations
///
/// Implemented by the infrastructure layer (docaudit-llm). One invocation
/// makes at most one outbound call; retry policy belongs to the caller,
/// because a retry must use a different prompt.
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error;

    /// Send a prompt and return the raw response text
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}
