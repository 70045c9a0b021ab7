//! Core Analyzer implementation

use crate::error::AnalyzerError;
use crate::normalize::normalize;
use crate::parser::parse_analysis;
use crate::prompt::AnalysisPrompt;
use crate::types::AnalysisOutcome;
use docaudit_domain::traits::{CompletionProvider, DocumentStore};
use docaudit_domain::DocumentId;
use docaudit_llm::LlmError;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Number of completion attempts per analysis: one call plus one retry
///
/// The retry bound is fixed here, not configurable: it exists to tolerate
/// occasional non-compliance with the JSON-only instruction while keeping
/// cost and latency bounded.
const MAX_ATTEMPTS: usize = 2;

/// The Analyzer runs a document through the classification pipeline
///
/// Builds a deterministic prompt, calls the completion provider, parses the
/// loosely-structured response, retries exactly once on parse failure with a
/// stricter prompt, normalizes the record, and persists it.
pub struct Analyzer<P, S>
where
    P: CompletionProvider<Error = LlmError>,
    S: DocumentStore,
{
    provider: P,
    store: S,
}

impl<P, S> Analyzer<P, S>
where
    P: CompletionProvider<Error = LlmError>,
    S: DocumentStore,
    S::Error: std::fmt::Display,
{
    /// Create a new Analyzer over a completion provider and a store
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    /// Analyze a stored document and persist the normalized result
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the id does not exist (before any completion
    ///   call is made)
    /// - `Configuration` / `Completion` from the provider, propagated
    ///   immediately - transport failures are never retried
    /// - `UnparseableModelOutput` if both parse attempts fail; nothing is
    ///   persisted in that case
    /// - `Store` on persistence failure
    pub fn analyze(&mut self, doc_id: DocumentId) -> Result<AnalysisOutcome, AnalyzerError> {
        let document = self
            .store
            .get_document(doc_id)
            .map_err(|e| AnalyzerError::Store(e.to_string()))?
            .ok_or(AnalyzerError::DocumentNotFound(doc_id))?;

        info!(%doc_id, text_chars = document.text.len(), "starting analysis");

        let prompt = AnalysisPrompt::new(document.text);

        // Bounded two-attempt loop: first the regular prompt, then the
        // stricter retry prompt. Only parse failures reach the second
        // iteration; provider errors propagate from either attempt.
        let mut parsed = None;
        for attempt in 0..MAX_ATTEMPTS {
            let prompt_text = if attempt == 0 {
                prompt.build()
            } else {
                prompt.build_retry()
            };

            let response = self.provider.complete(&prompt_text)?;
            debug!(attempt, response_chars = response.len(), "completion returned");

            match parse_analysis(&response) {
                Some(raw) => {
                    parsed = Some(raw);
                    break;
                }
                None => warn!(attempt, "model response failed to parse"),
            }
        }

        let raw = parsed.ok_or(AnalyzerError::UnparseableModelOutput)?;
        let result = normalize(raw);

        let created_at = now_epoch_secs();
        let result_id = self
            .store
            .save_result(doc_id, &result, created_at)
            .map_err(|e| AnalyzerError::Store(e.to_string()))?;

        info!(
            %doc_id,
            %result_id,
            doc_type = %result.doc_type,
            confidence = result.confidence,
            "analysis complete"
        );

        Ok(AnalysisOutcome {
            result_id,
            created_at,
            result,
        })
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docaudit_domain::DocumentType;
    use docaudit_llm::MockProvider;
    use docaudit_store::SqliteStore;

    fn analyzer_with_document(
        provider: MockProvider,
    ) -> (Analyzer<MockProvider, SqliteStore>, DocumentId) {
        let mut store = SqliteStore::in_memory().unwrap();
        let doc_id = store
            .insert_document("invoice.pdf", "Invoice #42 for Acme Corp", 1000)
            .unwrap();
        (Analyzer::new(provider, store), doc_id)
    }

    #[test]
    fn test_fenced_response_succeeds_without_retry() {
        let provider = MockProvider::new(
            "```json\n{\"type\":\"invoice\",\"confidence\":0.9,\"missing_fields\":[],\"recommendations\":[]}\n```",
        );
        let (mut analyzer, doc_id) = analyzer_with_document(provider.clone());

        let outcome = analyzer.analyze(doc_id).unwrap();

        assert_eq!(outcome.result.doc_type, DocumentType::Invoice);
        assert_eq!(outcome.result.confidence, 0.9);
        assert_eq!(provider.call_count(), 1, "no retry call may be made");
    }

    #[test]
    fn test_parse_failure_retries_once_with_stricter_prompt() {
        let provider = MockProvider::default();
        provider.enqueue("not json at all");
        provider.enqueue(r#"{"type":"contract","confidence":1.5,"missing_fields":[],"recommendations":[]}"#);

        let (mut analyzer, doc_id) = analyzer_with_document(provider.clone());
        let outcome = analyzer.analyze(doc_id).unwrap();

        assert_eq!(outcome.result.doc_type, DocumentType::Contract);
        assert_eq!(outcome.result.confidence, 1.0, "out-of-range confidence clamps");
        assert_eq!(provider.call_count(), 2, "exactly two completion calls");

        // The retry prompt is the original plus the minified-JSON instruction
        let first = provider.prompt(0).unwrap();
        let second = provider.prompt(1).unwrap();
        assert!(second.starts_with(&first));
        assert!(second.ends_with("Return ONLY minified JSON."));
    }

    #[test]
    fn test_two_unparseable_responses_terminate() {
        let provider = MockProvider::new("still not json");
        let (mut analyzer, doc_id) = analyzer_with_document(provider.clone());

        let result = analyzer.analyze(doc_id);
        assert!(matches!(result, Err(AnalyzerError::UnparseableModelOutput)));
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_nothing_persisted_when_output_unparseable() {
        let provider = MockProvider::new("garbage");
        let mut store = SqliteStore::in_memory().unwrap();
        let doc_id = store.insert_document("a.pdf", "text", 1000).unwrap();

        let mut analyzer = Analyzer::new(provider, store);
        assert!(analyzer.analyze(doc_id).is_err());

        assert_eq!(analyzer.store.count_results().unwrap(), 0);
    }

    #[test]
    fn test_missing_document_fails_before_any_completion_call() {
        let provider = MockProvider::default();
        let store = SqliteStore::in_memory().unwrap();
        let mut analyzer = Analyzer::new(provider.clone(), store);

        let result = analyzer.analyze(DocumentId::from_value(404));
        assert!(matches!(result, Err(AnalyzerError::DocumentNotFound(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_service_error_propagates_without_retry() {
        let provider = MockProvider::default();
        provider.enqueue_error("quota exhausted");

        let (mut analyzer, doc_id) = analyzer_with_document(provider.clone());
        let result = analyzer.analyze(doc_id);

        assert!(matches!(result, Err(AnalyzerError::Completion(_))));
        assert_eq!(provider.call_count(), 1, "transport failures are not retried");
    }

    #[test]
    fn test_service_error_on_retry_attempt_propagates() {
        let provider = MockProvider::default();
        provider.enqueue("not json");
        provider.enqueue_error("connection reset");

        let (mut analyzer, doc_id) = analyzer_with_document(provider.clone());
        let result = analyzer.analyze(doc_id);

        assert!(matches!(result, Err(AnalyzerError::Completion(_))));
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_normalized_result_is_persisted() {
        let provider = MockProvider::new(r#"{"type":"memo","confidence":"2.5"}"#);
        let (mut analyzer, doc_id) = analyzer_with_document(provider);

        let outcome = analyzer.analyze(doc_id).unwrap();
        assert_eq!(outcome.result.doc_type, DocumentType::Report);
        assert_eq!(outcome.result.confidence, 1.0);

        let stored = analyzer.store.latest_result(doc_id).unwrap().unwrap();
        assert_eq!(stored.id, outcome.result_id);
        assert_eq!(stored.result, outcome.result);
    }

    #[test]
    fn test_each_invocation_appends_a_row() {
        let provider =
            MockProvider::new(r#"{"type":"report","confidence":0.4,"missing_fields":[],"recommendations":[]}"#);
        let (mut analyzer, doc_id) = analyzer_with_document(provider);

        let first = analyzer.analyze(doc_id).unwrap();
        let second = analyzer.analyze(doc_id).unwrap();

        assert_ne!(first.result_id, second.result_id);
        assert_eq!(analyzer.store.count_results().unwrap(), 2);
    }
}
