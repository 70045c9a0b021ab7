//! Docaudit Analyzer
//!
//! The analysis pipeline: turns a stored document's text into a normalized
//! classification record via an LLM completion service.
//!
//! # Architecture
//!
//! ```text
//! Document text → AnalysisPrompt → CompletionProvider → parse_analysis
//!                                        ↑ (one stricter retry on parse failure)
//!                                  normalize → DocumentStore
//! ```
//!
//! The pipeline makes at most two sequential completion calls per
//! invocation. Transport and configuration failures propagate immediately;
//! only parse failures are retried, and exactly once. Successful records are
//! normalized (recognized type, confidence clamped to [0, 1]) before they
//! reach the store.
//!
//! # Example Usage
//!
//! ```no_run
//! use docaudit_analyzer::Analyzer;
//! use docaudit_llm::OpenAiProvider;
//! use docaudit_store::SqliteStore;
//! use docaudit_domain::DocumentId;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAiProvider::new(Some("sk-...".to_string()), "gpt-4o-mini");
//! let store = SqliteStore::open("data/docaudit.sqlite3")?;
//!
//! let mut analyzer = Analyzer::new(provider, store);
//! let outcome = analyzer.analyze(DocumentId::from_value(1))?;
//!
//! println!("classified as {}", outcome.result.doc_type);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod error;
mod normalize;
mod parser;
mod prompt;
mod types;

pub use analyzer::Analyzer;
pub use error::AnalyzerError;
pub use normalize::normalize;
pub use parser::parse_analysis;
pub use prompt::{AnalysisPrompt, MAX_DOCUMENT_CHARS};
pub use types::{AnalysisOutcome, RawAnalysis};
