//! Docaudit Domain Layer
//!
//! Core types and trait interfaces for the document analysis service.
//!
//! ## Key Concepts
//!
//! - **Document**: a unit of uploaded, text-extracted content with a stable id
//! - **AnalysisResult**: the classification-and-findings record produced per
//!   analysis invocation, normalized before persistence
//! - **Trait seams**: `DocumentStore` and `CompletionProvider` define the
//!   boundaries to infrastructure, so the analysis pipeline can be exercised
//!   with fakes
//!
//! ## Architecture
//!
//! This crate holds no infrastructure: storage lives in `docaudit-store`,
//! completion providers in `docaudit-llm`, and the pipeline that composes
//! them in `docaudit-analyzer`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod document;
pub mod traits;

// Re-exports for convenience
pub use analysis::{
    AnalysisResult, DocumentType, FieldStatus, MissingField, Priority, Recommendation,
    StoredAnalysis,
};
pub use document::{Document, DocumentId, DocumentSummary, ResultId};
