//! Document module - uploaded, text-extracted content with a stable id

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a document
///
/// Wraps the storage layer's integer key. Ids are assigned by the store on
/// insert and are stable for the lifetime of the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Create a DocumentId from a raw storage key
    ///
    /// This is primarily for the storage layer and request routing.
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw storage key
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a persisted analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(i64);

impl ResultId {
    /// Create a ResultId from a raw storage key
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw storage key
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An uploaded document with its extracted text
///
/// Immutable once created. Multiple analysis results may reference one
/// document; each is an independent historical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier assigned on creation
    pub id: DocumentId,

    /// Original upload filename
    pub filename: String,

    /// Extracted text content
    pub text: String,

    /// Creation time (Unix epoch seconds)
    pub created_at: u64,
}

/// Listing view of a document (no text payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Stable identifier
    pub id: DocumentId,

    /// Original upload filename
    pub filename: String,

    /// Creation time (Unix epoch seconds)
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_round_trip() {
        let id = DocumentId::from_value(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_document_id_serializes_transparently() {
        let id = DocumentId::from_value(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");

        let parsed: DocumentId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_result_id_round_trip() {
        let id = ResultId::from_value(3);
        assert_eq!(id.value(), 3);
        assert_eq!(id.to_string(), "3");
    }
}
