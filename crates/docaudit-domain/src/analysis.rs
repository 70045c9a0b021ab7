//! Analysis result types - the structured record produced per analysis call

use crate::document::{DocumentId, ResultId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document classification produced by the analysis pipeline
///
/// Every persisted result carries one of these values; unrecognized model
/// output is coerced to `Report` during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Legal agreement between parties
    Contract,
    /// Billing document
    Invoice,
    /// Everything else (also the normalization fallback)
    Report,
}

impl DocumentType {
    /// Parse a classification label as emitted by the model
    ///
    /// Only the exact lowercase labels are recognized; anything else is
    /// `None` and left to the normalization fallback.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "contract" => Some(DocumentType::Contract),
            "invoice" => Some(DocumentType::Invoice),
            "report" => Some(DocumentType::Report),
            _ => None,
        }
    }

    /// The canonical lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Invoice => "invoice",
            DocumentType::Report => "report",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence status of a required field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Field is absent from the document
    Missing,
    /// Field is present but incomplete
    Partial,
}

/// Urgency of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be addressed
    Critical,
    /// Nice to have
    Optional,
}

/// A required field the model flagged as missing or incomplete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingField {
    /// Field name (e.g. "invoice_number")
    pub name: String,

    /// Whether the field is missing entirely or partially present
    pub status: FieldStatus,

    /// Model-provided explanation
    #[serde(default)]
    pub details: String,
}

/// An improvement suggested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommendation text
    pub text: String,

    /// Urgency
    pub priority: Priority,

    /// Field this recommendation relates to, if any
    #[serde(default)]
    pub related_field: Option<String>,
}

/// The normalized classification-and-findings record
///
/// Produced fresh per analysis invocation and never mutated afterwards.
/// Invariant: `doc_type` is always a recognized classification and
/// `confidence` lies in [0.0, 1.0] - enforced by normalization before the
/// record reaches the store, never trusted from raw model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Document classification
    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    /// Model confidence, clamped to [0.0, 1.0]
    pub confidence: f64,

    /// Required fields flagged missing or partial, in model order
    #[serde(default)]
    pub missing_fields: Vec<MissingField>,

    /// Suggested improvements, in model order
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// A persisted analysis result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    /// Row identifier
    pub id: ResultId,

    /// Document the analysis refers to
    pub doc_id: DocumentId,

    /// The normalized record
    pub result: AnalysisResult,

    /// Creation time (Unix epoch seconds)
    pub created_at: u64,
}
