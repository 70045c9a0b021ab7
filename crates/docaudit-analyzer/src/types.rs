//! Pipeline-internal and outcome types

use docaudit_domain::{AnalysisResult, MissingField, Recommendation, ResultId};
use serde_json::Value;

/// Loosely-decoded model output, prior to normalization
///
/// `doc_type` and `confidence` are kept as raw JSON values because the model
/// is not trusted to emit them in range; normalization forces them into the
/// canonical shape. List entries are already schema-checked (invalid items
/// were skipped during parsing).
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnalysis {
    /// Raw "type" value, if present
    pub doc_type: Option<Value>,

    /// Raw "confidence" value, if present
    pub confidence: Option<Value>,

    /// Decoded missing-field entries, in model order
    pub missing_fields: Vec<MissingField>,

    /// Decoded recommendation entries, in model order
    pub recommendations: Vec<Recommendation>,
}

/// Outcome of a completed analysis invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// Row id of the persisted result
    pub result_id: ResultId,

    /// Persistence timestamp (Unix epoch seconds)
    pub created_at: u64,

    /// The normalized record, as persisted
    pub result: AnalysisResult,
}
