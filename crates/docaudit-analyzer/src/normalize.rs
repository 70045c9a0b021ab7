//! Normalization of loosely-decoded model output
//!
//! Forces a decoded record into the canonical shape before persistence:
//! `type` must be a recognized classification and `confidence` must lie in
//! [0.0, 1.0]. Raw model output is never trusted to satisfy either.

use crate::types::RawAnalysis;
use docaudit_domain::{AnalysisResult, DocumentType};
use serde_json::Value;

/// Normalize a loose record into the canonical result shape
///
/// Idempotent: normalizing an already-normalized record changes nothing.
pub fn normalize(raw: RawAnalysis) -> AnalysisResult {
    AnalysisResult {
        doc_type: normalize_type(raw.doc_type.as_ref()),
        confidence: normalize_confidence(raw.confidence.as_ref()),
        missing_fields: raw.missing_fields,
        recommendations: raw.recommendations,
    }
}

/// Heuristic: anything that is not a recognized label becomes `report`
fn normalize_type(value: Option<&Value>) -> DocumentType {
    value
        .and_then(Value::as_str)
        .and_then(DocumentType::from_label)
        .unwrap_or(DocumentType::Report)
}

/// Coerce to a float and clamp into [0.0, 1.0]
///
/// JSON numbers and numeric strings coerce; anything else (absent, null,
/// bool, object, array, non-numeric or non-finite string) maps to 0.0.
fn normalize_confidence(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match coerced {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => 0.0,
    }
}
