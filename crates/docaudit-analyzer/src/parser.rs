//! Parse raw model output into a loose analysis record
//!
//! Models occasionally wrap their JSON in Markdown code fences or return
//! something that is not JSON at all. This module tolerates the former and
//! reports the latter as data (`None`) rather than an error, because the
//! orchestrator must inspect the outcome and decide whether to retry.

use crate::types::RawAnalysis;
use docaudit_domain::{MissingField, Recommendation};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Attempt to decode raw model output into a loose analysis record
///
/// Strips surrounding code fences (with or without a "json" tag) before
/// decoding. Returns `None` on any decode failure: malformed JSON, an empty
/// string, or a non-object top-level value. Never panics and never
/// propagates an error past this boundary.
pub fn parse_analysis(raw: &str) -> Option<RawAnalysis> {
    let stripped = strip_code_fences(raw);

    let value: Value = serde_json::from_str(stripped).ok()?;
    let object = value.as_object()?;

    Some(RawAnalysis {
        doc_type: object.get("type").cloned(),
        confidence: object.get("confidence").cloned(),
        missing_fields: collect_entries::<MissingField>(object.get("missing_fields"), "missing_fields"),
        recommendations: collect_entries::<Recommendation>(
            object.get("recommendations"),
            "recommendations",
        ),
    })
}

/// Strip surrounding Markdown code-fence markers, if present
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Decode list entries one by one, skipping items that do not fit the schema
fn collect_entries<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Vec<T> {
    let Some(array) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    array
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value(entry.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("skipping invalid {} entry {}: {}", field, idx, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docaudit_domain::{FieldStatus, Priority};

    const VALID: &str = r#"{
        "type": "invoice",
        "confidence": 0.9,
        "missing_fields": [
            {"name": "tax", "status": "missing", "details": "no tax line"}
        ],
        "recommendations": [
            {"text": "Add tax", "priority": "critical", "related_field": "tax"}
        ]
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let parsed = parse_analysis(VALID).unwrap();
        assert_eq!(parsed.doc_type.unwrap(), "invoice");
        assert_eq!(parsed.confidence.unwrap(), 0.9);
        assert_eq!(parsed.missing_fields.len(), 1);
        assert_eq!(parsed.missing_fields[0].status, FieldStatus::Missing);
        assert_eq!(parsed.recommendations[0].priority, Priority::Critical);
    }

    #[test]
    fn test_fenced_json_parses_like_unfenced() {
        let fenced = format!("```json\n{}\n```", VALID);
        let no_tag = format!("```\n{}\n```", VALID);

        let plain = parse_analysis(VALID).unwrap();
        assert_eq!(parse_analysis(&fenced).unwrap(), plain);
        assert_eq!(parse_analysis(&no_tag).unwrap(), plain);
    }

    #[test]
    fn test_fenced_json_with_surrounding_whitespace() {
        let fenced = format!("\n  ```json\n{}\n```  \n", VALID);
        assert!(parse_analysis(&fenced).is_some());
    }

    #[test]
    fn test_not_json_is_none() {
        assert!(parse_analysis("not json at all").is_none());
    }

    #[test]
    fn test_empty_string_is_none() {
        assert!(parse_analysis("").is_none());
        assert!(parse_analysis("   \n  ").is_none());
    }

    #[test]
    fn test_truncated_json_is_none() {
        assert!(parse_analysis(r#"{"type": "invoice", "confi"#).is_none());
    }

    #[test]
    fn test_top_level_array_is_none() {
        assert!(parse_analysis(r#"[{"type": "invoice"}]"#).is_none());
    }

    #[test]
    fn test_top_level_scalar_is_none() {
        assert!(parse_analysis("42").is_none());
        assert!(parse_analysis(r#""invoice""#).is_none());
    }

    #[test]
    fn test_unclosed_fence_is_none() {
        // Fence marker with no payload behind it
        assert!(parse_analysis("```json").is_none());
        assert!(parse_analysis("```").is_none());
    }

    #[test]
    fn test_missing_keys_become_loose_fields() {
        let parsed = parse_analysis("{}").unwrap();
        assert!(parsed.doc_type.is_none());
        assert!(parsed.confidence.is_none());
        assert!(parsed.missing_fields.is_empty());
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn test_invalid_list_entries_are_skipped() {
        let raw = r#"{
            "type": "contract",
            "confidence": 0.7,
            "missing_fields": [
                {"name": "signature", "status": "missing", "details": ""},
                {"name": "date", "status": "unknowable"},
                "not an object"
            ],
            "recommendations": [
                {"text": "Sign it", "priority": "urgent"},
                {"text": "Date it", "priority": "optional"}
            ]
        }"#;

        let parsed = parse_analysis(raw).unwrap();
        assert_eq!(parsed.missing_fields.len(), 1);
        assert_eq!(parsed.missing_fields[0].name, "signature");
        assert_eq!(parsed.recommendations.len(), 1);
        assert_eq!(parsed.recommendations[0].text, "Date it");
    }

    #[test]
    fn test_non_array_lists_are_empty() {
        let raw = r#"{"type": "report", "missing_fields": "none", "recommendations": {}}"#;
        let parsed = parse_analysis(raw).unwrap();
        assert!(parsed.missing_fields.is_empty());
        assert!(parsed.recommendations.is_empty());
    }
}
