//! Prompt construction for document analysis
//!
//! The prompt is deterministic: the same document text always produces the
//! same instruction string, which keeps analysis runs reproducible under the
//! provider's zero-temperature decoding.

/// Maximum number of document characters included in a prompt
///
/// Longer texts are silently truncated to this prefix to bound request size
/// and cost.
pub const MAX_DOCUMENT_CHARS: usize = 15_000;

const SCHEMA_INSTRUCTIONS: &str = r#"You are a careful document analysis assistant. Return STRICT JSON only. No prose.
Tasks: (1) classify the document as contract, invoice, or report (2) find missing or partially present required fields (3) recommend improvements.
Required fields by type:
- contract: party_1, party_2, signature, date, payment_terms
- invoice: invoice_number, amount, due_date, tax, bill_to, bill_from
Rules:
- type is one of: contract | invoice | report
- confidence: float between 0 and 1
- missing_fields: only include fields that are missing or partially present. For each: {"name", "status": "missing"|"partial", "details"}
- recommendations: array of {"text", "priority": "critical"|"optional", "related_field"}
Return a JSON object with keys: type, confidence, missing_fields, recommendations."#;

const RETRY_INSTRUCTION: &str = "\n\nReturn ONLY minified JSON.";

/// Builds the analysis prompt for a document's text
pub struct AnalysisPrompt {
    text: String,
}

impl AnalysisPrompt {
    /// Create a prompt builder for the given document text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let text = truncate_chars(&self.text, MAX_DOCUMENT_CHARS);

        let mut prompt = String::with_capacity(SCHEMA_INSTRUCTIONS.len() + text.len() + 32);
        prompt.push_str(SCHEMA_INSTRUCTIONS);
        prompt.push_str("\n\nDocument Text:\n");
        prompt.push_str(text);
        prompt
    }

    /// Build the stricter retry prompt
    ///
    /// The original prompt plus an explicit instruction to return only
    /// minified JSON. No other change.
    pub fn build_retry(&self) -> String {
        let mut prompt = self.build();
        prompt.push_str(RETRY_INSTRUCTION);
        prompt
    }
}

/// Truncate to a character count, respecting char boundaries
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
