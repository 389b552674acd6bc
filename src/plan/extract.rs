//! Pull a JSON-looking payload out of a free-text model response.
//!
//! Order of attempts:
//! 1. The first fenced code block (optionally tagged `json`), inner content trimmed
//! 2. The span from the first `[` to the last `]`, trimmed
//! 3. Nothing
//!
//! The bracket fallback is not a parser. Unrelated brackets in prose can
//! produce a bad span; that shows up later as a parse or validation failure.

use std::sync::OnceLock;

use regex::Regex;

fn fenced_block() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
    })
}

/// Extract the candidate JSON text from `raw`.
pub fn extract_json_text(raw: &str) -> Option<String> {
    if let Some(inner) = fenced_block().captures(raw).and_then(|c| c.get(1)) {
        return Some(inner.as_str().trim().to_string());
    }
    outer_bracket_span(raw).map(|span| span.trim().to_string())
}

/// Slice from the first `[` to the last `]`, inclusive.
pub fn outer_bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}
