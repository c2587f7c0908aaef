//! Structured-output recovery for free-text model responses.
//!
//! Models asked for raw JSON still wrap it in a markdown fence often enough
//! that parsing needs a fallback pass: strip a leading ```/```json line and
//! the trailing fence, then parse again. Anything that still fails is a
//! `MalformedAnalysis` error; no retry.

use feedscope_common::{Error, Result};
use serde::de::DeserializeOwned;

/// Parse a model response as JSON, stripping a markdown fence if needed.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    let cleaned = strip_fences(raw);
    serde_json::from_str(cleaned)
        .map_err(|e| Error::MalformedAnalysis(format!("{e}: {}", preview(raw))))
}

/// Strip a surrounding markdown code fence, if present.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (which may carry a language tag), then
    // everything from the closing fence onward.
    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => return trimmed,
    };
    match body.rsplit_once("```") {
        Some((inner, _)) => inner.trim(),
        None => body.trim(),
    }
}

/// Short preview of the raw response for error messages.
fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() > 120 {
        let mut end = 120;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BatchAnalysis;
    use serde_json::Value;

    #[test]
    fn parses_plain_json() {
        let parsed: Value = parse_model_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(parsed["a"], 1);
    }

    #[test]
    fn parses_fenced_json_with_language_tag() {
        let raw = "```json\n{\"overall_manipulation_score\": 55}\n```";
        let parsed: BatchAnalysis = parse_model_json(raw).unwrap();
        assert_eq!(parsed.overall_manipulation_score, 55);
    }

    #[test]
    fn parses_fenced_json_without_language_tag() {
        let raw = "```\n{\"a\": true}\n```";
        let parsed: Value = parse_model_json(raw).unwrap();
        assert_eq!(parsed["a"], true);
    }

    #[test]
    fn parses_fenced_json_with_surrounding_whitespace() {
        let raw = "  ```json\n{\"a\": 2}\n```  \n";
        let parsed: Value = parse_model_json(raw).unwrap();
        assert_eq!(parsed["a"], 2);
    }

    #[test]
    fn rejects_unrecoverable_output() {
        let err = parse_model_json::<Value>("I'm sorry, I can't do that").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_ANALYSIS");
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn rejects_fenced_garbage() {
        let err = parse_model_json::<Value>("```json\nnot json at all\n```").unwrap_err();
        assert!(matches!(err, feedscope_common::Error::MalformedAnalysis(_)));
    }
}
