//! Defensive mapping of whatever the decoder produced into the canonical
//! optimization result. The mapping is total: every field falls back to a
//! safe default individually, so a 200 response always yields a usable
//! result no matter which decode stage supplied the value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome marker carried on every result handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

/// Canonical optimization output. Structurally valid by construction: the
/// score is clamped to [0, 100], the text of a success result is never
/// empty, and the lists are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub status: ResultStatus,
    pub score: f64,
    pub optimized_text: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    /// Human-readable failure description; set on error results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OptimizationResult {
    /// Error-status result carrying a message and no content.
    pub fn error(message: impl Into<String>) -> Self {
        OptimizationResult {
            status: ResultStatus::Error,
            score: 0.0,
            optimized_text: String::new(),
            suggestions: Vec::new(),
            missing_keywords: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}

/// Maps a decoded generic value into a well-formed success result.
/// `original_text` is the pre-optimization input, substituted whenever the
/// response carries no usable optimized text.
pub fn normalize(value: &Value, original_text: &str) -> OptimizationResult {
    let optimized_text = match value.get("optimized_text").and_then(Value::as_str) {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => original_text.to_string(),
    };
    OptimizationResult {
        status: ResultStatus::Success,
        score: value.get("score").map_or(0.0, coerce_score),
        optimized_text,
        suggestions: string_list(value.get("suggestions")),
        missing_keywords: string_list(value.get("missing_keywords")),
        message: None,
    }
}

/// Number or numeric string, clamped to [0, 100]. Anything else is 0.
fn coerce_score(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// String elements of an array value. Non-arrays and non-string elements
/// contribute nothing.
fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ORIGINAL: &str = "Original resume text.";

    #[test]
    fn test_well_formed_value_passes_through() {
        let value = json!({
            "score": 85,
            "optimized_text": "Improved resume.",
            "suggestions": ["Add metrics"],
            "missing_keywords": ["Python"]
        });
        let result = normalize(&value, ORIGINAL);
        assert_eq!(result.status, ResultStatus::Success);
        assert_eq!(result.score, 85.0);
        assert_eq!(result.optimized_text, "Improved resume.");
        assert_eq!(result.suggestions, vec!["Add metrics"]);
        assert_eq!(result.missing_keywords, vec!["Python"]);
        assert_eq!(result.message, None);
    }

    #[test]
    fn test_score_clamping() {
        for (input, expected) in [
            (json!({"score": -10}), 0.0),
            (json!({"score": 150}), 100.0),
            (json!({"score": "abc"}), 0.0),
            (json!({}), 0.0),
            (json!({"score": "85.5"}), 85.5),
            (json!({"score": [1]}), 0.0),
        ] {
            let result = normalize(&input, ORIGINAL);
            assert_eq!(result.score, expected, "for input {input}");
        }
    }

    #[test]
    fn test_empty_text_falls_back_to_original() {
        for text in [json!(""), json!("   "), json!(null), json!(12)] {
            let result = normalize(&json!({ "optimized_text": text }), ORIGINAL);
            assert_eq!(result.optimized_text, ORIGINAL, "for input {text}");
        }
    }

    #[test]
    fn test_present_text_passes_through_unchanged() {
        let result = normalize(&json!({"optimized_text": "done"}), ORIGINAL);
        assert_eq!(result.optimized_text, "done");
    }

    #[test]
    fn test_non_list_fields_become_empty_lists() {
        let value = json!({"suggestions": "tighten bullets", "missing_keywords": {"a": 1}});
        let result = normalize(&value, ORIGINAL);
        assert!(result.suggestions.is_empty());
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_non_string_list_elements_are_dropped() {
        let value = json!({"suggestions": [1, "keep", null, true]});
        assert_eq!(normalize(&value, ORIGINAL).suggestions, vec!["keep"]);
    }

    #[test]
    fn test_unusable_value_degrades_to_defaults() {
        // the last line of defense: any shape yields a success result
        for value in [json!(null), json!("prose"), json!([1, 2]), json!(3.5)] {
            let result = normalize(&value, ORIGINAL);
            assert_eq!(result.status, ResultStatus::Success);
            assert_eq!(result.score, 0.0);
            assert_eq!(result.optimized_text, ORIGINAL);
            assert!(result.suggestions.is_empty());
            assert!(result.missing_keywords.is_empty());
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let value = json!({
            "score": 250,
            "optimized_text": "Improved.",
            "suggestions": ["a", "b"],
            "missing_keywords": []
        });
        let once = normalize(&value, ORIGINAL);
        let again = normalize(&serde_json::to_value(&once).unwrap(), ORIGINAL);
        assert_eq!(once, again);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ResultStatus::Success).unwrap(),
            json!("success")
        );
        assert_eq!(
            serde_json::to_value(ResultStatus::Error).unwrap(),
            json!("error")
        );
    }

    #[test]
    fn test_error_result_carries_message() {
        let result = OptimizationResult::error("Request failed: connection refused");
        assert_eq!(result.status, ResultStatus::Error);
        assert!(!result.is_success());
        assert_eq!(
            result.message.as_deref(),
            Some("Request failed: connection refused")
        );
    }

    #[test]
    fn test_nan_score_is_zero() {
        // "NaN" parses as a float but must not survive clamping
        let result = normalize(&json!({"score": "NaN"}), ORIGINAL);
        assert_eq!(result.score, 0.0);
    }
}
