//! Decoding of free-text model output into a validated [`Analysis`].
//!
//! The model is asked for a bare JSON object but regularly wraps it in prose
//! or code fences. Decoding is two-stage: scan for the first balanced
//! `{...}` span that decodes as an object, then fall back to decoding the
//! whole response. The decoded object is validated before anything is
//! returned; nothing is ever defaulted or invented.

use cointrend_core::{Analysis, AnalysisError, Sentiment, MAX_SCORE, MIN_SCORE};
use serde_json::{Map, Value};

/// Parse and validate a raw model response.
///
/// # Errors
///
/// - [`AnalysisError::Unparseable`] if neither a JSON span nor the whole
///   response decodes.
/// - [`AnalysisError::Invalid`] if the decoded payload is missing a field, has
///   a label outside the closed set, or a score outside `[0, 1]`.
pub fn parse_analysis(raw: &str) -> Result<Analysis, AnalysisError> {
    let value = first_json_object(raw)
        .or_else(|| serde_json::from_str::<Value>(raw.trim()).ok())
        .ok_or(AnalysisError::Unparseable)?;

    let Value::Object(map) = value else {
        return Err(AnalysisError::Invalid(
            "response is not a JSON object".to_string(),
        ));
    };

    validate_payload(&map)
}

/// First `{...}` span in `text` that decodes as a JSON object.
///
/// Every `{` is tried in order, so stray braces in leading prose do not hide
/// a valid object later on.
fn first_json_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(start, _)| {
        let span = balanced_span(&text[start..])?;
        match serde_json::from_str::<Value>(span) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        }
    })
}

/// The brace-balanced prefix of `text`, which must start with `{`.
///
/// Braces inside JSON strings (including escaped quotes) do not count.
fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

fn validate_payload(map: &Map<String, Value>) -> Result<Analysis, AnalysisError> {
    let summary = map
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AnalysisError::Invalid("missing or empty summary".to_string()))?;

    let label = map
        .get("sentiment")
        .and_then(Value::as_str)
        .ok_or_else(|| AnalysisError::Invalid("missing sentiment label".to_string()))?;
    let sentiment = label
        .parse::<Sentiment>()
        .map_err(|e| AnalysisError::Invalid(e.to_string()))?;

    // `as_f64` only succeeds on JSON numbers, so "0.8" as a string is rejected.
    let score = map
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| AnalysisError::Invalid("score must be a number".to_string()))?;
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(AnalysisError::Invalid(format!(
            "score {score} outside [{MIN_SCORE}, {MAX_SCORE}]"
        )));
    }

    Ok(Analysis {
        summary: summary.to_string(),
        sentiment,
        score,
    })
}
