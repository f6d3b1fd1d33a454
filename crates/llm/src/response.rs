//! Parsing model output into a classification
//!
//! The model is asked for a JSON object but nothing it returns is trusted:
//! unknown enum values fall back to safe defaults and confidence is clamped.

use serde_json::Value;
use ticket_triage_core::{clamp_unit, Category, Classification, TeamQueue, Urgency};

use crate::LlmError;

const DEFAULT_CONFIDENCE: f64 = 0.5;
const MISSING_EXPLANATION: &str = "No explanation provided";

/// Parse and normalize a model response
///
/// Accepts a bare JSON object or one wrapped in a fenced code block.
pub fn parse_classification(content: &str) -> Result<Classification, LlmError> {
    let body = strip_code_fence(content);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("response is not JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| LlmError::InvalidResponse("response is not a JSON object".to_string()))?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .map(Category::normalize)
        .unwrap_or(Category::Other);
    let urgency = object
        .get("urgency")
        .and_then(Value::as_str)
        .map(Urgency::normalize)
        .unwrap_or(Urgency::Medium);
    let suggested_team = object
        .get("suggestedTeam")
        .and_then(Value::as_str)
        .map(TeamQueue::normalize)
        .unwrap_or(TeamQueue::ManualReview);

    let explanation = object
        .get("explanation")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(MISSING_EXPLANATION);

    let reasoning_factors = object
        .get("reasoningFactors")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(Classification::new(
        category,
        urgency,
        suggested_team,
        explanation,
        normalize_confidence(object.get("confidence")),
        reasoning_factors,
    ))
}

/// Missing, non-numeric or zero confidence becomes 0.5, then clamp to [0, 1]
fn normalize_confidence(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(c) if c != 0.0 && !c.is_nan() => clamp_unit(c),
        _ => DEFAULT_CONFIDENCE,
    }
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
