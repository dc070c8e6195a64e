use crate::error::GenerationError;
use serde_json::Value;

fn first_candidate(response_json: &Value) -> Result<&Value, GenerationError> {
    if let Some(reason) = response_json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(GenerationError::MalformedResponse(format!(
            "Prompt blocked: {}",
            reason
        )));
    }

    let candidates = response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| {
            GenerationError::MalformedResponse("No candidates in response".to_string())
        })?;

    candidates
        .first()
        .ok_or_else(|| GenerationError::MalformedResponse("Empty candidates array".to_string()))
}

/// Extract the reply text: every text part of the first candidate, joined and trimmed
pub fn extract_text(response_json: &Value) -> Result<String, GenerationError> {
    let candidate = first_candidate(response_json)?;

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| {
            let reason = finish_reason(response_json).unwrap_or_else(|| "unknown".to_string());
            GenerationError::MalformedResponse(format!(
                "No content in candidate (finish reason: {})",
                reason
            ))
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "Empty text in response".to_string(),
        ));
    }

    Ok(text.to_string())
}

/// Finish reason of the first candidate, if the API reported one
pub fn finish_reason(response_json: &Value) -> Option<String> {
    response_json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("finishReason"))
        .and_then(|r| r.as_str())
        .map(|s| s.to_string())
}

/// Pull the human-readable message out of an API error body, falling back to the raw text
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}
