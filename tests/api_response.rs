use kautaliya::api::response::{extract_error_message, extract_text, finish_reason};
use kautaliya::api::GenerateRequest;
use kautaliya::error::GenerationError;
use serde_json::json;

#[test]
fn test_extract_text_with_content() {
    let response = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": "Namaste! How can I help?\n" }]
            },
            "finishReason": "STOP"
        }]
    });

    let text = extract_text(&response).unwrap();
    assert_eq!(text, "Namaste! How can I help?");
}

#[test]
fn test_extract_text_joins_parts() {
    let response = json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": "First half, " }, { "text": "second half." }]
            }
        }]
    });

    let text = extract_text(&response).unwrap();
    assert_eq!(text, "First half, second half.");
}

#[test]
fn test_extract_text_empty_candidates() {
    let response = json!({ "candidates": [] });

    let result = extract_text(&response);
    assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
}

#[test]
fn test_extract_text_missing_candidates() {
    let response = json!({ "usageMetadata": { "totalTokenCount": 3 } });
    assert!(extract_text(&response).is_err());
}

#[test]
fn test_extract_text_blocked_prompt() {
    let response = json!({
        "promptFeedback": { "blockReason": "SAFETY" }
    });

    let err = extract_text(&response).unwrap_err();
    assert!(err.to_string().contains("SAFETY"));
}

#[test]
fn test_extract_text_candidate_without_content_reports_finish_reason() {
    let response = json!({
        "candidates": [{ "finishReason": "MAX_TOKENS" }]
    });

    let err = extract_text(&response).unwrap_err();
    assert!(err.to_string().contains("MAX_TOKENS"));
    assert_eq!(finish_reason(&response).as_deref(), Some("MAX_TOKENS"));
}

#[test]
fn test_extract_text_whitespace_only_is_error() {
    let response = json!({
        "candidates": [{ "content": { "parts": [{ "text": "   \n" }] } }]
    });

    assert!(extract_text(&response).is_err());
}

#[test]
fn test_extract_error_message_from_api_body() {
    let body = r#"{"error": {
        "code": 429,
        "message": "Resource has been exhausted",
        "status": "RESOURCE_EXHAUSTED"
    }}"#;
    assert_eq!(extract_error_message(body), "Resource has been exhausted");
    assert_eq!(extract_error_message("upstream down\n"), "upstream down");
}

#[test]
fn test_request_carries_whole_conversation_as_parts() {
    let conversation = vec![
        "system instruction".to_string(),
        "hello".to_string(),
        "hi".to_string(),
    ];

    let request = serde_json::to_value(GenerateRequest::from_conversation(&conversation)).unwrap();
    assert_eq!(
        request,
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": "system instruction" },
                    { "text": "hello" },
                    { "text": "hi" }
                ]
            }]
        })
    );
}
