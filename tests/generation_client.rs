//! The Gemini client against a local mock of the generateContent endpoint.

use kautaliya::api::{reply, GeminiClient, Generator, FALLBACK_REPLY};
use kautaliya::error::GenerationError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-test:generateContent";

fn test_client(server: &MockServer, timeout_secs: u64) -> GeminiClient {
    GeminiClient::new("test-key", &server.uri(), "gemini-test", timeout_secs).expect("client")
}

fn conversation() -> Vec<String> {
    vec!["You are Kautaliya.".to_string(), "hello".to_string()]
}

#[tokio::test]
async fn sends_conversation_with_api_key_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": "You are Kautaliya." }, { "text": "hello" }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": " Namaste! " }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = test_client(&server, 5)
        .generate(&conversation())
        .await
        .expect("generation should succeed");
    assert_eq!(text, "Namaste!");
}

#[tokio::test]
async fn error_status_carries_api_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server, 5)
        .generate(&conversation())
        .await
        .unwrap_err();

    match err {
        GenerationError::Status { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Quota exceeded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server, 5)
        .generate(&conversation())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = test_client(&server, 1)
        .generate(&conversation())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn unreachable_upstream_falls_back_to_apology() {
    let server = MockServer::start().await;
    let client = test_client(&server, 5);
    drop(server);

    let text = reply(&client, &conversation()).await;
    assert_eq!(text, FALLBACK_REPLY);
}
