use crate::api::models::GenerateRequest;
use crate::api::response::{extract_error_message, extract_text};
use crate::api::Generator;
use crate::config::Config;
use crate::error::{ChatError, GenerationError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` endpoint. Built once at startup;
/// the key and timeout live in the underlying `reqwest::Client`.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        api_endpoint: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| ChatError::Config(format!("Invalid API key header: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: generate_url(api_endpoint, model),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_key,
            &config.api_endpoint,
            &config.model,
            config.request_timeout,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and return the raw JSON body
    pub async fn generate_raw(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<Value, GenerationError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(format!("Invalid JSON: {}", e)))
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(
        &self,
        conversation: &[String],
    ) -> std::result::Result<String, GenerationError> {
        let request = GenerateRequest::from_conversation(conversation);
        tracing::debug!(model = %self.model, parts = conversation.len(), "calling generation API");

        let response_json = self.generate_raw(&request).await?;
        extract_text(&response_json)
    }
}

fn generate_url(api_endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_endpoint.trim_end_matches('/'),
        model
    )
}
