//! Gemini API Provider
//!
//! LLM provider using Google's `generateContent` endpoint with a
//! structured-output response schema and an optional thinking budget.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use super::{LlmProvider, preview};
use crate::types::{AdForgeError, Result};

/// Gemini Provider with secure API key handling
pub struct GeminiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    thinking_budget: Option<u32>,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("thinking_budget", &self.thinking_budget)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        api_base: &str,
        model: &str,
        thinking_budget: Option<u32>,
    ) -> Self {
        Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            thinking_budget,
            client,
        }
    }

    fn label(&self) -> String {
        format!("gemini ({})", self.model)
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: (!schema.is_null()).then(|| schema.clone()),
                thinking_config: self.thinking_budget.map(|thinking_budget| ThinkingConfig {
                    thinking_budget,
                }),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String> {
        info!(
            "Generating with Gemini (model: {}, thinking_budget: {:?})",
            self.model, self.thinking_budget
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, schema);
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AdForgeError::transport(self.label(), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdForgeError::transport(
                self.label(),
                format!("Gemini API error ({}): {}", status, preview(&body)),
            ));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            AdForgeError::provider_response(
                self.label(),
                format!("Failed to parse Gemini response: {}", e),
            )
        })?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received response from Gemini"
        );

        extract_text(body).map_err(|message| AdForgeError::provider_response(self.label(), message))
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Concatenate the non-thought text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> std::result::Result<String, String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(format!("prompt blocked: {}", reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "no candidates in response".to_string())?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(format!(
            "empty response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ));
    }

    Ok(text)
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider(api_base: &str, thinking_budget: Option<u32>) -> GeminiProvider {
        GeminiProvider::new(
            reqwest::Client::new(),
            SecretString::from("test-key"),
            api_base,
            "gemini-2.5-pro",
            thinking_budget,
        )
    }

    fn parse(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let schema = json!({"type": "ARRAY"});
        let request = provider("https://example.test", Some(32768)).build_request("hi", &schema);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 32768);
    }

    #[test]
    fn test_request_omits_absent_thinking_budget() {
        let request = provider("https://example.test", None).build_request("hi", &Value::Null);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body["generationConfig"].get("thinkingConfig").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_extract_text_skips_thoughts() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "[{\"name\":"},
                    {"text": "\"A\"}]"}
                ]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_text(response).unwrap(), "[{\"name\":\"A\"}]");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert!(extract_text(response).unwrap_err().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_empty_candidate() {
        let response = parse(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]}));
        assert!(extract_text(response).unwrap_err().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn test_generate_sends_key_schema_and_budget() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-2.5-pro:generateContent")
                    .header("x-goog-api-key", "test-key")
                    .body_includes("\"thinkingBudget\":1024")
                    .body_includes("\"responseMimeType\":\"application/json\"");
                then.status(200)
                    .json_body(json!({"candidates": [{"content": {"parts": [{"text": "[]"}]}}]}));
            })
            .await;

        let text = provider(&server.base_url(), Some(1024))
            .generate("prompt", &json!({"type": "ARRAY"}))
            .await
            .unwrap();
        assert_eq!(text, "[]");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_non_success_is_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-2.5-pro:generateContent");
                then.status(503)
                    .json_body(json!({"error": {"message": "overloaded"}}));
            })
            .await;

        let err = provider(&server.base_url(), None)
            .generate("prompt", &Value::Null)
            .await
            .unwrap_err();
        match err {
            AdForgeError::Transport { provider, message } => {
                assert_eq!(provider, "gemini (gemini-2.5-pro)");
                assert!(message.contains("503"));
                assert!(message.contains("overloaded"));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
