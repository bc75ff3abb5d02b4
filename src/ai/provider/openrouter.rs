//! OpenRouter API Provider
//!
//! LLM provider using OpenRouter's OpenAI-compatible Chat Completions API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{LlmProvider, preview};
use crate::types::{AdForgeError, Result};

const SYSTEM_PROMPT: &str =
    "You are an expert Google Ads campaign manager. You will output valid JSON only.";

/// OpenRouter Provider with secure API key handling
pub struct OpenRouterProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    referer: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenRouterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("referer", &self.referer)
            .finish()
    }
}

impl OpenRouterProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        api_base: &str,
        model: &str,
        referer: Option<String>,
    ) -> Self {
        Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            referer,
            client,
        }
    }

    fn label(&self) -> String {
        format!("openrouter ({})", self.model)
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> ChatCompletionRequest {
        let system_content = if schema.is_null() {
            SYSTEM_PROMPT.to_string()
        } else {
            // Compact form is used if pretty-printing somehow fails
            let schema_str = serde_json::to_string_pretty(schema).unwrap_or_else(|e| {
                warn!("Failed to pretty-print schema, using compact format: {}", e);
                schema.to_string()
            });
            format!(
                "{}\n\nThe JSON must match this schema:\n\n```json\n{}\n```",
                SYSTEM_PROMPT, schema_str
            )
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_content,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String> {
        info!("Generating with OpenRouter (model: {})", self.model);

        let start_time = Instant::now();
        let request = self.build_request(prompt, schema);
        let url = format!("{}/chat/completions", self.api_base);

        let mut builder = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json");
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| AdForgeError::transport(self.label(), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdForgeError::transport(
                self.label(),
                format!("OpenRouter API error ({}): {}", status, preview(&body)),
            ));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            AdForgeError::provider_response(
                self.label(),
                format!("Failed to parse OpenRouter response: {}", e),
            )
        })?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Received response from OpenRouter"
        );

        extract_content(body)
            .map_err(|message| AdForgeError::provider_response(self.label(), message))
    }

    fn name(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// `choices[0].message.content`, or the error the API reported instead
fn extract_content(response: ChatCompletionResponse) -> std::result::Result<String, String> {
    if let Some(error) = response.error {
        return Err(error.message);
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| "no content in response".to_string())
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}
