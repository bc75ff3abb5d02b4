//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for structured LLM output generation.
//! Providers return the raw text payload; turning it into ad groups is the
//! normalizer's job.
//!
//! ## Modules
//!
//! - `chain`: Fallback provider chain with one attempt per candidate
//! - `gemini`: Google Gemini `generateContent` API
//! - `openrouter`: OpenRouter chat completions API

mod chain;
mod gemini;
mod openrouter;

pub use chain::{
    ChainAttemptResult, ChainStats, ChainedProvider, ProviderChain, ProviderChainBuilder,
    ProviderFactory,
};
pub use gemini::GeminiProvider;
pub use openrouter::OpenRouterProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ChainEntry, LlmConfig};
use crate::constants::provider as defaults;
use crate::types::{AdForgeError, Result};

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Families & Credentials
// =============================================================================

/// API family a provider belongs to. Each family has one credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Gemini,
    OpenRouter,
}

impl ProviderFamily {
    /// Environment variable holding this family's API key
    pub fn credential_var(&self) -> &'static str {
        match self {
            Self::Gemini => defaults::GEMINI_KEY_VAR,
            Self::OpenRouter => defaults::OPENROUTER_KEY_VAR,
        }
    }
}

impl std::fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenRouter => write!(f, "openrouter"),
        }
    }
}

/// API keys per provider family
///
/// Keys are held as `SecretString` and redacted in debug output.
#[derive(Default)]
pub struct Credentials {
    gemini: Option<SecretString>,
    openrouter: Option<SecretString>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini", &self.gemini.as_ref().map(|_| "[REDACTED]"))
            .field("openrouter", &self.openrouter.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    pub fn new(gemini: Option<String>, openrouter: Option<String>) -> Self {
        Self {
            gemini: non_empty(gemini),
            openrouter: non_empty(openrouter),
        }
    }

    /// Read `GEMINI_API_KEY` and `OPENROUTER_API_KEY`
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(defaults::GEMINI_KEY_VAR).ok(),
            std::env::var(defaults::OPENROUTER_KEY_VAR).ok(),
        )
    }

    pub fn get(&self, family: ProviderFamily) -> Option<&SecretString> {
        match family {
            ProviderFamily::Gemini => self.gemini.as_ref(),
            ProviderFamily::OpenRouter => self.openrouter.as_ref(),
        }
    }

    pub fn has(&self, family: ProviderFamily) -> bool {
        self.get(family).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.gemini.is_none() && self.openrouter.is_none()
    }
}

fn non_empty(key: Option<String>) -> Option<SecretString> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for structured output generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Issue one request and return the raw text payload.
    ///
    /// Implementations make exactly one HTTP round trip and never retry.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a provider for one chain entry
pub fn create_provider(
    entry: &ChainEntry,
    llm: &LlmConfig,
    api_key: &SecretString,
) -> Result<SharedProvider> {
    let client = http_client(llm.timeout_secs)?;

    match entry.provider {
        ProviderFamily::Gemini => Ok(Arc::new(GeminiProvider::new(
            client,
            api_key.clone(),
            &llm.gemini_api_base,
            &entry.model,
            entry.thinking_budget.or(llm.thinking_budget),
        ))),
        ProviderFamily::OpenRouter => Ok(Arc::new(OpenRouterProvider::new(
            client,
            api_key.clone(),
            &llm.openrouter_api_base,
            &entry.model,
            llm.referer.clone(),
        ))),
    }
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AdForgeError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Short body excerpt for error messages
pub(crate) fn preview(body: &str) -> String {
    const MAX: usize = 500;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
