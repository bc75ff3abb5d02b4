//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/adforge/) and project (.adforge/) level configuration.

use serde::{Deserialize, Serialize};

use crate::ai::provider::ProviderFamily;
use crate::constants::{export, network, provider};
use crate::types::{AdForgeError, Result, Settings};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Default grouping settings
    pub settings: Settings,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Spreadsheet export settings
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            settings: Settings::default(),
            llm: LlmConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `AdForgeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(AdForgeError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.chain.is_empty() {
            return Err(AdForgeError::Config(
                "LLM chain must contain at least one provider".to_string(),
            ));
        }

        if let Some(entry) = self.llm.chain.iter().find(|e| e.model.trim().is_empty()) {
            return Err(AdForgeError::Config(format!(
                "LLM chain entry for {} has an empty model",
                entry.provider
            )));
        }

        for (name, base) in [
            ("gemini_api_base", &self.llm.gemini_api_base),
            ("openrouter_api_base", &self.llm.openrouter_api_base),
        ] {
            url::Url::parse(base).map_err(|e| {
                AdForgeError::Config(format!("LLM {} is not a valid URL ({}): {}", name, base, e))
            })?;
        }

        if self.export.file_name.trim().is_empty() {
            return Err(AdForgeError::Config(
                "Export file_name must not be empty".to_string(),
            ));
        }

        self.settings.validate()
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// LLM provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// HTTP request timeout per attempt
    pub timeout_secs: u64,

    /// Gemini thinking budget used when a chain entry sets none
    pub thinking_budget: Option<u32>,

    pub gemini_api_base: String,
    pub openrouter_api_base: String,

    /// `HTTP-Referer` sent to OpenRouter
    pub referer: Option<String>,

    /// Ordered fallback candidates
    pub chain: Vec<ChainEntry>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            thinking_budget: Some(provider::DEFAULT_THINKING_BUDGET),
            gemini_api_base: provider::GEMINI_API_BASE.to_string(),
            openrouter_api_base: provider::OPENROUTER_API_BASE.to_string(),
            referer: Some(provider::DEFAULT_REFERER.to_string()),
            chain: default_chain(),
        }
    }
}

/// One (provider, model) candidate in the fallback chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub provider: ProviderFamily,
    pub model: String,

    /// Overrides `llm.thinking_budget` for this entry (Gemini only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
}

impl ChainEntry {
    pub fn new(provider: ProviderFamily, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            thinking_budget: None,
        }
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

fn default_chain() -> Vec<ChainEntry> {
    vec![
        ChainEntry::new(ProviderFamily::Gemini, provider::GEMINI_PRIMARY_MODEL),
        // Flash rejects budgets above 24576
        ChainEntry::new(ProviderFamily::Gemini, provider::GEMINI_FALLBACK_MODEL)
            .with_thinking_budget(provider::FLASH_MAX_THINKING_BUDGET),
        ChainEntry::new(ProviderFamily::OpenRouter, provider::OPENROUTER_MODEL),
    ]
}

// =============================================================================
// Export Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name used when `--export` is given without a path
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: export::FILE_NAME.to_string(),
        }
    }
}
