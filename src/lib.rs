//! AdForge - AI-Driven Google Ads Campaign Generator
//!
//! Groups a flat keyword list into themed ad groups and writes headlines and
//! descriptions for each, using an ordered chain of LLM providers.
//!
//! ## Core Features
//!
//! - **Provider Chain**: Gemini models first, OpenRouter as fallback, each
//!   gated on its API key
//! - **Structured Output**: Response schema sent to the model, strict
//!   normalization of what comes back
//! - **Copy-on-Write Pinning**: Pin toggles return a new campaign sharing
//!   untouched ad groups
//! - **XLSX Export**: One sheet with merged group cells and length columns
//!
//! ## Quick Start
//!
//! ```ignore
//! use adforge::{CampaignGenerator, Config, Credentials, Settings};
//!
//! let generator = CampaignGenerator::from_config(&Config::default(), &Credentials::from_env())?;
//! let campaign = generator.generate(&keywords, &Settings::default()).await?;
//! let campaign = campaign.toggle_pin(&campaign_group_id, 0)?;
//! adforge::export::write_xlsx(&campaign, Path::new("Google-Ads-Campaign.xlsx"))?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: Prompt builder, LLM providers, response normalization
//! - [`generator`]: Generation entry point
//! - [`export`]: XLSX export
//! - [`ingest`]: Keyword input from text, CSV and XLSX
//! - [`config`]: Layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod generator;
pub mod ingest;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{ChainEntry, Config, ConfigLoader, ExportConfig, LlmConfig};

// Error Types
pub use types::error::{AdForgeError, Result};

// Domain
pub use types::{AdGroup, Campaign, Description, GenerationResult, Headline, Settings};

// Generation
pub use generator::CampaignGenerator;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    AdPrompt, ChainStats, Credentials, GeminiProvider, LlmProvider, OpenRouterProvider,
    ProviderChain, ProviderChainBuilder, ProviderFamily, normalize_response,
};

// =============================================================================
// IO Re-exports
// =============================================================================

pub use export::{SheetLayout, write_xlsx};
pub use ingest::{parse_keyword_text, parse_keywords_from_file};
