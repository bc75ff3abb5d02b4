//! AI Integration Layer
//!
//! Prompt construction, LLM providers with ordered fallback, and
//! normalization of model output into campaign types.

pub mod prompt;
pub mod provider;
pub mod validation;

pub use prompt::{AdPrompt, PromptBuilder, PromptSection, build_prompt, response_schema};
pub use provider::{
    ChainAttemptResult, ChainStats, ChainedProvider, Credentials, GeminiProvider, LlmProvider,
    OpenRouterProvider, ProviderChain, ProviderChainBuilder, ProviderFamily, SharedProvider,
};
pub use validation::normalize_response;
