//! Fallback Provider Chain
//!
//! Ordered provider attempts with early return.
//!
//! ## Strategy
//!
//! 1. Drop candidates whose API key is not configured
//! 2. Fail with a config error if nothing is left
//! 3. Try each remaining candidate once, in order
//! 4. Normalize the response; a normalization failure counts as a failed attempt
//! 5. Return the first campaign that normalizes cleanly
//! 6. Otherwise fail with the last attempt's error wrapped in an aggregate
//!
//! The order is fixed: the strongest model first, cheaper fallbacks after.
//! There is no retry of the same candidate and no backoff.

use std::sync::Arc;
use std::time::Instant;

use secrecy::SecretString;
use tracing::{debug, info, instrument, warn};

use super::{Credentials, LlmProvider, ProviderFamily, SharedProvider, create_provider};
use crate::ai::prompt::AdPrompt;
use crate::ai::validation::normalize_response;
use crate::config::LlmConfig;
use crate::types::{AdForgeError, Campaign, Result};

/// Deferred provider construction, run only when the family's key is present
pub type ProviderFactory = Box<dyn FnOnce(&SecretString) -> Result<SharedProvider> + Send>;

/// Provider with metadata for chain routing
#[derive(Clone)]
pub struct ChainedProvider {
    /// Provider instance
    pub provider: Arc<dyn LlmProvider + Send + Sync>,
    /// Family whose credential gated this provider
    pub family: ProviderFamily,
}

/// Result of a single chain attempt
#[derive(Debug, Clone)]
pub struct ChainAttemptResult {
    pub provider_name: String,
    pub model: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Execution statistics for the chain
#[derive(Debug, Default)]
pub struct ChainStats {
    pub total_attempts: usize,
    pub successful_provider: Option<String>,
    pub attempts: Vec<ChainAttemptResult>,
    pub total_duration_ms: u64,
}

/// Fallback provider chain
pub struct ProviderChain {
    providers: Vec<ChainedProvider>,
    /// Candidates dropped because their key was missing
    skipped_missing_credential: usize,
}

impl ProviderChain {
    /// Providers that will be attempted, in order
    pub fn providers(&self) -> &[ChainedProvider] {
        &self.providers
    }

    pub fn skipped_missing_credential(&self) -> usize {
        self.skipped_missing_credential
    }

    /// Execute the fallback chain for one prompt
    #[instrument(skip(self, prompt), fields(providers = self.providers.len()))]
    pub async fn execute(&self, prompt: &AdPrompt) -> Result<(Campaign, ChainStats)> {
        let mut stats = ChainStats::default();
        let start_time = Instant::now();
        let mut last_error: Option<AdForgeError> = None;

        for entry in &self.providers {
            let provider = &entry.provider;
            let provider_name = provider.name().to_string();
            let model = provider.model().to_string();

            stats.total_attempts += 1;
            let attempt_start = Instant::now();

            info!(
                attempt = stats.total_attempts,
                provider = %provider_name,
                model = %model,
                "Trying provider"
            );

            let outcome = match provider.generate(&prompt.text, &prompt.schema).await {
                Ok(raw) => normalize_response(&raw),
                Err(err) => Err(err),
            };
            let duration_ms = attempt_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(campaign) => {
                    stats.attempts.push(ChainAttemptResult {
                        provider_name: provider_name.clone(),
                        model: model.clone(),
                        success: true,
                        error: None,
                        duration_ms,
                    });
                    stats.successful_provider = Some(format!("{} ({})", provider_name, model));
                    stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

                    info!(
                        provider = %provider_name,
                        model = %model,
                        groups = campaign.len(),
                        attempts = stats.total_attempts,
                        "Chain succeeded"
                    );

                    return Ok((campaign, stats));
                }
                Err(err) => {
                    warn!(
                        provider = %provider_name,
                        model = %model,
                        duration_ms,
                        error = %err,
                        "Provider failed"
                    );

                    stats.attempts.push(ChainAttemptResult {
                        provider_name,
                        model,
                        success: false,
                        error: Some(err.to_string()),
                        duration_ms,
                    });
                    last_error = Some(err);
                }
            }
        }

        stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

        let last = last_error.unwrap_or_else(|| {
            AdForgeError::Config("No providers configured in chain".to_string())
        });
        Err(AdForgeError::Provider {
            attempts: stats.total_attempts,
            last: Box::new(last),
        })
    }
}

struct Candidate {
    family: ProviderFamily,
    label: String,
    factory: ProviderFactory,
}

/// Builder for creating provider chains
pub struct ProviderChainBuilder {
    candidates: Vec<Candidate>,
}

impl ProviderChainBuilder {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Candidates from the configured chain entries, in configured order
    pub fn from_config(llm: &LlmConfig) -> Self {
        llm.chain.iter().fold(Self::new(), |builder, entry| {
            let entry = entry.clone();
            let llm = llm.clone();
            let label = format!("{} ({})", entry.provider, entry.model);
            builder.add_candidate(
                entry.provider,
                label,
                Box::new(move |key: &SecretString| create_provider(&entry, &llm, key)),
            )
        })
    }

    /// Add a candidate built lazily from its family's key
    pub fn add_candidate(
        mut self,
        family: ProviderFamily,
        label: impl Into<String>,
        factory: ProviderFactory,
    ) -> Self {
        self.candidates.push(Candidate {
            family,
            label: label.into(),
            factory,
        });
        self
    }

    /// Add an already-built provider, still gated on its family's key
    pub fn add_shared(self, family: ProviderFamily, provider: SharedProvider) -> Self {
        let label = format!("{} ({})", provider.name(), provider.model());
        self.add_candidate(family, label, Box::new(move |_: &SecretString| Ok(provider)))
    }

    /// Build the chain, keeping only candidates whose key is configured
    pub fn build(self, credentials: &Credentials) -> Result<ProviderChain> {
        let mut families: Vec<ProviderFamily> = Vec::new();
        let mut providers = Vec::new();
        let mut skipped = 0;

        for candidate in self.candidates {
            if !families.contains(&candidate.family) {
                families.push(candidate.family);
            }

            match credentials.get(candidate.family) {
                Some(key) => {
                    let provider = (candidate.factory)(key)?;
                    providers.push(ChainedProvider {
                        provider,
                        family: candidate.family,
                    });
                }
                None => {
                    debug!(
                        candidate = %candidate.label,
                        credential = candidate.family.credential_var(),
                        "Skipping provider (no API key)"
                    );
                    skipped += 1;
                }
            }
        }

        if providers.is_empty() {
            let vars: Vec<&str> = families.iter().map(|f| f.credential_var()).collect();
            return Err(AdForgeError::Config(if vars.is_empty() {
                "No providers configured in chain".to_string()
            } else {
                format!("No API keys available. Please set {}.", vars.join(" or "))
            }));
        }

        Ok(ProviderChain {
            providers,
            skipped_missing_credential: skipped,
        })
    }
}

impl Default for ProviderChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
