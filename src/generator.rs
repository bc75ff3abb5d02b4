//! Campaign generation entry point.
//!
//! Ties the prompt builder to the provider chain. Each call is one
//! independent run; concurrent calls on the same generator neither share
//! state nor wait on each other.

use tracing::{info, instrument};

use crate::ai::prompt::AdPrompt;
use crate::ai::provider::{ChainStats, Credentials, ProviderChain, ProviderChainBuilder};
use crate::config::Config;
use crate::types::{AdForgeError, GenerationResult, Result, Settings};

pub struct CampaignGenerator {
    chain: ProviderChain,
}

impl CampaignGenerator {
    pub fn new(chain: ProviderChain) -> Self {
        Self { chain }
    }

    /// Build the configured chain, keeping only candidates with a key.
    ///
    /// Fails with `AdForgeError::Config` when no candidate has a key.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let chain = ProviderChainBuilder::from_config(&config.llm).build(credentials)?;
        Ok(Self::new(chain))
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub async fn generate(&self, keywords: &[String], settings: &Settings) -> Result<GenerationResult> {
        self.generate_with_stats(keywords, settings)
            .await
            .map(|(campaign, _)| campaign)
    }

    #[instrument(skip(self, keywords), fields(keywords = keywords.len()))]
    pub async fn generate_with_stats(
        &self,
        keywords: &[String],
        settings: &Settings,
    ) -> Result<(GenerationResult, ChainStats)> {
        if keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AdForgeError::InvalidInput(
                "Please enter or upload some keywords.".to_string(),
            ));
        }

        let prompt = AdPrompt::new(keywords, settings);
        let (campaign, stats) = self.chain.execute(&prompt).await?;

        info!(
            groups = campaign.len(),
            duration_ms = stats.total_duration_ms,
            "Campaign generated"
        );
        Ok((campaign, stats))
    }
}
