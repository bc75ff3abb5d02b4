//! Campaign Domain Types
//!
//! Ad groups, headlines and descriptions as returned by a generation run,
//! plus the settings that shape a request.
//!
//! A [`Campaign`] is immutable once built. Pinning a headline produces a new
//! campaign that shares every untouched ad group with the previous one.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{ad, settings as limits};
use crate::types::{AdForgeError, Result};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));

// =============================================================================
// Settings
// =============================================================================

/// Grouping settings for one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub num_ad_groups: u32,
    pub min_keywords_per_group: u32,
    pub max_keywords_per_group: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_ad_groups: limits::DEFAULT_NUM_AD_GROUPS,
            min_keywords_per_group: limits::DEFAULT_MIN_KEYWORDS,
            max_keywords_per_group: limits::DEFAULT_MAX_KEYWORDS,
        }
    }
}

impl Settings {
    pub fn new(num_ad_groups: u32, min_keywords_per_group: u32, max_keywords_per_group: u32) -> Self {
        Self {
            num_ad_groups,
            min_keywords_per_group,
            max_keywords_per_group,
        }
    }

    /// Check the input ranges offered to users.
    ///
    /// The prompt builder never calls this: out-of-range settings reach the
    /// model verbatim and may simply confuse it.
    pub fn validate(&self) -> Result<()> {
        check_range("num_ad_groups", self.num_ad_groups, &limits::NUM_AD_GROUPS_RANGE)?;
        check_range(
            "min_keywords_per_group",
            self.min_keywords_per_group,
            &limits::MIN_KEYWORDS_RANGE,
        )?;
        check_range(
            "max_keywords_per_group",
            self.max_keywords_per_group,
            &limits::MAX_KEYWORDS_RANGE,
        )?;

        if self.min_keywords_per_group > self.max_keywords_per_group {
            return Err(AdForgeError::Config(format!(
                "min_keywords_per_group ({}) must not exceed max_keywords_per_group ({})",
                self.min_keywords_per_group, self.max_keywords_per_group
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: u32, range: &std::ops::RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AdForgeError::Config(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

// =============================================================================
// Ad Copy
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub text: String,
    /// Local preference flag, never sent to a provider
    pub is_pinned: bool,
}

impl Headline {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_pinned: false,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_over_limit(&self) -> bool {
        self.char_count() > ad::HEADLINE_MAX_CHARS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub text: String,
}

impl Description {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_over_limit(&self) -> bool {
        self.char_count() > ad::DESCRIPTION_MAX_CHARS
    }
}

// =============================================================================
// Ad Group
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroup {
    /// Unique within one campaign, see [`AdGroup::derive_id`]
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
    pub headlines: Vec<Headline>,
    pub descriptions: Vec<Description>,
}

impl AdGroup {
    /// Build the group id from its name and position in the response.
    ///
    /// Whitespace runs become `-`; the index suffix keeps ids unique even
    /// when two groups share a name.
    pub fn derive_id(name: &str, index: usize) -> String {
        format!("{}-{}", WHITESPACE_RUN.replace_all(name, "-"), index)
    }

    /// Rows this group spans in tabular output
    pub fn row_count(&self) -> usize {
        self.headlines.len().max(self.descriptions.len())
    }

    pub fn pinned_count(&self) -> usize {
        self.headlines.iter().filter(|h| h.is_pinned).count()
    }
}

// =============================================================================
// Campaign
// =============================================================================

/// Ordered ad groups produced by one generation call.
///
/// Groups are held behind `Arc` so that edits copy only the touched group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Campaign {
    groups: Vec<Arc<AdGroup>>,
}

/// Result of a generation call
pub type GenerationResult = Campaign;

impl Campaign {
    pub fn new(groups: Vec<AdGroup>) -> Self {
        Self {
            groups: groups.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> impl Iterator<Item = &AdGroup> {
        self.groups.iter().map(Arc::as_ref)
    }

    pub fn get(&self, group_id: &str) -> Option<&AdGroup> {
        self.groups().find(|g| g.id == group_id)
    }

    /// Return a campaign with one headline's pin flag flipped.
    ///
    /// `self` is left untouched. The toggled group gets a fresh headline list;
    /// all other groups are shared with `self`.
    pub fn toggle_pin(&self, group_id: &str, headline_index: usize) -> Result<Campaign> {
        let position = self
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| AdForgeError::NotFound(format!("ad group '{}'", group_id)))?;

        let current = &self.groups[position];
        if headline_index >= current.headlines.len() {
            return Err(AdForgeError::NotFound(format!(
                "headline {} in ad group '{}' ({} headlines)",
                headline_index,
                group_id,
                current.headlines.len()
            )));
        }

        let headlines = current
            .headlines
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == headline_index {
                    Headline {
                        text: h.text.clone(),
                        is_pinned: !h.is_pinned,
                    }
                } else {
                    h.clone()
                }
            })
            .collect();

        let mut groups = self.groups.clone();
        groups[position] = Arc::new(AdGroup {
            headlines,
            ..AdGroup::clone(current)
        });

        Ok(Campaign { groups })
    }
}

impl FromIterator<AdGroup> for Campaign {
    fn from_iter<I: IntoIterator<Item = AdGroup>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
