//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Ad copy constants
pub mod ad {
    /// Headlines requested per ad group
    pub const HEADLINES_PER_GROUP: usize = 8;

    /// Descriptions requested per ad group
    pub const DESCRIPTIONS_PER_GROUP: usize = 3;

    /// Minimum headlines that must contain a keyword of their group
    pub const MIN_KEYWORD_HEADLINES: usize = 3;

    /// Soft headline length limit (characters)
    pub const HEADLINE_MAX_CHARS: usize = 30;

    /// Soft description length limit (characters)
    pub const DESCRIPTION_MAX_CHARS: usize = 90;
}

/// Generation settings defaults and input ranges
pub mod settings {
    use std::ops::RangeInclusive;

    pub const DEFAULT_NUM_AD_GROUPS: u32 = 20;
    pub const DEFAULT_MIN_KEYWORDS: u32 = 3;
    pub const DEFAULT_MAX_KEYWORDS: u32 = 10;

    /// Accepted range for the number of ad groups
    pub const NUM_AD_GROUPS_RANGE: RangeInclusive<u32> = 5..=50;

    /// Accepted range for the minimum keywords per group
    pub const MIN_KEYWORDS_RANGE: RangeInclusive<u32> = 2..=10;

    /// Accepted range for the maximum keywords per group
    pub const MAX_KEYWORDS_RANGE: RangeInclusive<u32> = 5..=20;
}

/// LLM provider constants
pub mod provider {
    /// Environment variable holding the Gemini API key
    pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

    /// Environment variable holding the OpenRouter API key
    pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

    pub const GEMINI_PRIMARY_MODEL: &str = "gemini-2.5-pro";
    pub const GEMINI_FALLBACK_MODEL: &str = "gemini-2.5-flash";
    pub const OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";

    /// Thinking token budget hint sent to Gemini
    pub const DEFAULT_THINKING_BUDGET: u32 = 32_768;

    /// Largest thinking budget the flash model accepts
    pub const FLASH_MAX_THINKING_BUDGET: u32 = 24_576;

    /// Referer sent to OpenRouter for app attribution
    pub const DEFAULT_REFERER: &str = "https://github.com/adforge/adforge";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
}

/// Spreadsheet export constants
pub mod export {
    /// Default export file name
    pub const FILE_NAME: &str = "Google-Ads-Campaign.xlsx";

    /// Worksheet name
    pub const SHEET_NAME: &str = "Ad Campaign";

    /// Header row
    pub const HEADERS: [&str; 6] = [
        "Ad Group",
        "Keywords",
        "Headline",
        "Headline Length",
        "Description",
        "Description Length",
    ];

    /// Column widths in characters, one per header
    pub const COLUMN_WIDTHS: [f64; 6] = [30.0, 40.0, 40.0, 15.0, 60.0, 18.0];
}
