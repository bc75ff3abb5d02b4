//! JSON Extraction
//!
//! Pulls the JSON payload out of an LLM response.
//!
//! Handles the formatting noise models add even when asked not to:
//! - Markdown code fence wrapping (```json ... ```), including the
//!   single-line form
//! - Byte order mark and surrounding whitespace
//!
//! Nothing beyond that is repaired. Truncated or otherwise invalid JSON is a
//! failed attempt and the provider chain moves on.

use serde_json::Value;
use tracing::debug;

use crate::types::{AdForgeError, Result};

/// Parse the JSON payload of an LLM response
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    let cleaned = preprocess(content);

    serde_json::from_str::<Value>(&cleaned).map_err(|e| {
        debug!("Response is not valid JSON: {}", e);
        AdForgeError::MalformedResponse(format!(
            "{} (content preview: {}...)",
            e,
            cleaned.chars().take(200).collect::<String>()
        ))
    })
}

/// Preprocess raw input
fn preprocess(raw: &str) -> String {
    let s = raw.trim().trim_start_matches('\u{feff}');
    strip_code_fences(s).trim().to_string()
}

/// Strip markdown code fences
fn strip_code_fences(s: &str) -> &str {
    let mut result = s;

    // Opening fence and its language tag, with or without a newline after
    if let Some(rest) = result.strip_prefix("```") {
        result = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }

    if let Some(stripped) = result.trim_end().strip_suffix("```") {
        result = stripped;
    }

    result
}
