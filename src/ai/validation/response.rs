//! Response Normalization
//!
//! Turns the raw text of a provider response into a typed [`Campaign`].
//!
//! Checks performed:
//! - the payload is JSON and (after unwrapping) an array
//! - every element carries `name`, `keywords`, `headlines`, `descriptions`
//! - each of those has the expected JSON type
//!
//! Headline and description counts and lengths are not checked. The limits
//! are instructions to the model; over-limit copy is flagged when displayed.

use serde_json::{Map, Value};
use tracing::debug;

use super::json_repair::extract_json_from_response;
use crate::types::{AdForgeError, AdGroup, Campaign, Description, Headline, Result};

const REQUIRED_FIELDS: [&str; 4] = ["name", "keywords", "headlines", "descriptions"];

/// Parse and validate a provider response into ad groups
pub fn normalize_response(raw: &str) -> Result<Campaign> {
    let value = extract_json_from_response(raw)?;
    let items = into_group_array(value)?;

    debug!(groups = items.len(), "Normalizing ad groups");

    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_group(index, item))
        .collect::<Result<Vec<_>>>()
        .map(Campaign::new)
}

/// Accept a bare array, or an object wrapping exactly one array field.
///
/// JSON-object response modes cannot return a top-level array, so models in
/// that mode answer `{"adGroups": [...]}` or similar.
fn into_group_array(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => Ok(items),
                _ => Err(AdForgeError::MalformedResponse(
                    "expected a JSON array of ad groups, got an object".to_string(),
                )),
            }
        }
        other => Err(AdForgeError::MalformedResponse(format!(
            "expected a JSON array of ad groups, got {}",
            json_type_name(&other)
        ))),
    }
}

fn normalize_group(index: usize, item: &Value) -> Result<AdGroup> {
    let obj = item
        .as_object()
        .ok_or_else(|| AdForgeError::schema_violation(index, "expected an object"))?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| is_absent(obj, f)) {
        return Err(AdForgeError::schema_violation(
            index,
            format!("missing field '{}'", missing),
        ));
    }

    let name = obj["name"]
        .as_str()
        .ok_or_else(|| AdForgeError::schema_violation(index, "'name' must be a string"))?
        .to_string();
    let keywords = string_array(obj, "keywords", index)?;
    let headlines = string_array(obj, "headlines", index)?;
    let descriptions = string_array(obj, "descriptions", index)?;

    Ok(AdGroup {
        id: AdGroup::derive_id(&name, index),
        name,
        keywords,
        headlines: headlines.into_iter().map(Headline::new).collect(),
        descriptions: descriptions.into_iter().map(Description::new).collect(),
    })
}

/// Missing, null, or an empty name all count as absent
fn is_absent(obj: &Map<String, Value>, field: &str) -> bool {
    match obj.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn string_array(obj: &Map<String, Value>, field: &str, index: usize) -> Result<Vec<String>> {
    let items = obj[field].as_array().ok_or_else(|| {
        AdForgeError::schema_violation(index, format!("'{}' must be an array", field))
    })?;

    items
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                AdForgeError::schema_violation(
                    index,
                    format!("'{}' must contain only strings", field),
                )
            })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
