//! AI Response Validation
//!
//! Boundary between untyped provider output and the typed campaign model.
//! Nothing past this module sees `serde_json::Value`.

mod json_repair;
mod response;

pub use json_repair::extract_json_from_response;
pub use response::normalize_response;
