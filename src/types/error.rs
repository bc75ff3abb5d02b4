//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Kinds
//!
//! - **Config**: no usable credential or invalid configuration (fatal)
//! - **Transport**: network or HTTP failure for one provider attempt
//! - **ProviderResponse**: the provider answered but reported an error
//! - **MalformedResponse / SchemaViolation**: the provider answered with
//!   something the normalizer cannot turn into ad groups
//! - **Provider**: aggregate raised once every candidate in the chain failed
//!
//! Per-attempt errors are recovered inside the provider chain. Only the
//! aggregate (wrapping the last attempt's error) reaches the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdForgeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    /// Network failure or non-2xx status for a single attempt
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    /// Provider returned 2xx but reported an error or no usable content
    #[error("{provider} returned an error: {message}")]
    ProviderResponse { provider: String, message: String },

    /// Every configured provider failed
    #[error("All models failed after {attempts} attempt(s). Last error: {last}")]
    Provider {
        attempts: usize,
        last: Box<AdForgeError>,
    },

    // -------------------------------------------------------------------------
    // Response Errors
    // -------------------------------------------------------------------------
    #[error("The AI returned an invalid data format: {0}")]
    MalformedResponse(String),

    #[error("Invalid structure for ad group at index {index}: {field}")]
    SchemaViolation { index: usize, field: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported file type. Please upload a CSV or XLSX file. (got {0})")]
    UnsupportedFileType(String),

    #[error("Error parsing file: {0}")]
    Ingest(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AdForgeError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl AdForgeError {
    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn provider_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn schema_violation(index: usize, field: impl Into<String>) -> Self {
        Self::SchemaViolation {
            index,
            field: field.into(),
        }
    }

    /// The last underlying error for aggregate failures, `self` otherwise
    pub fn root(&self) -> &AdForgeError {
        match self {
            Self::Provider { last, .. } => last.root(),
            other => other,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
