//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
///
/// Every variant is a transport-level failure from the analyzer's point of
/// view: none of them are retried, all of them trigger the canned fallback
/// analysis.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not found. Set the {env} environment variable or pass --api-key")]
    MissingApiKey { env: String },

    #[error("Unknown LLM provider: '{0}'. Supported: together, openai")]
    UnknownProvider(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
