//! LLM Client module for PaperPlan
//!
//! Provides the chat-completion seam used by the paper analyzer.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "together" and "openai"; both speak the chat-completions format.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "together" | "openai" => {
            debug!("create_client: creating chat-completions client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "acme".to_string(),
            api_key: Some("k".to_string()),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::UnknownProvider(p) if p == "acme"));
    }

    #[test]
    fn test_create_client_with_explicit_key() {
        let config = LlmConfig {
            api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        };
        let client = create_client(&config).unwrap();
        assert_eq!(client.model(), config.model);
    }

    #[test]
    fn test_create_client_missing_key() {
        let config = LlmConfig {
            api_key: None,
            api_key_env: "PAPERPLAN_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }
}
