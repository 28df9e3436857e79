//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// The analyzer sends exactly one request per paper. Implementations must not
/// retry; a failed call is reported to the caller, which degrades to a canned
/// analysis.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (waits until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
