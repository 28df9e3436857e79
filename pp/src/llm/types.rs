//! LLM request/response types for PaperPlan
//!
//! These types model a chat-completion exchange and are provider-agnostic
//! enough to back any OpenAI-compatible endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (rendered from a Handlebars template)
    pub system_prompt: String,

    /// User messages (a single analysis prompt in practice)
    pub messages: Vec<Message>,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,

    /// Sampling temperature, provider default when None
    pub temperature: Option<f32>,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

impl Role {
    /// Wire name used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage reported by the provider
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Build a plain text response (used by tests and mocks)
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
}

impl StopReason {
    /// Parse from an OpenAI-style finish_reason string
    pub fn from_finish_reason(s: Option<&str>) -> Self {
        debug!(?s, "StopReason::from_finish_reason: called");
        match s {
            Some("length") => {
                debug!("StopReason::from_finish_reason: MaxTokens");
                StopReason::MaxTokens
            }
            Some("content_filter") => {
                debug!("StopReason::from_finish_reason: ContentFilter");
                StopReason::ContentFilter
            }
            _ => {
                debug!("StopReason::from_finish_reason: defaulting to EndTurn");
                StopReason::EndTurn
            }
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert_eq!(msg.role.as_str(), "user");
    }

    #[test]
    fn test_stop_reason_from_finish_reason() {
        assert_eq!(StopReason::from_finish_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason(Some("content_filter")),
            StopReason::ContentFilter
        );
        assert_eq!(StopReason::from_finish_reason(None), StopReason::EndTurn);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 1200,
            output_tokens: 800,
        };
        assert_eq!(usage.total(), 2000);
    }

    #[test]
    fn test_completion_response_text() {
        let resp = CompletionResponse::text("{}");
        assert_eq!(resp.content.as_deref(), Some("{}"));
        assert_eq!(resp.stop_reason, StopReason::EndTurn);
    }
}
