//! OpenAI-compatible chat-completions client
//!
//! Implements the LlmClient trait for any endpoint speaking the OpenAI Chat
//! Completions wire format (Together.AI, OpenAI). One request, no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Chat-completions API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// The API key is resolved here so a missing key surfaces before any
    /// request is attempted.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(provider = %config.provider, model = %config.model, "from_config: called");
        let api_key = config.get_api_key()?;

        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            debug!(timeout_ms, "from_config: applying request timeout");
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        } else {
            debug!("from_config: using http client default timeout");
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the chat-completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        messages.extend(request.messages.iter().map(|msg| {
            serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content,
            })
        }));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    /// Parse the chat-completions response
    fn parse_response(&self, api_response: ChatResponse) -> Result<CompletionResponse, LlmError> {
        debug!(choices = api_response.choices.len(), "parse_response: called");
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content,
            stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("complete: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        debug!("complete: success");
        let api_response: ChatResponse = response.json().await?;
        self.parse_response(api_response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Chat-completions response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn client(max_tokens: u32) -> OpenAIClient {
        OpenAIClient {
            model: "meta-llama/Llama-3-8b-chat-hf".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.together.xyz".to_string(),
            http: Client::new(),
            max_tokens,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let request = CompletionRequest {
            system_prompt: "You are an analyst".to_string(),
            messages: vec![Message::user("Analyze this")],
            max_tokens: 1000,
            temperature: Some(0.7),
        };

        let body = client(8192).build_request_body(&request);

        assert_eq!(body["model"], "meta-llama/Llama-3-8b-chat-hf");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are an analyst");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Analyze this");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_temperature_omitted_when_unset() {
        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            max_tokens: 10,
            temperature: None,
        };
        let body = client(8192).build_request_body(&request);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_max_tokens_capped() {
        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            max_tokens: 5000,
            temperature: None,
        };

        let body = client(1000).build_request_body(&request);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_parse_response_takes_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"content": "{\"title\": \"A\"}"}, "finish_reason": "stop"},
                {"message": {"content": "ignored"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34}
        }"#;
        let api: ChatResponse = serde_json::from_str(json).unwrap();
        let resp = client(4000).parse_response(api).unwrap();
        assert_eq!(resp.content.as_deref(), Some("{\"title\": \"A\"}"));
        assert_eq!(resp.usage.total(), 46);
    }

    #[test]
    fn test_parse_response_without_choices_is_error() {
        let api: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(client(4000).parse_response(api).is_err());
    }
}
