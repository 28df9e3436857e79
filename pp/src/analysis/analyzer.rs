//! LLM-backed paper analyzer

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::fallback::{parse_fallback, transport_fallback};
use super::record::AnalysisRecord;
use crate::llm::{CompletionRequest, LlmClient, Message, StopReason};
use crate::prompts::{AnalysisPromptContext, PromptLoader};

/// Paper text beyond this many characters is cut before prompting
pub const MAX_PAPER_CHARS: usize = 8000;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Where an analysis record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Decoded from the model's reply
    Llm,
    /// The reply held no decodable JSON object
    ParseFallback,
    /// The API call failed
    TransportFallback,
}

impl AnalysisSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Llm)
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Llm => "llm",
            Self::ParseFallback => "parse-fallback",
            Self::TransportFallback => "transport-fallback",
        };
        write!(f, "{}", label)
    }
}

/// An analysis record tagged with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub record: AnalysisRecord,
    pub source: AnalysisSource,
}

/// Sends paper text to the model and turns the reply into an `AnalysisRecord`
pub struct PaperAnalyzer {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    temperature: f32,
}

impl PaperAnalyzer {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        debug!(model = client.model(), "PaperAnalyzer::new: called");
        Self {
            client,
            prompts,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the sampling parameters sent with the request
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        debug!(%max_tokens, %temperature, "PaperAnalyzer::with_sampling: called");
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Analyze paper text; never fails, degrading to a canned record instead
    pub async fn analyze(&self, text: &str) -> AnalysisOutcome {
        debug!(text_len = text.len(), "analyze: called");

        let request = match self.build_request(text) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to build analysis prompt: {}", e);
                return AnalysisOutcome {
                    record: transport_fallback(),
                    source: AnalysisSource::TransportFallback,
                };
            }
        };

        info!("Requesting analysis from {}", self.client.model());
        match self.client.complete(request).await {
            Ok(response) => {
                debug!(tokens = response.usage.total(), "analyze: got response");
                if let Some(message) = stop_reason_warning(response.stop_reason, self.max_tokens) {
                    warn!("{}", message);
                }
                Self::parse_reply(response.content.as_deref().unwrap_or_default())
            }
            Err(e) => {
                warn!("Analysis request failed, using fallback analysis: {}", e);
                AnalysisOutcome {
                    record: transport_fallback(),
                    source: AnalysisSource::TransportFallback,
                }
            }
        }
    }

    fn build_request(&self, text: &str) -> eyre::Result<CompletionRequest> {
        debug!("build_request: called");
        let context = AnalysisPromptContext::new(truncate_paper(text));
        Ok(CompletionRequest {
            system_prompt: self.prompts.analysis_system_prompt()?,
            messages: vec![Message::user(self.prompts.analysis_prompt(&context)?)],
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        })
    }

    /// Decode the first JSON object embedded in a reply
    pub fn parse_reply(reply: &str) -> AnalysisOutcome {
        debug!(reply_len = reply.len(), "parse_reply: called");
        let Some(value) = first_json_object(reply) else {
            warn!("Model reply contained no JSON object, using parse fallback");
            return AnalysisOutcome {
                record: parse_fallback(reply),
                source: AnalysisSource::ParseFallback,
            };
        };

        match AnalysisRecord::from_value(value) {
            Ok(record) => {
                info!("Parsed analysis for '{}'", record.title);
                AnalysisOutcome {
                    record,
                    source: AnalysisSource::Llm,
                }
            }
            Err(e) => {
                warn!("Model reply JSON did not decode ({}), using parse fallback", e);
                AnalysisOutcome {
                    record: parse_fallback(reply),
                    source: AnalysisSource::ParseFallback,
                }
            }
        }
    }
}

/// The first `{` that opens a complete JSON object, decoded; trailing text is ignored
fn first_json_object(reply: &str) -> Option<Value> {
    reply.match_indices('{').find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&reply[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value @ Value::Object(_))) => Some(value),
            _ => None,
        }
    })
}

/// Why a reply may be incomplete, when the provider says it stopped early
fn stop_reason_warning(reason: StopReason, max_tokens: u32) -> Option<String> {
    match reason {
        StopReason::EndTurn => None,
        StopReason::MaxTokens => Some(format!(
            "Model reply hit the {} token limit and may be truncated",
            max_tokens
        )),
        StopReason::ContentFilter => Some("Model reply was cut short by the provider's content filter".to_string()),
    }
}

/// Cut paper text to `MAX_PAPER_CHARS`, marking the cut with `...`
pub fn truncate_paper(text: &str) -> String {
    match text.char_indices().nth(MAX_PAPER_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
