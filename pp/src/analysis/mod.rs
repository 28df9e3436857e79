//! Paper analysis
//!
//! Turns extracted paper text into an [`AnalysisRecord`] through one LLM call,
//! with tagged fallbacks when the call or its reply goes wrong.

mod analyzer;
mod fallback;
mod record;

pub use analyzer::{
    AnalysisOutcome, AnalysisSource, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MAX_PAPER_CHARS, PaperAnalyzer,
    truncate_paper,
};
pub use fallback::{parse_fallback, transport_fallback};
pub use record::{AnalysisRecord, RawAnalysis, RawTechnicalRequirements, TechnicalRequirements};
