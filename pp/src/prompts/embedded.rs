//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// System prompt framing the model as a research analyst
pub const ANALYSIS_SYSTEM: &str = include_str!("../../prompts/analysis-system.pmt");

/// User prompt requesting the structured JSON analysis
pub const ANALYSIS: &str = include_str!("../../prompts/analysis.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "analysis-system" => {
            debug!("get_embedded: matched analysis-system");
            Some(ANALYSIS_SYSTEM)
        }
        "analysis" => {
            debug!("get_embedded: matched analysis");
            Some(ANALYSIS)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
