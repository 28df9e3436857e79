//! PaperPlan - research paper to implementation plan
//!
//! PaperPlan reads a research paper PDF, asks a language model for a
//! structured analysis, and turns that analysis into a phased project plan
//! with Mermaid diagrams and markdown/HTML reports.
//!
//! # Pipeline
//!
//! 1. [`extract`] - PDF text and metadata
//! 2. [`analysis`] - one LLM call, with tagged fallbacks
//! 3. [`plan`] - deterministic phase scaling and catalog lookups
//! 4. [`render`] - diagrams, reports and terminal views
//!
//! [`pipeline`] wires stages 1-4 together and [`workspace`] writes the
//! artifacts.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and chat-completions implementation
//! - [`prompts`] - Handlebars prompt templates
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod plan;
pub mod prompts;
pub mod render;
pub mod workspace;

// Re-export commonly used types
pub use analysis::{AnalysisOutcome, AnalysisRecord, AnalysisSource, PaperAnalyzer};
pub use config::{Config, LlmConfig};
pub use extract::{PdfMetadata, TextExtractor, extract_metadata};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use pipeline::{Pipeline, PipelineError, PipelineResult};
pub use plan::{Complexity, DomainFamily, PlanError, PlanGenerator, ProjectPlan, ProjectSettings};
pub use prompts::PromptLoader;
pub use render::{DiagramSet, View, generate_diagrams, generate_html_report, generate_markdown_report};
pub use workspace::Workspace;
