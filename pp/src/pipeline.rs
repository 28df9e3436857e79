//! End-to-end pipeline: PDF to analysis, plan and diagrams

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::analysis::{AnalysisRecord, AnalysisSource, PaperAnalyzer};
use crate::extract::TextExtractor;
use crate::plan::{PlanGenerator, ProjectPlan, ProjectSettings};
use crate::render::{DiagramSet, generate_diagrams};

/// Errors that stop a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No text could be extracted from {}", path.display())]
    ExtractionFailed { path: PathBuf },
}

/// Everything one run produced; built once, never mutated
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// File name of the input PDF
    pub filename: String,
    pub analysis: AnalysisRecord,
    pub analysis_source: AnalysisSource,
    pub plan: ProjectPlan,
    pub diagrams: DiagramSet,
}

/// Extractor, analyzer and generator wired together
pub struct Pipeline {
    extractor: TextExtractor,
    analyzer: PaperAnalyzer,
    generator: PlanGenerator,
}

impl Pipeline {
    pub fn new(extractor: TextExtractor, analyzer: PaperAnalyzer, generator: PlanGenerator) -> Self {
        debug!("Pipeline::new: called");
        Self {
            extractor,
            analyzer,
            generator,
        }
    }

    /// Run every stage for one PDF
    ///
    /// Fails only when extraction yields no text, in which case the analyzer
    /// is never called. Analyzer problems degrade to a fallback analysis.
    pub async fn run(&self, pdf: &Path, settings: &ProjectSettings) -> Result<PipelineResult, PipelineError> {
        debug!(?pdf, "Pipeline::run: called");
        let filename = pdf
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| pdf.display().to_string());

        info!("Extracting text from {}", filename);
        let text = self.extractor.extract_text(pdf);
        if text.is_empty() {
            debug!("Pipeline::run: empty extraction, halting");
            return Err(PipelineError::ExtractionFailed { path: pdf.to_path_buf() });
        }

        let outcome = self.analyzer.analyze(&text).await;
        info!("Analysis source: {}", outcome.source);

        let plan = self.generator.generate(&outcome.record, settings);
        let diagrams = generate_diagrams(&plan);
        info!(
            "Generated {} phases over {} and {} diagrams",
            plan.phases.len(),
            plan.timeline.total_duration,
            diagrams.len()
        );

        Ok(PipelineResult {
            filename,
            analysis: outcome.record,
            analysis_source: outcome.source,
            plan,
            diagrams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractError, TextSource};
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use crate::plan::Complexity;
    use crate::prompts::PromptLoader;
    use std::sync::Arc;

    struct StaticSource(&'static str);

    impl TextSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        fn extract(&self, _path: &Path) -> Result<String, ExtractError> {
            Ok(self.0.to_string())
        }
    }

    fn pipeline(text: &'static str, client: Arc<MockLlmClient>) -> Pipeline {
        let extractor = TextExtractor::with_sources(Box::new(StaticSource(text)), Box::new(StaticSource(text)));
        let analyzer = PaperAnalyzer::new(client, PromptLoader::embedded_only());
        Pipeline::new(extractor, analyzer, PlanGenerator::new())
    }

    fn settings() -> ProjectSettings {
        ProjectSettings::new(26, 6, Complexity::Advanced).unwrap()
    }

    #[tokio::test]
    async fn test_empty_extraction_halts_before_analysis() {
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text("{}")]));
        let result = pipeline("   \n\t ", client.clone())
            .run(Path::new("uploads/empty.pdf"), &settings())
            .await;

        assert!(matches!(result, Err(PipelineError::ExtractionFailed { .. })));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_full_run() {
        let reply = r#"{"title": "Deep Residual Learning", "domain": "Computer Vision", "key_concepts": ["Residual connections"]}"#;
        let client = Arc::new(MockLlmClient::new(vec![CompletionResponse::text(reply)]));
        let result = pipeline("We present a residual learning framework.", client.clone())
            .run(Path::new("uploads/resnet.pdf"), &settings())
            .await
            .unwrap();

        assert_eq!(result.filename, "resnet.pdf");
        assert_eq!(result.analysis_source, AnalysisSource::Llm);
        assert_eq!(result.plan.project_overview.title, "Deep Residual Learning - Project Plan");
        let months: Vec<u32> = result.plan.phases.iter().map(|p| p.months()).collect();
        assert_eq!(months, vec![5, 10, 7, 7, 5]);
        assert_eq!(result.diagrams.len(), 4);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_still_produces_plan() {
        let client = Arc::new(MockLlmClient::failing());
        let result = pipeline("Some paper text", client)
            .run(Path::new("paper.pdf"), &settings())
            .await
            .unwrap();

        assert_eq!(result.analysis_source, AnalysisSource::TransportFallback);
        assert_eq!(result.analysis.title, "Research Paper");
        assert_eq!(result.plan.phases.len(), 5);
    }
}
