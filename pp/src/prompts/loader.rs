//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;

/// Context for rendering the analysis prompt
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisPromptContext {
    /// Paper text, already truncated by the caller
    pub paper_text: String,
}

impl AnalysisPromptContext {
    pub fn new(paper_text: impl Into<String>) -> Self {
        let paper_text = paper_text.into();
        debug!(paper_text_len = paper_text.len(), "AnalysisPromptContext::new: called");
        Self { paper_text }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.paperplan/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at `base`
    ///
    /// # Arguments
    /// * `base` - Directory used to find `.paperplan/prompts/` and `prompts/`
    pub fn new(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        debug!(?base, "PromptLoader::new: called");
        let user_dir = base.join(".paperplan/prompts");
        let repo_dir = base.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
            repo_dir: if repo_dir_exists { Some(repo_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    // Prompts are plain text; HTML escaping would mangle quotes in paper text.
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.paperplan/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found on disk");
        }

        debug!("PromptLoader::load_template: trying embedded fallback");
        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// System prompt for the analysis call
    pub fn analysis_system_prompt(&self) -> Result<String> {
        debug!("PromptLoader::analysis_system_prompt: called");
        Ok(self.load_template("analysis-system")?.trim_end().to_string())
    }

    /// User prompt for the analysis call, with the paper text substituted
    pub fn analysis_prompt(&self, context: &AnalysisPromptContext) -> Result<String> {
        debug!("PromptLoader::analysis_prompt: called");
        self.render("analysis", context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_substitutes_text() {
        let loader = PromptLoader::embedded_only();
        let ctx = AnalysisPromptContext::new("We propose the \"Transformer\" <model>.");
        let prompt = loader.analysis_prompt(&ctx).unwrap();

        assert!(prompt.contains("We propose the \"Transformer\" <model>."));
        assert!(!prompt.contains("{{paper_text}}"));
        assert!(prompt.contains("\"future_work\""));
    }

    #[test]
    fn test_analysis_system_prompt() {
        let loader = PromptLoader::embedded_only();
        let system = loader.analysis_system_prompt().unwrap();
        assert!(system.starts_with("You are an expert research analyst"));
        assert!(system.ends_with("structured analysis."));
    }

    #[test]
    fn test_user_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let user_dir = dir.path().join(".paperplan/prompts");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("analysis.pmt"), "Summarize: {{paper_text}}").unwrap();

        let loader = PromptLoader::new(dir.path());
        let prompt = loader.analysis_prompt(&AnalysisPromptContext::new("text")).unwrap();
        assert_eq!(prompt, "Summarize: text");

        // No override for the system prompt: embedded fallback
        assert!(loader.analysis_system_prompt().unwrap().contains("research analyst"));
    }

    #[test]
    fn test_repo_dir_used_when_no_user_override() {
        let dir = tempfile::tempdir().unwrap();
        let repo_dir = dir.path().join("prompts");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join("analysis-system.pmt"), "Repo system prompt\n").unwrap();

        let loader = PromptLoader::new(dir.path());
        assert_eq!(loader.analysis_system_prompt().unwrap(), "Repo system prompt");
    }

    #[test]
    fn test_prompt_loader_unknown_template() {
        let loader = PromptLoader::embedded_only();
        let result = loader.load_template("nonexistent-template");
        assert!(result.is_err());
    }
}
