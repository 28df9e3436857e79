//! Workspace directory layout and artifact output

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::AnalysisRecord;
use crate::plan::ProjectPlan;
use crate::render::{DiagramSet, generate_html_report, generate_markdown_report_at};

pub const UPLOADS_DIR: &str = "uploads";
pub const OUTPUTS_DIR: &str = "outputs";
pub const DIAGRAMS_DIR: &str = "diagrams";
pub const REPORTS_DIR: &str = "reports";

/// A workspace root holding uploads/, outputs/, diagrams/ and reports/
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR)
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join(OUTPUTS_DIR)
    }

    pub fn diagrams_dir(&self) -> PathBuf {
        self.root.join(DIAGRAMS_DIR)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }

    /// Create the four directories; existing ones are left alone
    pub fn ensure_layout(&self) -> Result<()> {
        debug!(root = ?self.root, "ensure_layout: called");
        for dir in [
            self.uploads_dir(),
            self.outputs_dir(),
            self.diagrams_dir(),
            self.reports_dir(),
        ] {
            fs::create_dir_all(&dir).context(format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// Copy an input file verbatim to `uploads/<file name>`, replacing any previous copy
    pub fn store_upload(&self, source: &Path) -> Result<PathBuf> {
        debug!(?source, "store_upload: called");
        let name = source
            .file_name()
            .ok_or_else(|| eyre!("Input path has no file name: {}", source.display()))?;
        let dest = self.uploads_dir().join(name);

        // Copying a file onto itself would truncate it
        if let (Ok(a), Ok(b)) = (source.canonicalize(), dest.canonicalize())
            && a == b
        {
            debug!("store_upload: source already in uploads");
            return Ok(dest);
        }

        fs::copy(source, &dest).context(format!(
            "Failed to copy {} to {}",
            source.display(),
            dest.display()
        ))?;
        info!("Stored upload at {}", dest.display());
        Ok(dest)
    }

    /// Write analysis, plan, diagrams and both reports; returns the paths written
    pub fn write_artifacts(
        &self,
        analysis: &AnalysisRecord,
        plan: &ProjectPlan,
        diagrams: &DiagramSet,
        now: DateTime<Local>,
    ) -> Result<Vec<PathBuf>> {
        debug!("write_artifacts: called");
        let mut written = Vec::new();

        written.push(write_json(&self.outputs_dir().join("analysis.json"), analysis)?);
        written.push(write_json(&self.outputs_dir().join("project_plan.json"), plan)?);

        for (id, text) in diagrams.iter() {
            let path = self.diagrams_dir().join(id);
            fs::write(&path, text).context(format!("Failed to write {}", path.display()))?;
            written.push(path);
        }

        let stem = format!("implementation_guide_{}", now.format("%Y%m%d_%H%M%S"));

        let markdown_path = self.reports_dir().join(format!("{}.md", stem));
        let markdown = generate_markdown_report_at(plan, analysis, now);
        fs::write(&markdown_path, markdown).context(format!("Failed to write {}", markdown_path.display()))?;
        written.push(markdown_path);

        let html_path = self.reports_dir().join(format!("{}.html", stem));
        let html = generate_html_report(plan, diagrams)?;
        fs::write(&html_path, html).context(format!("Failed to write {}", html_path.display()))?;
        written.push(html_path);

        info!("Wrote {} artifacts under {}", written.len(), self.root.display());
        Ok(written)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
