//! Terminal result views
//!
//! Five named views over one pipeline result, printed by the `pp` binary.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use colored::Colorize;
use tracing::debug;

use super::diagrams::{DiagramSet, is_graph_markup, title_case};
use crate::analysis::{AnalysisRecord, AnalysisSource};
use crate::plan::ProjectPlan;

/// A named result view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Roadmap,
    Implementation,
    Diagrams,
    Downloads,
}

impl View {
    pub const ALL: [View; 5] = [
        Self::Overview,
        Self::Roadmap,
        Self::Implementation,
        Self::Diagrams,
        Self::Downloads,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Roadmap => "roadmap",
            Self::Implementation => "implementation",
            Self::Diagrams => "diagrams",
            Self::Downloads => "downloads",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "View::from_str: called");
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown view: {}. Use: overview, roadmap, implementation, diagrams, or downloads",
                    s
                )
            })
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a view may show
pub struct ViewData<'a> {
    pub analysis: &'a AnalysisRecord,
    pub analysis_source: Option<AnalysisSource>,
    pub plan: &'a ProjectPlan,
    pub diagrams: &'a DiagramSet,
    /// Files written for this run
    pub artifacts: &'a [PathBuf],
}

/// Render one view as terminal text
pub fn render_view(view: View, data: &ViewData<'_>) -> String {
    debug!(%view, "render_view: called");
    match view {
        View::Overview => overview(data),
        View::Roadmap => roadmap(data.plan),
        View::Implementation => implementation(data.plan),
        View::Diagrams => diagrams(data.diagrams),
        View::Downloads => downloads(data.artifacts),
    }
}

/// Prose form of a snake_case key: `data_layer` becomes `Data Layer`
fn label(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

fn heading(out: &mut String, text: &str) {
    out.push_str(&format!("\n{}\n", text.bold().underline()));
}

fn field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{} {}\n", format!("{}:", label).bold(), value));
}

fn overview(data: &ViewData<'_>) -> String {
    let analysis = data.analysis;
    let mut out = String::new();

    heading(&mut out, "Paper Summary");
    if let Some(source) = data.analysis_source.filter(AnalysisSource::is_fallback) {
        out.push_str(&format!("{} analysis degraded ({})\n", "!".yellow(), source));
    }
    field(&mut out, "Title", &analysis.title);
    field(&mut out, "Authors", &analysis.authors);
    field(&mut out, "Domain", &analysis.domain);
    field(&mut out, "Publication Year", &analysis.year);
    field(&mut out, "Research Type", &analysis.research_type);
    field(&mut out, "Complexity Level", &analysis.complexity);

    heading(&mut out, "Abstract");
    out.push_str(&analysis.abstract_text);
    out.push('\n');

    if !analysis.key_concepts.is_empty() {
        heading(&mut out, "Key Concepts");
        for (i, concept) in analysis.key_concepts.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, concept));
        }
    }

    let requirements = &analysis.technical_requirements;
    let categories = [
        ("programming_languages", &requirements.programming_languages),
        ("frameworks", &requirements.frameworks),
        ("hardware", &requirements.hardware),
        ("datasets", &requirements.datasets),
    ];
    if categories.iter().any(|(_, items)| !items.is_empty()) {
        heading(&mut out, "Technical Requirements");
        for (category, items) in categories.iter().filter(|(_, items)| !items.is_empty()) {
            out.push_str(&format!("{}\n", format!("{}:", label(category)).bold()));
            for item in items.iter() {
                out.push_str(&format!("  - {}\n", item));
            }
        }
    }
    out
}

fn roadmap(plan: &ProjectPlan) -> String {
    let mut out = String::new();

    heading(&mut out, "Project Implementation Roadmap");
    let name_width = plan.phases.iter().map(|p| p.name.len()).max().unwrap_or(4).max(4);
    out.push_str(&format!(
        "{:<8} {:<name_width$} {:<10} {:>5} {:>5}\n",
        "Phase", "Name", "Duration", "Start", "End"
    ));
    for (i, phase) in plan.phases.iter().enumerate() {
        out.push_str(&format!(
            "{:<8} {:<name_width$} {:<10} {:>5} {:>5}\n",
            format!("Phase {}", i + 1),
            phase.name,
            phase.duration,
            phase.start_month,
            phase.end_month
        ));
    }
    out.push_str(&format!("{} {}\n", "Total:".bold(), plan.timeline.total_duration));

    heading(&mut out, "Phase Details");
    for (i, phase) in plan.phases.iter().enumerate() {
        out.push_str(&format!("\n{}\n", format!("Phase {}: {}", i + 1, phase.name).cyan()));
        field(&mut out, "Duration", &phase.duration);
        field(&mut out, "Objectives", &phase.objectives);
        for (label, items) in [
            ("Key Tasks", &phase.tasks),
            ("Deliverables", &phase.deliverables),
            ("Success Criteria", &phase.success_criteria),
        ] {
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("{}\n", format!("{}:", label).bold()));
            for item in items {
                out.push_str(&format!("  - {}\n", item));
            }
        }
    }
    out
}

fn implementation(plan: &ProjectPlan) -> String {
    let mut out = String::new();

    heading(&mut out, "Programming Stack");
    for (category, items) in &plan.technical_stack {
        out.push_str(&format!("  - {} {}\n", format!("{}:", label(category)).bold(), items));
    }

    heading(&mut out, "System Architecture");
    for (component, description) in &plan.architecture {
        field(&mut out, &label(component), description);
    }

    heading(&mut out, "Resource Requirements");
    for (resource, details) in &plan.resources {
        field(&mut out, &label(resource), details);
    }

    heading(&mut out, "Risk Mitigation");
    for risk in &plan.risks {
        out.push_str(&format!("  - {} {}\n", "Risk:".bold(), risk.risk));
        out.push_str(&format!("    {} {}\n", "Mitigation:".bold(), risk.mitigation));
    }
    out
}

fn diagrams(diagrams: &DiagramSet) -> String {
    let mut out = String::new();

    heading(&mut out, "Project Workflow Diagrams");
    for (id, text) in diagrams.iter() {
        out.push_str(&format!("\n{}\n", title_case(&id.replace('_', " ")).bold()));
        if is_graph_markup(id) {
            out.push_str(&format!("```mermaid\n{}\n```\n", text.trim_end()));
        } else {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

fn downloads(artifacts: &[PathBuf]) -> String {
    let mut out = String::new();

    heading(&mut out, "Generated Reports");
    if artifacts.is_empty() {
        out.push_str("No files were written for this run\n");
    }
    for path in artifacts {
        out.push_str(&format!("{} {}\n", "✓".green(), path.display()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RawAnalysis;
    use crate::plan::{Complexity, PlanGenerator, ProjectSettings};
    use crate::render::generate_diagrams;

    fn fixture() -> (AnalysisRecord, ProjectPlan, DiagramSet) {
        let analysis = AnalysisRecord {
            title: "YOLO".to_string(),
            domain: "Computer Vision".to_string(),
            key_concepts: vec!["Object detection".to_string()],
            ..AnalysisRecord::from_raw(RawAnalysis::default())
        };
        let settings = ProjectSettings::new(12, 3, Complexity::Beginner).unwrap();
        let plan = PlanGenerator::new().generate(&analysis, &settings);
        let diagrams = generate_diagrams(&plan);
        (analysis, plan, diagrams)
    }

    fn render(view: View, artifacts: &[PathBuf], source: Option<AnalysisSource>) -> String {
        colored::control::set_override(false);
        let (analysis, plan, diagrams) = fixture();
        let data = ViewData {
            analysis: &analysis,
            analysis_source: source,
            plan: &plan,
            diagrams: &diagrams,
            artifacts,
        };
        render_view(view, &data)
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("Roadmap".parse::<View>().unwrap(), View::Roadmap);
        assert_eq!("downloads".parse::<View>().unwrap(), View::Downloads);
        assert!("summary".parse::<View>().is_err());
        for view in View::ALL {
            assert_eq!(view.to_string().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn test_overview_view() {
        let out = render(View::Overview, &[], Some(AnalysisSource::Llm));
        assert!(out.contains("Title: YOLO"));
        assert!(out.contains("1. Object detection"));
        assert!(!out.contains("degraded"));
        assert!(!out.contains("Technical Requirements"));
    }

    #[test]
    fn test_overview_requirement_labels_use_spaces() {
        colored::control::set_override(false);
        let (mut analysis, plan, diagrams) = fixture();
        analysis.technical_requirements.programming_languages = vec!["Python".to_string()];
        analysis.technical_requirements.frameworks = vec!["PyTorch".to_string()];
        let data = ViewData {
            analysis: &analysis,
            analysis_source: None,
            plan: &plan,
            diagrams: &diagrams,
            artifacts: &[],
        };

        let out = render_view(View::Overview, &data);
        assert!(out.contains("Technical Requirements"));
        assert!(out.contains("Programming Languages:\n  - Python\n"));
        assert!(out.contains("Frameworks:\n  - PyTorch\n"));
        assert!(!out.contains("Programming_Languages"));
    }

    #[test]
    fn test_overview_flags_fallback() {
        let out = render(View::Overview, &[], Some(AnalysisSource::ParseFallback));
        assert!(out.contains("analysis degraded (parse-fallback)"));
    }

    #[test]
    fn test_roadmap_view() {
        let out = render(View::Roadmap, &[], None);
        assert!(out.contains("Environment and Data Setup"));
        assert!(out.contains("Phase 1: Environment and Data Setup"));
        assert!(out.contains("  - Implement Object detection functionality\n"));
    }

    #[test]
    fn test_implementation_view() {
        let out = render(View::Implementation, &[], None);
        assert!(out.contains("Cv Libraries: PIL, scikit-image, albumentations"));
        assert!(!out.contains("_Libraries"));
        assert!(out.contains("Hardware: Standard development machines, GPU recommended"));
        assert!(out.contains("Risk: Data quality and availability issues"));
    }

    #[test]
    fn test_diagrams_view_fences_mermaid() {
        let out = render(View::Diagrams, &[], None);
        assert!(out.contains("Gantt Chart.Md"));
        assert!(out.contains("```mermaid\ngantt\n"));
        assert_eq!(out.matches("```mermaid").count(), 4);
    }

    #[test]
    fn test_downloads_view() {
        let empty = render(View::Downloads, &[], None);
        assert!(empty.contains("No files were written"));

        let paths = vec![PathBuf::from("reports/implementation_guide_20240301_093000.md")];
        let out = render(View::Downloads, &paths, None);
        assert!(out.contains("reports/implementation_guide_20240301_093000.md"));
    }
}
