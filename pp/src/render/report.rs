//! Markdown and HTML implementation reports

use chrono::{DateTime, Local};
use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::diagrams::{ARCHITECTURE_DIAGRAM, DiagramSet, GANTT_CHART, WORKFLOW_DIAGRAM, title_case};
use crate::analysis::AnalysisRecord;
use crate::plan::ProjectPlan;

const HTML_TEMPLATE: &str = include_str!("../../templates/report.html.hbs");

/// Markdown implementation guide, stamped with the current time
pub fn generate_markdown_report(plan: &ProjectPlan, analysis: &AnalysisRecord) -> String {
    generate_markdown_report_at(plan, analysis, Local::now())
}

/// Markdown implementation guide, stamped with `now`
pub fn generate_markdown_report_at(plan: &ProjectPlan, analysis: &AnalysisRecord, now: DateTime<Local>) -> String {
    debug!(phases = plan.phases.len(), "generate_markdown_report_at: called");
    let overview = &plan.project_overview;

    let mut report = String::from("# Project Implementation Plan\n\n");
    report.push_str(&format!("**Generated on:** {}\n\n", now.format("%Y-%m-%d %H:%M:%S")));

    report.push_str("## Paper Overview\n");
    report.push_str(&format!("- **Title:** {}\n", analysis.title));
    report.push_str(&format!("- **Authors:** {}\n", analysis.authors));
    report.push_str(&format!("- **Domain:** {}\n", analysis.domain));
    report.push_str(&format!("- **Complexity:** {}\n\n", analysis.complexity));

    report.push_str("## Project Summary\n");
    report.push_str(&format!("- **Duration:** {}\n", overview.estimated_duration));
    report.push_str(&format!("- **Team Size:** {}\n", overview.team_size));
    report.push_str(&format!("- **Domain:** {}\n\n", overview.domain));

    report.push_str("## Implementation Phases\n\n");
    for (i, phase) in plan.phases.iter().enumerate() {
        report.push_str(&format!("### Phase {}: {}\n", i + 1, phase.name));
        report.push_str(&format!("**Duration:** {}\n", phase.duration));
        report.push_str(&format!("**Objectives:** {}\n", phase.objectives));
        push_list(&mut report, "Key Tasks", &phase.tasks);
        push_list(&mut report, "Deliverables", &phase.deliverables);
        push_list(&mut report, "Success Criteria", &phase.success_criteria);
        report.push('\n');
    }

    report.push_str("## Technical Stack\n\n");
    for (category, items) in &plan.technical_stack {
        report.push_str(&format!("**{}:** {}\n\n", title_case(&category.replace('_', " ")), items));
    }

    report.push_str("## Risk Mitigation\n\n");
    for risk in &plan.risks {
        report.push_str(&format!("**Risk:** {}\n", risk.risk));
        report.push_str(&format!("**Mitigation:** {}\n\n", risk.mitigation));
    }

    info!("Generated markdown report ({} bytes)", report.len());
    report
}

fn push_list(report: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    report.push_str(&format!("\n**{}:**\n", heading));
    for item in items {
        report.push_str(&format!("- {}\n", item));
    }
}

#[derive(Serialize)]
struct HtmlReport<'a> {
    title: &'a str,
    gantt: &'a str,
    workflow: &'a str,
    architecture: &'a str,
    phases: Vec<HtmlPhase<'a>>,
}

#[derive(Serialize)]
struct HtmlPhase<'a> {
    number: usize,
    name: &'a str,
    duration: &'a str,
    objectives: &'a str,
    tasks: &'a [String],
}

/// Standalone HTML page with the main diagrams and a per-phase summary
pub fn generate_html_report(plan: &ProjectPlan, diagrams: &DiagramSet) -> Result<String> {
    debug!(diagrams = diagrams.len(), "generate_html_report: called");
    let context = HtmlReport {
        title: &plan.project_overview.title,
        gantt: diagrams.get(GANTT_CHART).unwrap_or_default(),
        workflow: diagrams.get(WORKFLOW_DIAGRAM).unwrap_or_default(),
        architecture: diagrams.get(ARCHITECTURE_DIAGRAM).unwrap_or_default(),
        phases: plan
            .phases
            .iter()
            .enumerate()
            .map(|(i, phase)| HtmlPhase {
                number: i + 1,
                name: &phase.name,
                duration: &phase.duration,
                objectives: &phase.objectives,
                tasks: &phase.tasks,
            })
            .collect(),
    };

    let html = Handlebars::new()
        .render_template(HTML_TEMPLATE, &context)
        .map_err(|e| eyre!("Failed to render HTML report: {}", e))?;
    info!("Generated HTML report ({} bytes)", html.len());
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisRecord, RawAnalysis};
    use crate::plan::{Complexity, PlanGenerator, ProjectSettings};
    use crate::render::generate_diagrams;
    use chrono::TimeZone;

    fn fixture() -> (ProjectPlan, AnalysisRecord) {
        let analysis = AnalysisRecord {
            title: "Attention Is All You Need".to_string(),
            authors: "Vaswani et al.".to_string(),
            domain: "NLP".to_string(),
            complexity: "Advanced".to_string(),
            challenges: vec!["Quadratic <attention> cost".to_string()],
            ..AnalysisRecord::from_raw(RawAnalysis::default())
        };
        let settings = ProjectSettings::new(20, 5, Complexity::Advanced).unwrap();
        let plan = PlanGenerator::new().generate_at(&analysis, &settings, now());
        (plan, analysis)
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_markdown_report_sections() {
        let (plan, analysis) = fixture();
        let report = generate_markdown_report_at(&plan, &analysis, now());

        assert!(report.starts_with("# Project Implementation Plan\n\n**Generated on:** 2024-03-01 09:30:00\n"));
        assert!(report.contains("## Paper Overview\n- **Title:** Attention Is All You Need\n"));
        assert!(report.contains("- **Complexity:** Advanced\n"));
        assert!(report.contains("## Project Summary\n- **Duration:** 20 months\n- **Team Size:** 5\n"));
        assert!(report.contains("### Phase 1: Foundation and Setup\n"));
        assert!(report.contains("\n**Key Tasks:**\n- Set up development environment\n"));
        assert!(report.contains("- Advanced performance benchmarks achieved\n"));
        assert!(report.contains("**Programming Languages:** Python\n"));
        assert!(report.contains("**Ml Frameworks:** TensorFlow, PyTorch, Transformers (Hugging Face)\n"));
        assert!(report.contains("**Risk:** Quadratic <attention> cost\n"));
    }

    #[test]
    fn test_markdown_report_skips_empty_lists() {
        let (mut plan, analysis) = fixture();
        plan.phases[0].deliverables.clear();
        let report = generate_markdown_report_at(&plan, &analysis, now());

        let phase_one = report.split("### Phase 2").next().unwrap();
        assert!(!phase_one.contains("**Deliverables:**"));
        assert!(phase_one.contains("**Success Criteria:**"));
    }

    #[test]
    fn test_html_report_embeds_diagrams() {
        let (plan, _) = fixture();
        let diagrams = generate_diagrams(&plan);
        let html = generate_html_report(&plan, &diagrams).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<div class=\"diagram mermaid\">\ngantt\n"));
        assert!(html.contains("flowchart TD"));
        assert!(html.contains("graph TB"));
        assert!(!html.contains("flowchart LR"));
        assert!(html.contains("<h3>Phase 5: Evaluation and Deployment</h3>"));
        assert!(html.contains("<li>Literature review</li>"));
        assert!(html.contains("mermaid.initialize({startOnLoad:true});"));
    }

    #[test]
    fn test_html_report_escapes_text() {
        let (mut plan, _) = fixture();
        plan.phases[0].name = "<script>alert(1)</script>".to_string();
        let diagrams = generate_diagrams(&plan);
        let html = generate_html_report(&plan, &diagrams).unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
