//! Plan rendering: Mermaid diagrams, reports and terminal views

mod diagrams;
mod report;
pub mod views;

pub use diagrams::{
    ARCHITECTURE_DIAGRAM, DiagramSet, GANTT_CHART, PHASE_FLOWCHART, WORKFLOW_DIAGRAM, architecture_diagram,
    gantt_chart, generate_diagrams, is_graph_markup, phase_flowchart, sanitize_identifier, workflow_diagram,
};
pub use report::{generate_html_report, generate_markdown_report, generate_markdown_report_at};
pub use views::{View, ViewData, render_view};
