//! Mermaid diagram generation

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::plan::ProjectPlan;

pub const GANTT_CHART: &str = "gantt_chart.md";
pub const WORKFLOW_DIAGRAM: &str = "workflow_diagram.md";
pub const ARCHITECTURE_DIAGRAM: &str = "architecture_diagram.md";
pub const PHASE_FLOWCHART: &str = "phase_flowchart.md";

/// Gantt sub-bars per phase
const MAX_GANTT_TASKS: usize = 3;
/// Gantt sub-bar labels are cut to this many characters
const MAX_GANTT_LABEL: usize = 20;

/// Diagram id to Mermaid text, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiagramSet(IndexMap<String, String>);

impl DiagramSet {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, text)| (id.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, id: &str, text: String) {
        self.0.insert(id.to_string(), text);
    }
}

/// Whether a diagram id holds Mermaid markup rather than plain text
pub fn is_graph_markup(id: &str) -> bool {
    id.ends_with(".md")
}

/// Make a label usable as a Mermaid identifier
pub fn sanitize_identifier(label: &str) -> String {
    label.replace(' ', "_")
}

/// Capitalize each alphabetic run, lowercase the rest of it
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Generate all four diagrams for a plan
pub fn generate_diagrams(plan: &ProjectPlan) -> DiagramSet {
    debug!(phases = plan.phases.len(), "generate_diagrams: called");
    let mut diagrams = DiagramSet::default();
    diagrams.insert(GANTT_CHART, gantt_chart(plan));
    diagrams.insert(WORKFLOW_DIAGRAM, workflow_diagram(plan));
    diagrams.insert(ARCHITECTURE_DIAGRAM, architecture_diagram(plan));
    diagrams.insert(PHASE_FLOWCHART, phase_flowchart(plan));
    diagrams
}

pub fn gantt_chart(plan: &ProjectPlan) -> String {
    debug!("gantt_chart: called");
    let mut gantt =
        String::from("gantt\n    title Project Implementation Timeline\n    dateFormat  X\n    axisFormat %m\n    \n");

    for (i, phase) in plan.phases.iter().enumerate() {
        let n = i + 1;
        let start = phase.start_month;
        let duration = phase.months();
        gantt.push_str(&format!("    section Phase {}\n", n));
        gantt.push_str(&format!(
            "    {} :a{}, {}, {}\n",
            sanitize_identifier(&phase.name),
            n,
            start,
            duration
        ));

        if !phase.tasks.is_empty() {
            let task_duration = (duration / phase.tasks.len() as u32).max(1);
            for (j, task) in phase.tasks.iter().take(MAX_GANTT_TASKS).enumerate() {
                let label: String = sanitize_identifier(task).chars().take(MAX_GANTT_LABEL).collect();
                let task_start = start + j as u32 * task_duration;
                gantt.push_str(&format!(
                    "    {} :a{}_{}, {}, {}\n",
                    label,
                    n,
                    j + 1,
                    task_start,
                    task_duration
                ));
            }
        }
        gantt.push('\n');
    }
    gantt
}

pub fn workflow_diagram(plan: &ProjectPlan) -> String {
    debug!("workflow_diagram: called");
    let count = plan.phases.len();
    let midpoint = count / 2;
    let mut workflow = String::from("flowchart TD\n    Start([Project Start]) --> Phase1\n    \n");

    for (i, phase) in plan.phases.iter().enumerate() {
        let id = format!("Phase{}", i + 1);
        // The last phase hands off to End, including from the decision node
        let next = if i + 1 < count {
            format!("Phase{}", i + 2)
        } else {
            "End".to_string()
        };

        if i + 1 < count {
            workflow.push_str(&format!("    {}[\"{}\"] --> {}\n", id, phase.name, next));
        } else {
            workflow.push_str(&format!("    {}[\"{}\"] --> End([Project Complete])\n", id, phase.name));
        }

        if i == midpoint {
            let decision = format!("Decision{}", i + 1);
            workflow.push_str(&format!("    {} --> {}{{Quality Check}}\n", id, decision));
            workflow.push_str(&format!("    {} -->|Pass| {}\n", decision, next));
            workflow.push_str(&format!("    {} -->|Fail| {}\n", decision, id));
        }
    }

    workflow.push_str("\n    classDef phaseBox fill:#e1f5fe,stroke:#0277bd,stroke-width:2px\n");
    workflow.push_str("    classDef decision fill:#fff3e0,stroke:#ef6c00,stroke-width:2px\n");
    workflow.push_str("    classDef endpoint fill:#e8f5e8,stroke:#2e7d32,stroke-width:2px\n    \n");
    for i in 0..count {
        workflow.push_str(&format!("    class Phase{} phaseBox\n", i + 1));
    }
    workflow.push_str("    class Start,End endpoint\n");
    workflow
}

pub fn architecture_diagram(plan: &ProjectPlan) -> String {
    debug!("architecture_diagram: called");
    let mut diagram = String::from(concat!(
        "graph TB\n",
        "    subgraph \"System Architecture\"\n",
        "        UI[User Interface Layer]\n",
        "        API[Application Layer]\n",
        "        MODEL[Model Layer]\n",
        "        DATA[Data Layer]\n",
        "        INFRA[Infrastructure Layer]\n",
        "    end\n",
        "    \n",
        "    UI --> API\n",
        "    API --> MODEL\n",
        "    MODEL --> DATA\n",
        "    API --> INFRA\n",
        "    \n",
    ));

    for component in plan.architecture.keys() {
        diagram.push_str(&format!(
            "    {}[\"{}\"]\n",
            sanitize_identifier(&component.to_uppercase()),
            title_case(component)
        ));
    }

    diagram.push_str("\n    classDef layer fill:#f9f9f9,stroke:#333,stroke-width:2px\n");
    diagram.push_str("    classDef component fill:#e3f2fd,stroke:#1976d2,stroke-width:1px\n    \n");
    diagram.push_str("    class UI,API,MODEL,DATA,INFRA layer\n");
    diagram
}

pub fn phase_flowchart(plan: &ProjectPlan) -> String {
    debug!("phase_flowchart: called");
    let count = plan.phases.len();
    let mut flowchart =
        String::from("flowchart LR\n    subgraph \"Project Implementation Flow\"\n        Start([Start])\n");

    for (i, phase) in plan.phases.iter().enumerate() {
        let p = format!("P{}", i + 1);
        flowchart.push_str(&format!("        \n        subgraph \"{}\"\n", phase.name));
        flowchart.push_str(&format!("            {p}_Start([Begin]) --> {p}_Plan[Planning]\n"));
        flowchart.push_str(&format!("            {p}_Plan --> {p}_Exec[Execution]\n"));
        flowchart.push_str(&format!("            {p}_Exec --> {p}_Review[Review]\n"));
        flowchart.push_str(&format!("            {p}_Review --> {p}_End([Complete])\n"));
        flowchart.push_str("        end\n");
    }

    flowchart.push_str("\n        Start --> P1_Start\n");
    for i in 1..count {
        flowchart.push_str(&format!("        P{}_End --> P{}_Start\n", i, i + 1));
    }
    flowchart.push_str(&format!("        P{}_End --> Finish([Project Complete])\n", count));
    flowchart.push_str("    end");
    flowchart
}
