//! Project plan generation
//!
//! Phase templates per domain family, duration scaling, and the fixed
//! catalog entries (stack, architecture, resources, risks, metrics) that
//! make up a [`ProjectPlan`].

mod generator;
mod templates;
mod types;

pub use generator::{PlanGenerator, scaled_phase_months};
pub use templates::{DomainFamily, PhaseTemplate, TemplateTable};
pub use types::{
    Complexity, MAX_DURATION, MAX_TEAM_SIZE, MIN_DURATION, MIN_TEAM_SIZE, Milestone, Phase, PlanError,
    ProjectOverview, ProjectPlan, ProjectSettings, Risk, StackValue, SuccessMetrics, Timeline,
};
