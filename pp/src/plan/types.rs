//! Plan data types

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const MIN_DURATION: u32 = 6;
pub const MAX_DURATION: u32 = 36;
pub const MIN_TEAM_SIZE: u32 = 1;
pub const MAX_TEAM_SIZE: u32 = 20;

/// Errors raised while building plan inputs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Project duration must be between 6 and 36 months, got {0}")]
    InvalidDuration(u32),

    #[error("Team size must be between 1 and 20, got {0}")]
    InvalidTeamSize(u32),

    #[error("Unknown complexity '{0}'. Expected Beginner, Intermediate, Advanced or Expert")]
    UnknownComplexity(String),

    #[error("Phase template family '{0}' is empty")]
    EmptyTemplateFamily(String),

    #[error("Phase '{phase}' in family '{family}' has a zero base duration")]
    InvalidPhaseWeight { family: String, phase: String },
}

/// Implementation complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [Self::Beginner, Self::Intermediate, Self::Advanced, Self::Expert];

    /// Case-insensitive label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(label))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }

    /// Phase duration scale factor
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Beginner => 0.8,
            Self::Intermediate => 1.0,
            Self::Advanced => 1.3,
            Self::Expert => 1.6,
        }
    }

    /// Advanced and Expert plans get extra risks and heavier hardware
    pub fn is_demanding(&self) -> bool {
        matches!(self, Self::Advanced | Self::Expert)
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| PlanError::UnknownComplexity(s.to_string()))
    }
}

/// User-chosen plan settings, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectSettings {
    duration: u32,
    team_size: u32,
    complexity: Complexity,
}

impl ProjectSettings {
    pub fn new(duration: u32, team_size: u32, complexity: Complexity) -> Result<Self, PlanError> {
        debug!(%duration, %team_size, %complexity, "ProjectSettings::new: called");
        if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
            return Err(PlanError::InvalidDuration(duration));
        }
        if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team_size) {
            return Err(PlanError::InvalidTeamSize(team_size));
        }
        Ok(Self {
            duration,
            team_size,
            complexity,
        })
    }

    /// Target duration in months
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn team_size(&self) -> u32 {
        self.team_size
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }
}

/// One scheduled phase of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// Display duration, e.g. "5 months"
    pub duration: String,
    pub start_month: u32,
    pub end_month: u32,
    pub objectives: String,
    pub tasks: Vec<String>,
    pub deliverables: Vec<String>,
    pub success_criteria: Vec<String>,
}

impl Phase {
    /// Length in months (inclusive month range)
    pub fn months(&self) -> u32 {
        self.end_month + 1 - self.start_month
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOverview {
    pub title: String,
    pub domain: String,
    pub complexity: String,
    pub estimated_duration: String,
    pub team_size: u32,
    /// RFC 3339 timestamp
    pub generated_date: String,
}

/// A technical stack entry: usually a list, occasionally one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StackValue {
    List(Vec<String>),
    Scalar(String),
}

impl fmt::Display for StackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => write!(f, "{}", items.join(", ")),
            Self::Scalar(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub risk: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMetrics {
    pub technical_metrics: Vec<String>,
    pub project_metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub month: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// e.g. "34 months"
    pub total_duration: String,
    /// `%Y-%m-%d`
    pub start_date: String,
    /// `%Y-%m-%d`
    pub estimated_end_date: String,
    pub milestones: Vec<Milestone>,
}

/// The generated implementation plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub project_overview: ProjectOverview,
    pub phases: Vec<Phase>,
    pub technical_stack: IndexMap<String, StackValue>,
    pub architecture: IndexMap<String, String>,
    pub resources: IndexMap<String, String>,
    pub risks: Vec<Risk>,
    pub success_metrics: SuccessMetrics,
    pub timeline: Timeline,
}

impl ProjectPlan {
    /// Last month covered by any phase
    pub fn total_months(&self) -> u32 {
        self.phases.iter().map(|p| p.end_month).max().unwrap_or(0)
    }
}
