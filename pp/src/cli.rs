//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::ProjectDefaults;
use crate::plan::{Complexity, PlanError, ProjectSettings};
use crate::render::View;

/// PaperPlan - research paper to implementation plan
#[derive(Parser)]
#[command(
    name = "pp",
    about = "Turn a research paper PDF into a phased implementation plan",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a paper PDF and generate its implementation plan
    Analyze {
        /// Paper PDF
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// API key (overrides the configured environment variable)
        #[arg(long)]
        api_key: Option<String>,

        /// Model name (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a plan from a saved analysis record (no PDF, no LLM)
    Plan {
        /// Analysis JSON, e.g. outputs/analysis.json
        #[arg(value_name = "ANALYSIS_JSON")]
        analysis: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Extract text from a PDF
    Extract {
        /// Paper PDF
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Also show document metadata
        #[arg(long)]
        metadata: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Project settings flags; unset values come from config
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    /// Project duration in months (6-36)
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Team size (1-20)
    #[arg(short, long)]
    pub team_size: Option<u32>,

    /// Complexity (Beginner, Intermediate, Advanced, Expert)
    #[arg(long)]
    pub complexity: Option<Complexity>,
}

impl SettingsArgs {
    /// Merge flags over configured defaults and validate
    pub fn resolve(&self, defaults: &ProjectDefaults) -> Result<ProjectSettings, PlanError> {
        debug!(?self, "SettingsArgs::resolve: called");
        ProjectSettings::new(
            self.duration.unwrap_or(defaults.duration),
            self.team_size.unwrap_or(defaults.team_size),
            self.complexity.unwrap_or(defaults.complexity),
        )
    }
}

/// Where results go and how they are shown
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Views to print (overview, roadmap, implementation, diagrams, downloads); all when omitted
    #[arg(short, long = "view")]
    pub views: Vec<View>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Workspace root (overrides config)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,
}

impl OutputArgs {
    /// Requested views, or every view when none were named
    pub fn selected_views(&self) -> Vec<View> {
        if self.views.is_empty() {
            debug!("selected_views: none requested, using all");
            View::ALL.to_vec()
        } else {
            self.views.clone()
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paperplan")
        .join("logs")
        .join("paperplan.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with API key status and log location
pub fn generate_after_help(api_key_env: &str) -> String {
    debug!(%api_key_env, "generate_after_help: called");
    let key_set = std::env::var(api_key_env).map(|k| !k.trim().is_empty()).unwrap_or(false);

    let mut help = String::new();
    help.push_str("API Key:\n");
    let icon = if key_set {
        debug!("generate_after_help: api key set");
        "\u{2705}"
    } else {
        debug!("generate_after_help: api key not set");
        "\u{274C}"
    };
    let status = if key_set { "set" } else { "not set" };
    help.push_str(&format!("  {} {:<18} {}\n", icon, api_key_env, status));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => {
                debug!("OutputFormat::from_str: matched Text");
                Ok(Self::Text)
            }
            "json" => {
                debug!("OutputFormat::from_str: matched Json");
                Ok(Self::Json)
            }
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
