//! PaperPlan - research paper to implementation plan
//!
//! CLI entry point: extraction, analysis, planning and artifact output.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info, warn};

use paperplan::analysis::{AnalysisRecord, AnalysisSource, PaperAnalyzer};
use paperplan::cli::{Cli, Command, OutputArgs, OutputFormat, SettingsArgs, generate_after_help, get_log_path};
use paperplan::config::{Config, LlmConfig};
use paperplan::extract::{TextExtractor, extract_metadata};
use paperplan::llm::create_client;
use paperplan::pipeline::Pipeline;
use paperplan::plan::{PlanGenerator, ProjectPlan};
use paperplan::prompts::PromptLoader;
use paperplan::render::{DiagramSet, ViewData, generate_diagrams, render_view};
use paperplan::workspace::Workspace;

fn parse_level(level_str: Option<&str>) -> tracing::Level {
    match level_str.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = parse_level(cli_log_level.or(config_log_level));
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let log_path = get_log_path();
    let log_file = log_path
        .parent()
        .map(fs::create_dir_all)
        .transpose()
        .and_then(|_| fs::File::create(&log_path));

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_writer(file)
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
        Err(e) => {
            eprintln!("Warning: cannot write {} ({}), logging to stderr", log_path.display(), e);
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help(&LlmConfig::default().api_key_env));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("PaperPlan loaded config: provider={} model={}", config.llm.provider, config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Analyze {
            pdf,
            settings,
            api_key,
            model,
            output,
        } => {
            debug!("main: matched Analyze command");
            cmd_analyze(&config, &pdf, &settings, api_key, model, &output).await
        }
        Command::Plan {
            analysis,
            settings,
            output,
        } => {
            debug!("main: matched Plan command");
            cmd_plan(&config, &analysis, &settings, &output)
        }
        Command::Extract { pdf, metadata, format } => {
            debug!("main: matched Extract command");
            cmd_extract(&pdf, metadata, format)
        }
    }
}

/// Full pipeline: store upload, extract, analyze, plan, write artifacts
async fn cmd_analyze(
    config: &Config,
    pdf: &Path,
    settings: &SettingsArgs,
    api_key: Option<String>,
    model: Option<String>,
    output: &OutputArgs,
) -> Result<()> {
    debug!(?pdf, "cmd_analyze: called");
    let settings = settings.resolve(&config.project)?;

    let mut llm = config.llm.clone();
    if api_key.is_some() {
        llm.api_key = api_key;
    }
    if let Some(model) = model {
        llm.model = model;
    }
    // Fails on a missing key before any extraction work
    let client = create_client(&llm)?;

    if !pdf.is_file() {
        bail!("PDF not found: {}", pdf.display());
    }

    let workspace = workspace_for(config, output);
    workspace.ensure_layout()?;
    let stored = workspace.store_upload(pdf)?;

    let analyzer = PaperAnalyzer::new(client, PromptLoader::new(".")).with_sampling(llm.max_tokens, llm.temperature);
    let pipeline = Pipeline::new(TextExtractor::new(), analyzer, PlanGenerator::new());

    let text_mode = output.format == OutputFormat::Text;
    if text_mode {
        println!("{} Analyzing {}...", "→".cyan(), pdf.display());
    }
    let result = pipeline.run(&stored, &settings).await?;
    if result.analysis_source.is_fallback() {
        warn!("Analysis degraded: {}", result.analysis_source);
    }

    let artifacts = workspace.write_artifacts(&result.analysis, &result.plan, &result.diagrams, Local::now())?;
    if text_mode {
        println!("{} Implementation plan generated", "✓".green());
    }

    emit(
        output,
        &result.analysis,
        Some(result.analysis_source),
        &result.plan,
        &result.diagrams,
        &artifacts,
    )
}

/// Plan and render from a saved analysis record
fn cmd_plan(config: &Config, analysis_path: &Path, settings: &SettingsArgs, output: &OutputArgs) -> Result<()> {
    debug!(?analysis_path, "cmd_plan: called");
    let settings = settings.resolve(&config.project)?;

    let json = fs::read_to_string(analysis_path).context(format!("Failed to read {}", analysis_path.display()))?;
    let analysis = AnalysisRecord::from_json(&json)
        .context(format!("Invalid analysis record in {}", analysis_path.display()))?;

    let plan = PlanGenerator::new().generate(&analysis, &settings);
    let diagrams = generate_diagrams(&plan);

    let workspace = workspace_for(config, output);
    workspace.ensure_layout()?;
    let artifacts = workspace.write_artifacts(&analysis, &plan, &diagrams, Local::now())?;
    if output.format == OutputFormat::Text {
        println!("{} Implementation plan generated", "✓".green());
    }

    emit(output, &analysis, None, &plan, &diagrams, &artifacts)
}

#[derive(Serialize)]
struct ExtractOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<paperplan::extract::PdfMetadata>,
    text: String,
}

/// Text extraction only
fn cmd_extract(pdf: &Path, metadata: bool, format: OutputFormat) -> Result<()> {
    debug!(?pdf, metadata, %format, "cmd_extract: called");
    if !pdf.is_file() {
        bail!("PDF not found: {}", pdf.display());
    }

    let text = TextExtractor::new().extract_text(pdf);
    if text.is_empty() {
        bail!("No text could be extracted from {}", pdf.display());
    }
    let metadata = metadata.then(|| extract_metadata(pdf));

    match format {
        OutputFormat::Json => {
            let out = ExtractOutput { metadata, text };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if let Some(meta) = metadata {
                let fields = [
                    ("Title", meta.title),
                    ("Author", meta.author),
                    ("Subject", meta.subject),
                    ("Creator", meta.creator),
                    ("Producer", meta.producer),
                    ("Created", meta.creation_date),
                    ("Modified", meta.modification_date),
                ];
                for (label, value) in fields {
                    if let Some(value) = value {
                        println!("{} {}", format!("{}:", label).bold(), value);
                    }
                }
                println!("{} {}", "Pages:".bold(), meta.pages);
                println!();
            }
            println!("{}", text);
        }
    }
    Ok(())
}

fn workspace_for(config: &Config, output: &OutputArgs) -> Workspace {
    let root: PathBuf = output.workspace.clone().unwrap_or_else(|| config.storage.workspace.clone());
    debug!(?root, "workspace_for: called");
    Workspace::new(root)
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_source: Option<AnalysisSource>,
    analysis: &'a AnalysisRecord,
    plan: &'a ProjectPlan,
    diagrams: &'a DiagramSet,
    artifacts: &'a [PathBuf],
}

/// Print the run's results as JSON or as the selected views
fn emit(
    output: &OutputArgs,
    analysis: &AnalysisRecord,
    analysis_source: Option<AnalysisSource>,
    plan: &ProjectPlan,
    diagrams: &DiagramSet,
    artifacts: &[PathBuf],
) -> Result<()> {
    debug!(format = %output.format, "emit: called");
    match output.format {
        OutputFormat::Json => {
            let out = JsonOutput {
                analysis_source,
                analysis,
                plan,
                diagrams,
                artifacts,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let data = ViewData {
                analysis,
                analysis_source,
                plan,
                diagrams,
                artifacts,
            };
            for view in output.selected_views() {
                println!("{}", render_view(view, &data));
            }
        }
    }
    Ok(())
}
