//! PaperPlan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;
use crate::plan::Complexity;

/// Main PaperPlan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Default project settings (overridable per run)
    pub project: ProjectDefaults,

    /// Workspace storage configuration
    pub storage: StorageConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .paperplan.yml
        let local_config = PathBuf::from(".paperplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/paperplan/paperplan.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config file is reported later by
    /// `load`, once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".paperplan.yml")];
                paths.extend(user_config_path());
                paths
            }
        };

        candidates
            .into_iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Config>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("paperplan").join("paperplan.yml"))
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("together" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Explicit API key (from --api-key); never written to disk
    #[serde(skip)]
    pub api_key: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds; the HTTP client default applies when unset
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "together".to_string(),
            model: "meta-llama/Llama-3-8b-chat-hf".to_string(),
            api_key_env: "TOGETHER_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.together.xyz".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: explicit key first, then the environment
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                env: self.api_key_env.clone(),
            })
    }
}

/// Default project settings, used when the CLI does not override them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Project duration in months (6-36)
    pub duration: u32,

    /// Team size (1-20)
    #[serde(rename = "team-size")]
    pub team_size: u32,

    /// Complexity label
    pub complexity: Complexity,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            duration: 20,
            team_size: 5,
            complexity: Complexity::Intermediate,
        }
    }
}

/// Workspace storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory holding uploads/, outputs/, diagrams/ and reports/
    pub workspace: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
        }
    }
}
