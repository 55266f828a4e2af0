//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RuledeckResult;

use super::loader::{self, ConfigWarning};

/// Rule file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rules directory, relative to the project root
    #[serde(default = "default_rules_dir")]
    pub dir: PathBuf,

    /// Rule file extension (without the leading dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory holding template rule files to copy into new projects
    #[serde(default)]
    pub templates: Option<PathBuf>,

    /// Literal strings in templates that are replaced with the project name
    #[serde(default = "default_project_aliases")]
    pub project_aliases: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dir: default_rules_dir(),
            extension: default_extension(),
            templates: None,
            project_aliases: default_project_aliases(),
        }
    }
}

impl RulesConfig {
    /// The suffix rule files must end with (e.g. `.mdc`)
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from(".cursor/rules")
}

fn default_extension() -> String {
    "mdc".to_string()
}

/// Server names the stock templates refer to themselves by
fn default_project_aliases() -> Vec<String> {
    vec!["sse-server".to_string(), "cursor-mdc-server".to_string()]
}

/// Watch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Watch the rules directory at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Try a single recursive watch before falling back to per-file watches
    #[serde(default = "default_true")]
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recursive: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// External protocol server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_command")]
    pub command: String,

    #[serde(default = "default_server_args")]
    pub args: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: default_server_command(),
            args: default_server_args(),
            env: BTreeMap::new(),
        }
    }
}

fn default_server_command() -> String {
    "npx".to_string()
}

fn default_server_args() -> Vec<String> {
    vec![
        "@modelcontextprotocol/server-filesystem".to_string(),
        ".".to_string(),
    ]
}

/// Output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            unicode: true,
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a single TOML file
    pub fn load(path: &Path) -> RuledeckResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> RuledeckResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides (RULEDECK_* prefix)
    pub fn with_env_overrides(self) -> (Self, Vec<String>) {
        loader::with_env_overrides(self)
    }
}
