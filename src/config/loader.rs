//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RuledeckError, RuledeckResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::Config;

/// Project config location, relative to the project root
const PROJECT_CONFIG: &str = ".cursor/ruledeck.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Fully resolved configuration plus everything worth telling the user about it.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// Unknown keys found in config files
    pub warnings: Vec<ConfigWarning>,
    /// Invalid environment values that fell back to defaults
    pub env_warnings: Vec<String>,
    /// Config files that contributed, lowest priority first
    pub sources: Vec<PathBuf>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RuledeckResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| RuledeckError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Path of the user-level config file
pub fn user_config_path() -> Option<PathBuf> {
    dirs_config_dir().map(|dir| dir.join("ruledeck/config.toml"))
}

/// Path of the project-level config file
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG)
}

/// Load defaults, then the user config, then the project config, then env overrides.
///
/// Later layers only override the keys they actually set.
pub fn load_layered(project_root: Option<&Path>) -> RuledeckResult<LoadedConfig> {
    let mut layers = Vec::new();
    if let Some(user) = user_config_path() {
        layers.push(user);
    }
    if let Some(root) = project_root {
        layers.push(project_config_path(root));
    }

    let mut loaded = load_files(&layers)?;
    let (config, env_warnings) = with_env_overrides(loaded.config);
    loaded.config = config;
    loaded.env_warnings = env_warnings;
    Ok(loaded)
}

pub(crate) fn load_files(paths: &[PathBuf]) -> RuledeckResult<LoadedConfig> {
    let mut merged = toml::Table::new();
    let mut loaded = LoadedConfig::default();

    for path in paths.iter().filter(|p| p.is_file()) {
        // Validates the layer on its own and collects its unknown keys
        let (_, warnings) = load_with_warnings(path)?;
        loaded.warnings.extend(warnings);

        let content = fs::read_to_string(path)?;
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            RuledeckError::InvalidConfig {
                file: path.clone(),
                message: e.to_string(),
            }
        })?;
        merge_tables(&mut merged, table);
        loaded.sources.push(path.clone());
    }

    loaded.config = toml::Value::Table(merged).try_into().map_err(|e: toml::de::Error| {
        RuledeckError::InvalidConfig {
            file: paths.last().cloned().unwrap_or_default(),
            message: e.to_string(),
        }
    })?;
    Ok(loaded)
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Apply environment variable overrides (RULEDECK_* prefix)
pub fn with_env_overrides(config: Config) -> (Config, Vec<String>) {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `get_env`; returns warnings for invalid values.
pub fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(templates) = get_env("RULEDECK_TEMPLATES").filter(|v| !v.is_empty()) {
        config.rules.templates = Some(PathBuf::from(templates));
    }

    if let Some(dir) = get_env("RULEDECK_RULES_DIR").filter(|v| !v.is_empty()) {
        config.rules.dir = PathBuf::from(dir);
    }

    if let Some(command) = get_env("RULEDECK_SERVER_COMMAND").filter(|v| !v.is_empty()) {
        config.server.command = command;
    }

    // RULEDECK_WATCH: auto | recursive | per-file | off
    if let Some(mode) = get_env("RULEDECK_WATCH") {
        let validator =
            EnvVarValidator::new("RULEDECK_WATCH", &["auto", "recursive", "per-file", "off"]);
        let parsed = validator.parse(&mode, |s| match s.to_lowercase().as_str() {
            "auto" | "recursive" => Some((true, true)),
            "per-file" | "perfile" => Some((true, false)),
            "off" | "false" | "0" => Some((false, config.watch.recursive)),
            _ => None,
        });
        match parsed {
            Ok((enabled, recursive)) => {
                config.watch.enabled = enabled;
                config.watch.recursive = recursive;
            }
            Err(warning) => warnings.push(warning),
        }
    }

    (config, warnings)
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "rules",
        "dir",
        "extension",
        "templates",
        "project_aliases",
        "watch",
        "enabled",
        "recursive",
        "server",
        "command",
        "args",
        "env",
        "output",
        "color",
        "unicode",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
