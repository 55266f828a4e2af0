//! Configuration module for ruledeck
//!
//! Configuration hierarchy (highest priority first):
//! 1. CLI flags
//! 2. Environment variables (RULEDECK_*)
//! 3. Project config (.cursor/ruledeck.toml)
//! 4. User config (~/.config/ruledeck/config.toml)
//! 5. Built-in defaults

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    load_layered, project_config_path, user_config_path, with_env_overrides,
    with_env_overrides_from, ConfigWarning, LoadedConfig,
};
pub use types::{ColorMode, Config, OutputConfig, RulesConfig, ServerConfig, WatchConfig};
