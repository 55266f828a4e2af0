//! Error types for ruledeck
//!
//! Library code returns `RuledeckResult`; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ruledeck operations
pub type RuledeckResult<T> = Result<T, RuledeckError>;

/// Main error type for ruledeck operations
#[derive(Error, Debug)]
pub enum RuledeckError {
    /// No frontmatter found (missing `---` delimiters)
    #[error("no frontmatter found in {file} - file must start with '---'")]
    NoFrontmatter { file: PathBuf },

    /// Frontmatter not properly closed
    #[error("unclosed frontmatter in {file} - missing closing '---'")]
    UnclosedFrontmatter { file: PathBuf },

    /// Invalid frontmatter YAML
    #[error("invalid frontmatter in {file}: {message}")]
    InvalidFrontmatter { file: PathBuf, message: String },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Current directory is not inside a usable project
    #[error("no project directory found for {cwd} (projects must live under {home})")]
    NoProjectDir { cwd: PathBuf, home: PathBuf },

    /// Home directory could not be determined
    #[error("could not determine home directory")]
    NoHomeDir,

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The protocol server process could not be started
    #[error("failed to start server '{command}': {source}")]
    ServerSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (mcp.json handling)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
