//! ruledeck - rule files for MCP-aware IDEs
//!
//! ruledeck bootstraps a project's `.cursor/rules` directory from a set of
//! template rules, validates their frontmatter, watches them for changes and
//! runs the filesystem MCP server over them.

pub mod config;
pub mod error;
pub mod fs;
pub mod mcp_config;
pub mod project;
pub mod rules;
pub mod server;
pub mod watcher;

// Re-exports for convenience
pub use config::Config;
pub use error::{RuledeckError, RuledeckResult};
pub use project::{find_project_dir, resolve_template_source, ProjectDir, TemplateSource};
pub use rules::{extract_frontmatter, parse_frontmatter, RuleFile, RuleFrontmatter};
pub use server::{ServerExit, ServerProcess, ServerSpec};
pub use watcher::{StrategyTier, SuffixFilter, WatchHandle, WatchManager, WatchTarget};
