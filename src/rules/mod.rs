//! Rule files
//!
//! Discovery, frontmatter parsing, validation and template setup for the
//! `.mdc` files served to the IDE.

mod frontmatter;
mod setup;
mod validate;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{RuledeckError, RuledeckResult};
use crate::watcher::{SuffixFilter, WatchTarget};

pub use frontmatter::{
    extract_frontmatter, parse_frontmatter, parse_rule_file, ExtractedFrontmatter, Globs,
    ParsedRule, RuleFrontmatter,
};
pub use setup::{
    setup_rules, substitute, SetupOptions, SetupReport, SetupWarning, PROJECT_NAME_PLACEHOLDER,
};
pub use validate::{
    validate_dir, validate_rule, IssueKind, RuleIssue, ValidationReport, REQUIRED_FIELDS,
};

/// A rule file on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFile {
    /// File name inside the rules directory
    pub name: String,
    pub path: PathBuf,
}

/// Rule files directly inside `dir`, sorted by name
pub fn list_rule_files(dir: &Path, filter: &SuffixFilter) -> RuledeckResult<Vec<RuleFile>> {
    if !dir.is_dir() {
        return Err(RuledeckError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let names = WatchTarget::new(dir, filter.clone()).matching_files()?;
    Ok(names
        .into_iter()
        .map(|name| RuleFile {
            path: dir.join(&name),
            name,
        })
        .collect())
}

/// A rule file together with its parsed header, or why it has none
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub description: Option<String>,
    pub globs: Vec<String>,
    pub always_apply: bool,
    /// Set when the frontmatter could not be read
    pub problem: Option<String>,
}

/// Filename to frontmatter fields for every rule in `dir`
pub fn describe_rules(dir: &Path, filter: &SuffixFilter) -> RuledeckResult<Vec<RuleSummary>> {
    let files = list_rule_files(dir, filter)?;
    Ok(files
        .into_iter()
        .map(|rule| match parse_rule_file(&rule.path) {
            Ok(parsed) => {
                let fm = parsed.frontmatter;
                RuleSummary {
                    name: rule.name,
                    description: fm.description,
                    globs: fm
                        .globs
                        .map(|g| g.patterns().into_iter().map(str::to_string).collect())
                        .unwrap_or_default(),
                    always_apply: fm.always_apply.unwrap_or(false),
                    problem: None,
                }
            }
            Err(e) => RuleSummary {
                name: rule.name,
                description: None,
                globs: Vec::new(),
                always_apply: false,
                problem: Some(e.to_string()),
            },
        })
        .collect())
}
