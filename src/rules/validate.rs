//! Rule file validation
//!
//! Problems are reported, never raised: a rule with a broken header is still
//! served, the caller decides whether issues are fatal (`check --strict`).

use std::path::Path;

use serde::Serialize;

use crate::error::{RuledeckError, RuledeckResult};
use crate::watcher::SuffixFilter;

use super::frontmatter::{extract_frontmatter, parse_frontmatter};
use super::list_rule_files;

/// Keys every rule's frontmatter must declare
pub const REQUIRED_FIELDS: [&str; 2] = ["description", "globs"];

/// Category of a validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// File does not start with `---`
    MissingFrontmatter,
    /// Opening `---` without a closing one
    IncompleteFrontmatter,
    /// Block is not a YAML mapping
    InvalidYaml,
    /// A required key is absent
    MissingField,
    /// The file could not be read
    Unreadable,
}

/// One validation problem in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleIssue {
    pub file: String,
    pub kind: IssueKind,
    pub message: String,
}

impl RuleIssue {
    fn new(file: &str, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Outcome of validating a rules directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Number of rule files examined
    pub checked: usize,
    pub issues: Vec<RuleIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Files with at least one issue, in order of first appearance
    pub fn failing_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if !files.contains(&issue.file.as_str()) {
                files.push(&issue.file);
            }
        }
        files
    }
}

/// Validate the content of one rule file named `file`
pub fn validate_rule(file: &str, content: &str) -> Vec<RuleIssue> {
    let path = Path::new(file);
    let extracted = match extract_frontmatter(content, path) {
        Ok(extracted) => extracted,
        Err(RuledeckError::UnclosedFrontmatter { .. }) => {
            return vec![RuleIssue::new(
                file,
                IssueKind::IncompleteFrontmatter,
                "Incomplete YAML frontmatter (missing closing '---')",
            )]
        }
        Err(_) => {
            return vec![RuleIssue::new(
                file,
                IssueKind::MissingFrontmatter,
                "Missing YAML frontmatter (file must start with '---')",
            )]
        }
    };

    let mut issues = Vec::new();
    let keys = match parse_frontmatter(&extracted.yaml, path) {
        Ok(frontmatter) => frontmatter.keys,
        Err(e) => {
            let message = match e {
                RuledeckError::InvalidFrontmatter { message, .. } => message,
                other => other.to_string(),
            };
            issues.push(RuleIssue::new(file, IssueKind::InvalidYaml, message));
            top_level_keys(&extracted.yaml)
        }
    };

    for field in REQUIRED_FIELDS {
        if !keys.iter().any(|k| k == field) {
            issues.push(RuleIssue::new(
                file,
                IssueKind::MissingField,
                format!("Missing {field} field"),
            ));
        }
    }
    issues
}

/// Validate every rule file in `dir`
pub fn validate_dir(dir: &Path, filter: &SuffixFilter) -> RuledeckResult<ValidationReport> {
    let files = list_rule_files(dir, filter)?;
    let mut report = ValidationReport {
        checked: files.len(),
        issues: Vec::new(),
    };

    for rule in files {
        match std::fs::read_to_string(&rule.path) {
            Ok(content) => report.issues.extend(validate_rule(&rule.name, &content)),
            Err(e) => report.issues.push(RuleIssue::new(
                &rule.name,
                IssueKind::Unreadable,
                e.to_string(),
            )),
        }
    }
    Ok(report)
}

/// Best-effort key scan for blocks that are not valid YAML
fn top_level_keys(yaml: &str) -> Vec<String> {
    yaml.lines()
        .filter(|line| !line.starts_with(char::is_whitespace) && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, _)| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}
