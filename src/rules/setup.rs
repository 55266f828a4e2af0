//! Copying template rules into a project
//!
//! Existing rule files are never overwritten unless forced, so local edits
//! survive every server start.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RuledeckResult;
use crate::fs::write_atomic;
use crate::watcher::SuffixFilter;

use super::list_rule_files;

/// Placeholder replaced with the project name in template content
pub const PROJECT_NAME_PLACEHOLDER: &str = "${projectName}";

/// Options for [`setup_rules`]
#[derive(Debug, Clone)]
pub struct SetupOptions<'a> {
    pub project_name: &'a str,
    /// Extra literals that are also replaced with the project name
    pub aliases: &'a [String],
    pub filter: &'a SuffixFilter,
    /// Overwrite rule files that already exist
    pub force: bool,
}

/// Why templates were not copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum SetupWarning {
    /// No template source could be located
    NoTemplateSource,
    /// The template source directory does not exist
    SourceMissing { path: PathBuf },
    /// The template source has no rule files
    NoTemplates { path: PathBuf, suffix: String },
}

/// What [`setup_rules`] did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    /// The rules directory had to be created
    pub created_dir: bool,
    pub source: Option<PathBuf>,
    pub copied: Vec<String>,
    /// Already present in the project, left untouched
    pub skipped: Vec<String>,
    pub warnings: Vec<SetupWarning>,
    /// Every rule file in the rules directory afterwards
    pub available: Vec<String>,
}

/// Replace the project-name placeholder and every alias with `project_name`
pub fn substitute(content: &str, project_name: &str, aliases: &[String]) -> String {
    let mut out = content.replace(PROJECT_NAME_PLACEHOLDER, project_name);
    for alias in aliases.iter().filter(|a| !a.is_empty()) {
        out = out.replace(alias.as_str(), project_name);
    }
    out
}

/// Make sure `rules_dir` exists and holds a copy of every template rule.
pub fn setup_rules(
    rules_dir: &Path,
    source: Option<&Path>,
    options: &SetupOptions<'_>,
) -> RuledeckResult<SetupReport> {
    let mut report = SetupReport::default();

    if !rules_dir.is_dir() {
        fs::create_dir_all(rules_dir)?;
        report.created_dir = true;
    }

    match source {
        None => report.warnings.push(SetupWarning::NoTemplateSource),
        Some(source) => {
            report.source = Some(source.to_path_buf());
            copy_templates(rules_dir, source, options, &mut report)?;
        }
    }

    report.available = list_rule_files(rules_dir, options.filter)?
        .into_iter()
        .map(|rule| rule.name)
        .collect();
    Ok(report)
}

fn copy_templates(
    rules_dir: &Path,
    source: &Path,
    options: &SetupOptions<'_>,
    report: &mut SetupReport,
) -> RuledeckResult<()> {
    if !source.is_dir() {
        report.warnings.push(SetupWarning::SourceMissing {
            path: source.to_path_buf(),
        });
        return Ok(());
    }

    let templates = list_rule_files(source, options.filter)?;
    if templates.is_empty() {
        report.warnings.push(SetupWarning::NoTemplates {
            path: source.to_path_buf(),
            suffix: options.filter.as_str().to_string(),
        });
        return Ok(());
    }

    // Copying a directory onto itself would only rewrite placeholders in place
    if same_dir(source, rules_dir) {
        report.skipped = templates.into_iter().map(|t| t.name).collect();
        return Ok(());
    }

    for template in templates {
        let target = rules_dir.join(&template.name);
        if target.exists() && !options.force {
            report.skipped.push(template.name);
            continue;
        }

        let content = fs::read_to_string(&template.path)?;
        let content = substitute(&content, options.project_name, options.aliases);
        write_atomic(&target, &content)?;
        report.copied.push(template.name);
    }
    Ok(())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
