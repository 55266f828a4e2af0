//! Frontmatter extraction and parsing for rule files
//!
//! A rule file starts with a YAML block delimited by `---` lines:
//!
//! ```text
//! ---
//! description: Rust style guide
//! globs: src/**/*.rs
//! alwaysApply: false
//! ---
//! # Rule content here
//! ```

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::error::{RuledeckError, RuledeckResult};

/// Delimiter for frontmatter sections
const FRONTMATTER_DELIMITER: &str = "---";

/// Result of extracting frontmatter from content
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFrontmatter {
    /// The raw YAML content of the frontmatter
    pub yaml: String,
    /// The content body after the frontmatter
    pub body: String,
    /// Line number where frontmatter ends (for error reporting)
    pub end_line: usize,
}

/// File patterns a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Globs {
    One(String),
    Many(Vec<String>),
}

impl Globs {
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Globs::One(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            Globs::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for Globs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.patterns().join(", "))
    }
}

/// Parsed frontmatter of a rule file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFrontmatter {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub globs: Option<Globs>,

    #[serde(default, rename = "alwaysApply")]
    pub always_apply: Option<bool>,

    /// Every top-level key present, in file order
    #[serde(skip)]
    pub keys: Vec<String>,
}

impl RuleFrontmatter {
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Extract frontmatter from file content
///
/// Frontmatter must be at the start of the file, delimited by `---` lines.
pub fn extract_frontmatter(content: &str, file: &Path) -> RuledeckResult<ExtractedFrontmatter> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || lines[0].trim() != FRONTMATTER_DELIMITER {
        return Err(RuledeckError::NoFrontmatter {
            file: file.to_path_buf(),
        });
    }

    let closing_line = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.trim() == FRONTMATTER_DELIMITER)
        .map(|(i, _)| i)
        .ok_or_else(|| RuledeckError::UnclosedFrontmatter {
            file: file.to_path_buf(),
        })?;

    let yaml = lines[1..closing_line].join("\n");
    let body = if closing_line + 1 < lines.len() {
        lines[closing_line + 1..].join("\n")
    } else {
        String::new()
    };

    Ok(ExtractedFrontmatter {
        yaml,
        body,
        end_line: closing_line + 1, // 1-indexed
    })
}

/// Parse frontmatter YAML into [`RuleFrontmatter`]
///
/// The block must be a mapping (an empty block counts as an empty mapping).
/// Required keys are not enforced here; see [`super::validate_rule`].
pub fn parse_frontmatter(yaml: &str, file: &Path) -> RuledeckResult<RuleFrontmatter> {
    let invalid = |message: String| RuledeckError::InvalidFrontmatter {
        file: file.to_path_buf(),
        message,
    };

    let value: Value = serde_yaml_ng::from_str(&quote_bare_globs(yaml))
        .map_err(|e| invalid(format_yaml_error(yaml, &e)))?;

    let mapping = match value {
        Value::Null => serde_yaml_ng::Mapping::new(),
        Value::Mapping(m) => m,
        other => {
            return Err(invalid(format!(
                "frontmatter must be a mapping of keys to values, found {}",
                value_kind(&other)
            )))
        }
    };

    let keys = mapping
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect();

    let mut frontmatter: RuleFrontmatter = serde_yaml_ng::from_value(Value::Mapping(mapping))
        .map_err(|e| invalid(format!("Invalid field - {e}")))?;
    frontmatter.keys = keys;
    Ok(frontmatter)
}

/// A rule file split into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub frontmatter: RuleFrontmatter,
    pub body: String,
}

/// Read and parse a single rule file
pub fn parse_rule_file(path: &Path) -> RuledeckResult<ParsedRule> {
    let content = std::fs::read_to_string(path)?;
    let extracted = extract_frontmatter(&content, path)?;
    let frontmatter = parse_frontmatter(&extracted.yaml, path)?;
    Ok(ParsedRule {
        frontmatter,
        body: extracted.body,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn format_yaml_error(yaml: &str, err: &serde_yaml_ng::Error) -> String {
    let err_str = err.to_string();
    let mut message = match err.location() {
        Some(loc) => format!("Line {}: Invalid YAML - {}", loc.line(), err_str),
        None => format!("Invalid YAML - {}", err_str),
    };

    if should_hint_colon_quotes(yaml, &err_str) {
        message.push_str("\nHint: Strings with colons need quotes: description: \"My: Rule\"");
    }
    message
}

fn should_hint_colon_quotes(yaml: &str, err_str: &str) -> bool {
    err_str.contains("mapping values are not allowed")
        || err_str.contains("unexpected ':'")
        || yaml
            .lines()
            .any(|l| l.starts_with("description:") && l.matches(": ").count() > 1)
}

/// Cursor writes `globs: *.ts,*.tsx` without quotes, which YAML reads as an
/// alias. Such values are quoted before parsing; line numbers are unchanged.
fn quote_bare_globs(yaml: &str) -> Cow<'_, str> {
    if !yaml.lines().any(|line| bare_glob_value(line).is_some()) {
        return Cow::Borrowed(yaml);
    }
    let lines: Vec<String> = yaml
        .lines()
        .map(|line| match bare_glob_value(line) {
            Some(value) => format!(
                "globs: \"{}\"",
                value.replace('\\', "\\\\").replace('"', "\\\"")
            ),
            None => line.to_string(),
        })
        .collect();
    Cow::Owned(lines.join("\n"))
}

fn bare_glob_value(line: &str) -> Option<&str> {
    let value = line.strip_prefix("globs:")?.trim();
    value.starts_with('*').then_some(value)
}
