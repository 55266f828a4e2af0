//! NDJSON event types
//!
//! Every line written in `--json` mode is one of these, tagged by `event`.

use std::path::Path;

use serde::Serialize;

use ruledeck::mcp_config::MergeOutcome;
use ruledeck::project::TemplateSource;
use ruledeck::rules::{RuleSummary, SetupReport, ValidationReport};
use ruledeck::watcher::{RuleChange, WatchNotice};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event<'a> {
    Start {
        command: &'a str,
        version: &'static str,
    },
    Project {
        name: &'a str,
        root: &'a Path,
        rules_dir: &'a Path,
    },
    ConfigWarning {
        key: &'a str,
        file: &'a Path,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestion: Option<&'a str>,
    },
    EnvWarning {
        message: &'a str,
    },
    TemplateSource {
        source: Option<&'a TemplateSource>,
    },
    Setup(&'a SetupReport),
    Validation(&'a ValidationReport),
    Rule(&'a RuleSummary),
    Watch(&'a WatchNotice),
    WatchDisabled,
    Change(&'a RuleChange),
    WatchError {
        key: String,
        message: String,
    },
    ServerStarted {
        command: &'a str,
        pid: u32,
        cwd: &'a Path,
    },
    ServerExited {
        code: Option<i32>,
    },
    ServerFailed {
        message: String,
    },
    Shutdown,
    McpConfig {
        path: &'a Path,
        snippet: &'a serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        written: Option<MergeOutcome>,
    },
    /// The current project is the template source itself
    TemplateProject {
        path: &'a Path,
    },
    Complete {
        command: &'a str,
        success: bool,
    },
    Error {
        command: &'a str,
        message: String,
    },
}

impl<'a> Event<'a> {
    pub fn start(command: &'a str) -> Self {
        Event::Start {
            command,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn complete(command: &'a str, success: bool) -> Self {
        Event::Complete { command, success }
    }
}
