//! IDE configuration (`.cursor/mcp.json`) generation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RuledeckError, RuledeckResult};
use crate::fs::write_atomic;

/// Name the server is registered under
pub const SERVER_NAME: &str = "ruledeck";

/// Location of the IDE's MCP configuration, relative to the project root
pub const MCP_CONFIG_FILE: &str = ".cursor/mcp.json";

/// One entry of the `mcpServers` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerEntry {
    pub command: String,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl McpServerEntry {
    /// Entry that launches `exe serve`
    pub fn for_executable(exe: &Path) -> Self {
        Self {
            command: exe.display().to_string(),
            args: vec!["serve".to_string()],
            env: BTreeMap::new(),
        }
    }

    /// `{"mcpServers": {"ruledeck": <entry>}}`
    pub fn snippet(&self) -> RuledeckResult<Value> {
        let mut servers = Map::new();
        servers.insert(SERVER_NAME.to_string(), serde_json::to_value(self)?);
        let mut root = Map::new();
        root.insert("mcpServers".to_string(), Value::Object(servers));
        Ok(Value::Object(root))
    }
}

/// Path of the MCP configuration for a project
pub fn mcp_config_path(project_root: &Path) -> PathBuf {
    project_root.join(MCP_CONFIG_FILE)
}

/// What [`write_entry`] did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    Created,
    Added,
    Updated,
    Unchanged,
}

/// Register `entry` in the MCP configuration at `path`.
///
/// Other servers and unrelated top-level keys are preserved.
pub fn write_entry(path: &Path, entry: &McpServerEntry) -> RuledeckResult<MergeOutcome> {
    let invalid = |message: &str| RuledeckError::InvalidConfig {
        file: path.to_path_buf(),
        message: message.to_string(),
    };

    let existing = match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Some(Map::new()),
        Ok(content) => match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Some(map),
            _ => return Err(invalid("expected a JSON object at the top level")),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let created = existing.is_none();
    let mut root = existing.unwrap_or_default();
    let servers = root
        .entry("mcpServers")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| invalid("\"mcpServers\" must be an object"))?;

    let new_value = serde_json::to_value(entry)?;
    let outcome = match servers.get(SERVER_NAME) {
        _ if created => MergeOutcome::Created,
        Some(current) if *current == new_value => return Ok(MergeOutcome::Unchanged),
        Some(_) => MergeOutcome::Updated,
        None => MergeOutcome::Added,
    };
    servers.insert(SERVER_NAME.to_string(), new_value);

    let mut content = serde_json::to_string_pretty(&Value::Object(root))?;
    content.push('\n');
    write_atomic(path, &content)?;
    Ok(outcome)
}
