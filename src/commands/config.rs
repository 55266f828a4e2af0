use anyhow::{Context, Result};

use ruledeck::mcp_config::{mcp_config_path, write_entry, McpServerEntry};
use ruledeck::project::is_template_project;

use crate::cli::Cli;
use crate::commands::Workspace;
use crate::ui::json::Event;
use crate::ui::terminal::Stream;
use crate::ui::views;

pub fn cmd_config(cli: &Cli, write: bool) -> Result<i32> {
    let ws = Workspace::load(cli.project.as_deref())?;
    let ui = ws.ui(cli, Stream::Stdout);

    ui.event(&Event::start("config"));
    ws.report(&ui);

    let exe = std::env::current_exe().context("Failed to locate the ruledeck executable")?;
    ui.show(|color, unicode| {
        views::config::render_config_header(
            &ws.project.name,
            &exe.display().to_string(),
            color,
            unicode,
        )
    });

    // Registering the server inside its own template project loads it twice
    if is_template_project(&ws.project.root) {
        ui.event(&Event::TemplateProject {
            path: &ws.project.root,
        });
        ui.show(|color, unicode| {
            views::config::render_template_project_warning(&ws.project.root, color, unicode)
        });
        ui.event(&Event::complete("config", true));
        return Ok(0);
    }

    let entry = McpServerEntry::for_executable(&exe);
    let snippet = entry.snippet()?;
    let target = mcp_config_path(&ws.project.root);

    let written = if write {
        let outcome = write_entry(&target, &entry)
            .with_context(|| format!("Failed to update {}", target.display()))?;
        ui.show(|color, unicode| views::config::render_written(&target, outcome, color, unicode));
        Some(outcome)
    } else {
        let pretty = serde_json::to_string_pretty(&snippet)?;
        ui.show(|color, unicode| views::config::render_snippet(&pretty, &target, color, unicode));
        None
    };

    ui.event(&Event::McpConfig {
        path: &target,
        snippet: &snippet,
        written,
    });
    ui.event(&Event::complete("config", true));
    Ok(0)
}
