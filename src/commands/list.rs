use anyhow::{Context, Result};

use ruledeck::rules::describe_rules;

use crate::cli::Cli;
use crate::commands::Workspace;
use crate::ui::json::Event;
use crate::ui::terminal::Stream;
use crate::ui::views;

pub fn cmd_list(cli: &Cli) -> Result<i32> {
    let ws = Workspace::load(cli.project.as_deref())?;
    let ui = ws.ui(cli, Stream::Stdout);

    ui.event(&Event::start("list"));
    ws.report(&ui);

    let rules = describe_rules(&ws.rules_dir, &ws.filter)
        .with_context(|| format!("Failed to list {}", ws.rules_dir.display()))?;
    for rule in &rules {
        ui.event(&Event::Rule(rule));
    }
    ui.show(|color, unicode| {
        views::list::render_rule_list(
            &ws.rules_dir.display().to_string(),
            &rules,
            color,
            unicode,
        )
    });

    ui.event(&Event::complete("list", true));
    Ok(0)
}
