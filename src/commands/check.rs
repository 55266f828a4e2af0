use anyhow::{Context, Result};

use ruledeck::rules::validate_dir;

use crate::cli::Cli;
use crate::commands::Workspace;
use crate::ui::json::Event;
use crate::ui::terminal::Stream;
use crate::ui::views;

pub fn cmd_check(cli: &Cli, strict: bool) -> Result<i32> {
    let ws = Workspace::load(cli.project.as_deref())?;
    let ui = ws.ui(cli, Stream::Stdout);

    ui.event(&Event::start("check"));
    ws.report(&ui);

    let report = validate_dir(&ws.rules_dir, &ws.filter)
        .with_context(|| format!("Failed to validate {}", ws.rules_dir.display()))?;
    ui.event(&Event::Validation(&report));
    ui.show(|color, unicode| views::check::render_validation(&report, color, unicode));

    let success = report.is_clean() || !strict;
    ui.event(&Event::complete("check", success));
    Ok(if success { 0 } else { 1 })
}
