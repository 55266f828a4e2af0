use std::path::Path;

use anyhow::Result;

use crate::cli::Cli;
use crate::commands::Workspace;
use crate::ui::json::Event;
use crate::ui::terminal::Stream;
use crate::ui::views;

pub fn cmd_init(cli: &Cli, templates: Option<&Path>, force: bool) -> Result<i32> {
    let ws = Workspace::load(cli.project.as_deref())?;
    let ui = ws.ui(cli, Stream::Stdout);

    ui.event(&Event::start("init"));
    ws.report(&ui);

    let source = ws.template_source(templates);
    ui.show(|color, unicode| {
        views::setup::render_init_header(
            &ws.project.name,
            &ws.rules_dir.display().to_string(),
            source.as_ref(),
            color,
            unicode,
        )
    });

    let report = ws.setup(&ui, source.as_ref(), force)?;
    ui.show(|color, unicode| {
        views::setup::render_available(
            &ws.project.name,
            &report.available,
            ws.filter.as_str(),
            color,
            unicode,
        )
    });

    ui.event(&Event::complete("init", true));
    Ok(0)
}
