use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Result;

use crate::cli::Cli;
use crate::commands::{interrupt_flag, report_batch, start_watch, watch_manager, Workspace};
use crate::ui::json::Event;
use crate::ui::primitives::icon::Icon;
use crate::ui::terminal::Stream;
use crate::ui::views;

const POLL: Duration = Duration::from_millis(100);

pub fn cmd_watch(cli: &Cli) -> Result<i32> {
    let ws = Workspace::load(cli.project.as_deref())?;
    let ui = ws.ui(cli, Stream::Stdout);

    ui.event(&Event::start("watch"));
    ws.report(&ui);
    ui.show(|color, unicode| {
        views::watch::render_watch_header(
            &ws.project.name,
            &ws.rules_dir.display().to_string(),
            color,
            unicode,
        )
    });

    let Some(manager) = watch_manager(&ws.config().watch) else {
        ui.event(&Event::WatchDisabled);
        ui.show(|color, unicode| {
            format!(
                "{} Watching is disabled in the config\n",
                Icon::Warning.colored(color, unicode)
            )
        });
        ui.event(&Event::complete("watch", true));
        return Ok(0);
    };

    let running = interrupt_flag()?;
    let Some(mut handle) = start_watch(&ui, &manager, ws.target()) else {
        ui.event(&Event::complete("watch", true));
        return Ok(0);
    };

    while running.load(Ordering::SeqCst) {
        report_batch(&ui, handle.next_batch(POLL));
    }

    ui.event(&Event::Shutdown);
    ui.show(views::watch::render_shutdown);
    handle.close();
    ui.event(&Event::complete("watch", true));
    Ok(0)
}
