use std::path::Path;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use ruledeck::rules::validate_dir;
use ruledeck::{ServerProcess, ServerSpec, WatchHandle};

use crate::cli::Cli;
use crate::commands::{interrupt_flag, report_batch, start_watch, watch_manager, Workspace};
use crate::ui::context::UiContext;
use crate::ui::json::Event;
use crate::ui::terminal::Stream;
use crate::ui::views;

/// How long one loop iteration waits for watch activity
const TICK: Duration = Duration::from_millis(50);

pub fn cmd_serve(cli: &Cli, templates: Option<&Path>, no_watch: bool) -> Result<i32> {
    let ws = Workspace::load(cli.project.as_deref())?;
    let ui = ws.ui(cli, Stream::Stderr);

    ui.event(&Event::start("serve"));
    ws.report(&ui);
    ui.show(|color, unicode| {
        views::serve::render_serve_header(
            &ws.project.name,
            &ws.project.root.display().to_string(),
            &ws.rules_dir.display().to_string(),
            color,
            unicode,
        )
    });

    let source = ws.template_source(templates);
    let report = ws.setup(&ui, source.as_ref(), false)?;

    // Problems are reported, never fatal here
    let validation = validate_dir(&ws.rules_dir, &ws.filter)
        .with_context(|| format!("Failed to validate {}", ws.rules_dir.display()))?;
    ui.event(&Event::Validation(&validation));
    ui.show(|color, unicode| views::check::render_validation(&validation, color, unicode));
    ui.show(|color, unicode| {
        views::setup::render_available(
            &ws.project.name,
            &report.available,
            ws.filter.as_str(),
            color,
            unicode,
        )
    });

    let running = interrupt_flag()?;

    let manager = if no_watch {
        None
    } else {
        watch_manager(&ws.config().watch)
    };
    let mut handle = match manager {
        Some(manager) => start_watch(&ui, &manager, ws.target()),
        None => {
            ui.event(&Event::WatchDisabled);
            None
        }
    };

    let spec = ServerSpec::from_config(&ws.config().server, &ws.rules_dir);
    let mut server = match ServerProcess::spawn(&spec) {
        Ok(server) => server,
        Err(e) => {
            close(&mut handle);
            let message = e.to_string();
            ui.event(&Event::ServerFailed {
                message: message.clone(),
            });
            ui.show(|color, unicode| views::serve::render_server_failed(&message, color, unicode));
            ui.event(&Event::complete("serve", false));
            return Ok(1);
        }
    };

    ui.event(&Event::ServerStarted {
        command: server.command_line(),
        pid: server.id(),
        cwd: &spec.cwd,
    });
    ui.show(|color, unicode| {
        views::serve::render_server_started(server.command_line(), server.id(), color, unicode)
    });

    run_until_exit(&ui, &mut server, &mut handle, || {
        !running.load(Ordering::SeqCst)
    })
}

/// Poll the watch handle and the server until one of them ends the session
fn run_until_exit(
    ui: &UiContext,
    server: &mut ServerProcess,
    handle: &mut Option<WatchHandle>,
    interrupted: impl Fn() -> bool,
) -> Result<i32> {
    loop {
        if interrupted() {
            ui.event(&Event::Shutdown);
            ui.show(views::watch::render_shutdown);
            close(handle);

            let exit = server.shutdown().context("Failed to stop the server")?;
            ui.event(&Event::ServerExited { code: exit.code });
            ui.event(&Event::complete("serve", true));
            return Ok(0);
        }

        if let Some(exit) = server.try_exit().context("Failed to poll the server")? {
            close(handle);
            ui.event(&Event::ServerExited { code: exit.code });
            ui.show(|color, unicode| views::serve::render_server_exited(exit, color, unicode));
            ui.event(&Event::complete("serve", exit.code == Some(0)));
            return Ok(exit.exit_code());
        }

        match handle.as_mut() {
            Some(handle) => report_batch(ui, handle.next_batch(TICK)),
            None => thread::sleep(TICK),
        }
    }
}

fn close(handle: &mut Option<WatchHandle>) {
    if let Some(handle) = handle.as_mut() {
        handle.close();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ui::terminal::TerminalCapabilities;
    use ruledeck::Config;
    use std::cell::Cell;

    fn quiet_ui() -> UiContext {
        let caps = TerminalCapabilities {
            is_tty: false,
            supports_color: false,
            supports_unicode: false,
            is_ci: false,
        };
        UiContext::from_caps(false, 0, None, &Config::default(), caps, Stream::Stderr)
    }

    fn sh(script: &str) -> ServerSpec {
        ServerSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            cwd: std::env::temp_dir(),
            env: Default::default(),
        }
    }

    #[test]
    fn child_exit_code_is_forwarded() {
        let mut server = ServerProcess::spawn(&sh("exit 7")).unwrap();
        let code = run_until_exit(&quiet_ui(), &mut server, &mut None, || false).unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn interrupt_kills_server_and_exits_cleanly() {
        let mut server = ServerProcess::spawn(&sh("sleep 30")).unwrap();
        let polls = Cell::new(0);
        let code = run_until_exit(&quiet_ui(), &mut server, &mut None, || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        })
        .unwrap();

        assert_eq!(code, 0);
        assert!(server.try_exit().unwrap().is_some());
    }
}
