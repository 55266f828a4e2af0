//! ruledeck CLI - rule files for MCP-aware IDEs
//!
//! Usage: ruledeck [COMMAND]
//!
//! Commands:
//!   serve   Set up rules, watch them and run the protocol server (default)
//!   init    Create the rules directory and copy template rules
//!   check   Validate rule file frontmatter
//!   list    List rule files
//!   watch   Watch the rules directory and report changes
//!   config  Print or write the mcp.json entry

mod cli;
mod commands;
mod ui;

use clap::Parser;

use ruledeck::Config;

use crate::cli::Cli;
use crate::ui::context::UiContext;
use crate::ui::json::Event;
use crate::ui::terminal::Stream;

fn main() {
    let cli = Cli::parse();

    let code = match commands::dispatch(&cli) {
        Ok(code) => code,
        Err(err) => {
            let command = cli.command_or_default();
            if cli.json {
                let ui = UiContext::new(
                    true,
                    cli.verbose,
                    cli.color,
                    &Config::default(),
                    commands::stream_for(&command),
                );
                ui.event(&Event::Error {
                    command: command.name(),
                    message: format!("{err:#}"),
                });
            } else {
                let ui = UiContext::new(
                    false,
                    cli.verbose,
                    cli.color,
                    &Config::default(),
                    Stream::Stderr,
                );
                ui.print(&ui::output::render_error(&err, ui.color, ui.unicode));
            }
            1
        }
    };

    std::process::exit(code);
}
