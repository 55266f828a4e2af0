//! Command implementations
//!
//! Every command resolves a [`Workspace`] first, then talks to the user
//! through a [`UiContext`] bound to one output stream.

pub mod check;
pub mod config;
pub mod init;
pub mod list;
pub mod serve;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;

use ruledeck::config::{load_layered, LoadedConfig, WatchConfig};
use ruledeck::fs::expand_home;
use ruledeck::project::ProjectDir;
use ruledeck::rules::{setup_rules, SetupOptions, SetupReport};
use ruledeck::watcher::{WatchBatch, WatchHandle};
use ruledeck::{
    find_project_dir, resolve_template_source, Config, RuledeckError, SuffixFilter,
    TemplateSource, WatchManager, WatchTarget,
};

use crate::cli::{Cli, Commands};
use crate::ui::context::UiContext;
use crate::ui::json::Event;
use crate::ui::output::{print_config_warnings, print_env_warnings};
use crate::ui::terminal::Stream;
use crate::ui::views;

/// Run the selected command; returns the process exit code
pub fn dispatch(cli: &Cli) -> Result<i32> {
    match cli.command_or_default() {
        Commands::Serve {
            templates,
            no_watch,
        } => serve::cmd_serve(cli, templates.as_deref(), no_watch),
        Commands::Init { templates, force } => init::cmd_init(cli, templates.as_deref(), force),
        Commands::Check { strict } => check::cmd_check(cli, strict),
        Commands::List => list::cmd_list(cli),
        Commands::Watch => watch::cmd_watch(cli),
        Commands::Config { write } => config::cmd_config(cli, write),
    }
}

/// Where a command writes its output.
///
/// `serve` shares the process with the protocol stream on stdout.
pub fn stream_for(command: &Commands) -> Stream {
    match command {
        Commands::Serve { .. } => Stream::Stderr,
        _ => Stream::Stdout,
    }
}

/// Everything a command needs to know about where it runs
#[derive(Debug)]
pub struct Workspace {
    pub home: PathBuf,
    pub cwd: PathBuf,
    pub project: ProjectDir,
    pub loaded: LoadedConfig,
    pub rules_dir: PathBuf,
    pub filter: SuffixFilter,
}

impl Workspace {
    /// Discover the project (or take `--project`) and load its layered config
    pub fn load(project_flag: Option<&Path>) -> Result<Self> {
        let home = dirs::home_dir().ok_or(RuledeckError::NoHomeDir)?;
        let cwd = std::env::current_dir().context("Failed to read the current directory")?;

        let project = match project_flag {
            Some(dir) => {
                let root = cwd.join(expand_home(dir));
                if !root.is_dir() {
                    return Err(RuledeckError::DirectoryNotFound { path: root }.into());
                }
                ProjectDir::new(root)
            }
            None => find_project_dir(&cwd, &home)?,
        };

        let loaded = load_layered(Some(&project.root))
            .with_context(|| format!("Failed to load config for {}", project.root.display()))?;
        let rules_dir = project.rules_dir(&loaded.config.rules);
        let filter = SuffixFilter::new(loaded.config.rules.suffix());

        Ok(Self {
            home,
            cwd,
            project,
            loaded,
            rules_dir,
            filter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.loaded.config
    }

    pub fn ui(&self, cli: &Cli, stream: Stream) -> UiContext {
        UiContext::new(cli.json, cli.verbose, cli.color, self.config(), stream)
    }

    pub fn target(&self) -> WatchTarget {
        WatchTarget::new(&self.rules_dir, self.filter.clone())
    }

    pub fn template_source(&self, flag: Option<&Path>) -> Option<TemplateSource> {
        resolve_template_source(flag, &self.config().rules, &self.cwd, &self.home)
    }

    /// Emit the project event and any config warnings
    pub fn report(&self, ui: &UiContext) {
        ui.event(&Event::Project {
            name: &self.project.name,
            root: &self.project.root,
            rules_dir: &self.rules_dir,
        });
        print_config_warnings(ui, &self.loaded.warnings);
        print_env_warnings(ui, &self.loaded.env_warnings);

        if ui.verbose > 0 && !ui.json {
            for source in &self.loaded.sources {
                ui.print(&format!("  config: {}\n", source.display()));
            }
        }
    }

    /// Create the rules directory and copy templates into it
    pub fn setup(
        &self,
        ui: &UiContext,
        source: Option<&TemplateSource>,
        force: bool,
    ) -> Result<SetupReport> {
        ui.event(&Event::TemplateSource { source });

        let options = SetupOptions {
            project_name: &self.project.name,
            aliases: &self.config().rules.project_aliases,
            filter: &self.filter,
            force,
        };
        let report = setup_rules(
            &self.rules_dir,
            source.map(|s| s.rules_dir.as_path()),
            &options,
        )
        .with_context(|| format!("Failed to set up {}", self.rules_dir.display()))?;

        ui.event(&Event::Setup(&report));
        ui.show(|color, unicode| {
            views::setup::render_setup(&self.project.name, &report, color, unicode)
        });
        Ok(report)
    }
}

/// A flag that turns false on Ctrl+C or SIGTERM
pub fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;
    Ok(running)
}

/// Manager for the configured strategy ladder; `None` when watching is off
pub fn watch_manager(config: &WatchConfig) -> Option<WatchManager> {
    if !config.enabled {
        return None;
    }
    let manager = WatchManager::native();
    Some(if config.recursive {
        manager
    } else {
        manager.per_file_only()
    })
}

/// Start watching and route subscription errors through the UI
pub fn start_watch(
    ui: &UiContext,
    manager: &WatchManager,
    target: WatchTarget,
) -> Option<WatchHandle> {
    let outcome = manager.start(target);
    report_batch(
        ui,
        WatchBatch {
            changes: Vec::new(),
            notices: outcome.notices,
        },
    );

    let mut handle = outcome.handle?;
    let ui = *ui;
    handle.on_error(move |error| {
        ui.event(&Event::WatchError {
            key: error.key.to_string(),
            message: error.message.clone(),
        });
        ui.show(|color, unicode| {
            views::watch::render_watch_error(&timestamp(), error, color, unicode)
        });
    });
    Some(handle)
}

pub fn report_batch(ui: &UiContext, batch: WatchBatch) {
    for notice in &batch.notices {
        ui.event(&Event::Watch(notice));
        ui.show(|color, unicode| views::watch::render_notice(notice, color, unicode));
    }
    for change in &batch.changes {
        ui.event(&Event::Change(change));
        let at = change
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();
        ui.show(|color, unicode| views::watch::render_change(&at, change, color, unicode));
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
