//! CLI argument parsing
//!
//! Global flags (--json, --color, --verbose, --project) are inherited by all
//! subcommands. Running without a subcommand is the same as `ruledeck serve`,
//! which is how the IDE launches the server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// ruledeck - serve, watch and manage IDE rule files
#[derive(Parser, Debug)]
#[command(name = "ruledeck")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'ruledeck' without arguments to start the rules server.")]
pub struct Cli {
    /// Emit NDJSON events instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project directory (skips discovery from the current directory)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Set up rules, watch them and run the protocol server (default)
    Serve {
        /// Template rules directory to copy from
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Do not watch the rules directory for changes
        #[arg(long)]
        no_watch: bool,
    },

    /// Create the rules directory and copy template rules into it
    Init {
        /// Template rules directory to copy from
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Overwrite rule files that already exist
        #[arg(short, long)]
        force: bool,
    },

    /// Validate rule file frontmatter
    Check {
        /// Exit non-zero when any rule has problems
        #[arg(long)]
        strict: bool,
    },

    /// List rule files with their description and globs
    List,

    /// Watch the rules directory and report changes
    Watch,

    /// Print (or write) the mcp.json entry for this project
    Config {
        /// Merge the entry into .cursor/mcp.json
        #[arg(long)]
        write: bool,
    },
}

impl Cli {
    /// The subcommand to run; `serve` when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            templates: None,
            no_watch: false,
        })
    }
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Serve { .. } => "serve",
            Commands::Init { .. } => "init",
            Commands::Check { .. } => "check",
            Commands::List => "list",
            Commands::Watch => "watch",
            Commands::Config { .. } => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["ruledeck"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(
            cli.command_or_default(),
            Commands::Serve {
                templates: None,
                no_watch: false
            }
        );
    }

    #[test]
    fn test_cli_parse_serve_with_args() {
        let cli = Cli::try_parse_from([
            "ruledeck",
            "serve",
            "--templates",
            "~/rule-templates/.cursor/rules",
            "--no-watch",
        ])
        .unwrap();
        if let Some(Commands::Serve {
            templates,
            no_watch,
        }) = cli.command
        {
            assert_eq!(
                templates,
                Some(PathBuf::from("~/rule-templates/.cursor/rules"))
            );
            assert!(no_watch);
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_init_force_short_flag() {
        let cli = Cli::try_parse_from(["ruledeck", "init", "-f"]).unwrap();
        if let Some(Commands::Init { force, templates }) = cli.command {
            assert!(force);
            assert!(templates.is_none());
        } else {
            panic!("Expected Init command");
        }
    }

    #[test]
    fn test_cli_parse_check_strict() {
        let cli = Cli::try_parse_from(["ruledeck", "check", "--strict"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Check { strict: true }));
    }

    #[test]
    fn test_cli_parse_list_and_watch() {
        let cli = Cli::try_parse_from(["ruledeck", "list"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List));

        let cli = Cli::try_parse_from(["ruledeck", "watch"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Watch));
    }

    #[test]
    fn test_cli_parse_config_write() {
        let cli = Cli::try_parse_from(["ruledeck", "config", "--write"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Config { write: true }));
    }

    #[test]
    fn test_cli_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["ruledeck", "check", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Check { .. })));
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["ruledeck", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_color_flag() {
        let cli = Cli::try_parse_from(["ruledeck", "--color", "never", "list"]).unwrap();
        assert!(matches!(cli.color, Some(ColorWhen::Never)));
    }

    #[test]
    fn test_cli_project_flag_is_global() {
        let cli = Cli::try_parse_from(["ruledeck", "list", "--project", "/work/app"]).unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/work/app")));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["ruledeck", "deploy"]).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Commands::List.name(), "list");
        assert_eq!(Commands::Config { write: false }.name(), "config");
    }
}
