//! CLI module for LabDash
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the dashboard server
//! - `widgets` - Inspect configured widgets (list, fetch)
//! - `config` - Configuration utilities (init, check)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! labdash serve
//!
//! # Fetch one widget once and print it
//! labdash widgets fetch Movies --json
//!
//! # Generate shell completions
//! labdash completions bash > ~/.bash_completion.d/labdash
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod widgets;

pub use completions::handle_completions;
pub use config::{handle_config_check, handle_config_init};
pub use widgets::{handle_widgets_fetch, handle_widgets_list};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// LabDash - home-lab dashboard
#[derive(Parser, Debug)]
#[command(
    name = "labdash",
    version,
    about = "Home-lab dashboard with live service statistics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dashboard server
    Serve(ServeArgs),
    /// Inspect configured widgets
    #[command(subcommand)]
    Widgets(WidgetsCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "labdash.toml", env = "LABDASH_CONFIG")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "LABDASH_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "LABDASH_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LABDASH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum WidgetsCommands {
    /// List configured widgets, including skipped ones
    List(WidgetsListArgs),
    /// Fetch statistics once and print them
    Fetch(WidgetsFetchArgs),
}

#[derive(Args, Debug)]
pub struct WidgetsListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "labdash.toml", env = "LABDASH_CONFIG")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct WidgetsFetchArgs {
    /// Widget name (all enabled widgets when omitted)
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "labdash.toml", env = "LABDASH_CONFIG")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
    /// Parse and validate a configuration file
    Check(ConfigCheckArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "labdash.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigCheckArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "labdash.toml", env = "LABDASH_CONFIG")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["labdash", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_config() {
        let cli = Cli::try_parse_from(["labdash", "serve", "-c", "custom.toml"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.config, PathBuf::from("custom.toml")),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_widgets_list_json() {
        let cli = Cli::try_parse_from(["labdash", "widgets", "list", "--json"]).unwrap();
        match cli.command {
            Commands::Widgets(WidgetsCommands::List(args)) => assert!(args.json),
            _ => panic!("Expected Widgets List command"),
        }
    }

    #[test]
    fn test_cli_parse_widgets_fetch_named() {
        let cli = Cli::try_parse_from(["labdash", "widgets", "fetch", "Movies"]).unwrap();
        match cli.command {
            Commands::Widgets(WidgetsCommands::Fetch(args)) => {
                assert_eq!(args.name.as_deref(), Some("Movies"));
                assert!(!args.json);
            }
            _ => panic!("Expected Widgets Fetch command"),
        }
    }

    #[test]
    fn test_cli_parse_widgets_fetch_all() {
        let cli = Cli::try_parse_from(["labdash", "widgets", "fetch"]).unwrap();
        match cli.command {
            Commands::Widgets(WidgetsCommands::Fetch(args)) => assert!(args.name.is_none()),
            _ => panic!("Expected Widgets Fetch command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init_force() {
        let cli =
            Cli::try_parse_from(["labdash", "config", "init", "-o", "out.toml", "--force"])
                .unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert_eq!(args.output, PathBuf::from("out.toml"));
                assert!(args.force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_parse_config_check() {
        let cli = Cli::try_parse_from(["labdash", "config", "check", "-c", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Check(_))
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["labdash", "backends"]).is_err());
    }
}
