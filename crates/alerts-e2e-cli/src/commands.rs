//! CLI command definitions using clap

use alerts_e2e::ScreenFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// End-to-end suite for the Alerts UI
#[derive(Parser, Debug)]
#[command(name = "alerts-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario suite
    Run(RunArgs),

    /// List scenarios
    List(ListArgs),

    /// Show the effective suite configuration
    Config(ConfigArgs),
}

/// Options shared by commands that resolve a suite configuration
#[derive(Parser, Debug, Default, Clone)]
pub struct SuiteArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the application under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// Base URL of the fixture API (defaults to the base URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Run only this screen format
    #[arg(long)]
    pub screen: Option<ScreenArg>,

    /// Display name of the user the application runs as
    #[arg(long)]
    pub user: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers)
    #[arg(long)]
    pub no_sandbox: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suite configuration
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Only run scenarios whose name contains this
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop at the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Run against the in-memory reference application instead of a browser
    #[arg(long)]
    pub simulate: bool,

    /// Result format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list scenarios whose name contains this
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Suite configuration
    #[command(flatten)]
    pub suite: SuiteArgs,
}

/// Screen format argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenArg {
    /// Desktop layout
    Widescreen,
    /// Phone layout
    Mobile,
}

impl From<ScreenArg> for ScreenFormat {
    fn from(arg: ScreenArg) -> Self {
        match arg {
            ScreenArg::Widescreen => Self::Widescreen,
            ScreenArg::Mobile => Self::Mobile,
        }
    }
}

/// Result format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_run_command() {
            let cli = Cli::parse_from(["alerts-e2e", "run"]);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(!args.simulate);
            assert_eq!(args.format, FormatArg::Text);
            assert!(args.suite.config.is_none());
        }

        #[test]
        fn test_parse_run_flags() {
            let cli = Cli::parse_from([
                "alerts-e2e",
                "-vv",
                "run",
                "--simulate",
                "--screen",
                "mobile",
                "--filter",
                "checkboxes",
                "--fail-fast",
                "--format",
                "json",
                "--base-url",
                "http://localhost:9999",
            ]);
            assert_eq!(cli.verbose, 2);
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert!(args.simulate && args.fail_fast);
            assert_eq!(args.suite.screen, Some(ScreenArg::Mobile));
            assert_eq!(args.filter.as_deref(), Some("checkboxes"));
            assert_eq!(args.format, FormatArg::Json);
            assert_eq!(args.suite.base_url.as_deref(), Some("http://localhost:9999"));
        }

        #[test]
        fn test_parse_list_and_config() {
            let cli = Cli::parse_from(["alerts-e2e", "list", "-f", "logs"]);
            assert!(matches!(cli.command, Commands::List(ListArgs { filter: Some(_) })));
            let cli = Cli::parse_from(["alerts-e2e", "config", "--user", "Night Shift"]);
            let Commands::Config(args) = cli.command else {
                panic!("expected config");
            };
            assert_eq!(args.suite.user.as_deref(), Some("Night Shift"));
        }

        #[test]
        fn test_unknown_screen_rejected() {
            assert!(Cli::try_parse_from(["alerts-e2e", "run", "--screen", "tablet"]).is_err());
        }
    }

    mod conversion_tests {
        use super::*;
        use crate::config::ColorChoice;

        #[test]
        fn test_args_convert() {
            assert_eq!(ScreenFormat::from(ScreenArg::Mobile), ScreenFormat::Mobile);
            assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }
    }
}
