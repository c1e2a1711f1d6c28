//! Alerts E2E CLI library
//!
//! Command-line front end for the Alerts end-to-end suite.
//!
//! ## Usage
//!
//! ```bash
//! alerts-e2e run                           # Run every scenario in Chromium
//! alerts-e2e run --simulate                # Run against the in-memory app
//! alerts-e2e run --screen mobile -f logs   # One screen, filtered
//! alerts-e2e list                          # List scenarios
//! alerts-e2e config --config suite.yaml    # Show effective configuration
//! ```

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FormatArg, ListArgs, RunArgs, ScreenArg, SuiteArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{summary_line, write_json, OutputFormat, ProgressReporter};
pub use runner::{
    list_scenarios, render_config, resolve_suite_config, resolve_suite_config_with, TestRunner,
};
