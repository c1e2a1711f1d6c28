//! Alerts E2E CLI: run the Alerts UI suite from the command line

use alerts_e2e_cli::{
    list_scenarios, render_config, resolve_suite_config, Cli, CliConfig, CliResult, ColorChoice,
    Commands, OutputFormat, TestRunner, Verbosity,
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => {
            let config = config.with_format(OutputFormat::from(args.format));
            let mut runner = TestRunner::new(config);
            runner.run(&args).map(|_| ())
        }
        Commands::List(args) => {
            list_scenarios(args.filter.as_deref(), &mut std::io::stdout().lock())?;
            Ok(())
        }
        Commands::Config(args) => {
            let suite = resolve_suite_config(&args.suite)?;
            print!("{}", render_config(&suite)?);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
