//! Suite runner wiring: configuration resolution and session backends

use alerts_e2e::{scenarios, E2eError, SimulatedSessions, SuiteConfig, SuiteResults, SuiteRunner};
use std::io::Write;
use std::time::Duration;

use crate::commands::{RunArgs, SuiteArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{write_json, OutputFormat, ProgressReporter};

/// Resolve the suite configuration from the process environment
///
/// Precedence, lowest first: defaults, `--config` file, environment, flags.
///
/// # Errors
///
/// Returns error if the file cannot be loaded or a value is invalid
pub fn resolve_suite_config(args: &SuiteArgs) -> CliResult<SuiteConfig> {
    resolve_suite_config_with(args, |key| std::env::var(key).ok())
}

/// Resolve the suite configuration with an explicit variable lookup
///
/// # Errors
///
/// Returns error if the file cannot be loaded or a value is invalid
pub fn resolve_suite_config_with(
    args: &SuiteArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<SuiteConfig> {
    let mut config = match args.config {
        Some(ref path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };
    config.apply_env_from(lookup)?;

    if let Some(ref url) = args.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(ref url) = args.api_url {
        config.api_url = Some(url.clone());
    }
    if let Some(screen) = args.screen {
        config.screen = Some(screen.into());
    }
    if let Some(ref user) = args.user {
        config.user_name.clone_from(user);
    }
    if args.headed {
        config.browser.headless = false;
    }
    if args.no_sandbox {
        config.browser.sandbox = false;
    }

    config.validate()?;
    Ok(config)
}

/// Effective configuration as YAML
///
/// # Errors
///
/// Returns error if serialization fails
pub fn render_config(config: &SuiteConfig) -> CliResult<String> {
    Ok(serde_yaml_ng::to_string(config).map_err(E2eError::from)?)
}

/// Runs the scenario suite and reports progress
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl TestRunner {
    /// Create a new test runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Run the suite described by `args`
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid, the session backend cannot
    /// start, or any scenario fails
    pub fn run(&mut self, args: &RunArgs) -> CliResult<SuiteResults> {
        let suite = resolve_suite_config(&args.suite)?;
        let mut runner = SuiteRunner::new(suite);
        runner.fail_fast = args.fail_fast;
        runner.filter.clone_from(&args.filter);

        let all = scenarios::all();
        let planned = runner.planned(&all);
        if planned == 0 {
            return Err(CliError::invalid_argument(format!(
                "no scenario matches filter {:?}",
                args.filter.as_deref().unwrap_or_default()
            )));
        }

        let backend = if args.simulate { "simulator" } else { "browser" };
        tracing::info!(planned, backend, base_url = %runner.config().base_url, "starting suite");
        if self.config.verbosity.is_verbose() {
            self.reporter.header(&format!("Running {planned} scenarios ({backend})"));
        }
        self.reporter.start_progress(planned as u64, backend);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let reporter = &self.reporter;
        let results = runtime.block_on(async {
            if args.simulate {
                let sessions = SimulatedSessions::new(runner.config().clone());
                return Ok(runner.run(&sessions, &all, |r| reporter.result(r)).await);
            }
            run_in_browser(&runner, &all, reporter).await
        });
        self.reporter.finish();
        let results = results?;

        self.report(&results)?;

        if results.all_passed() {
            Ok(results)
        } else {
            Err(CliError::test_execution(format!(
                "{} of {} scenarios failed",
                results.failed_count(),
                results.total()
            )))
        }
    }

    fn report(&self, results: &SuiteResults) -> CliResult<()> {
        match self.config.format {
            OutputFormat::Json => write_json(results, &mut std::io::stdout().lock()),
            OutputFormat::Text => {
                self.reporter.summary(
                    results.passed_count(),
                    results.failed_count(),
                    Duration::from_millis(results.duration_ms),
                );
                for failure in results.failures() {
                    tracing::debug!(scenario = %failure.name, screen = %failure.screen, "failed");
                }
                std::io::stderr().flush()?;
                Ok(())
            }
        }
    }
}

#[cfg(feature = "browser")]
async fn run_in_browser(
    runner: &SuiteRunner,
    all: &[scenarios::Scenario],
    reporter: &ProgressReporter,
) -> CliResult<SuiteResults> {
    let sessions = alerts_e2e::BrowserSessions::launch(runner.config().clone()).await?;
    let results = runner.run(&sessions, all, |r| reporter.result(r)).await;
    if let Err(e) = sessions.shutdown().await {
        tracing::warn!(error = %e, "browser did not shut down cleanly");
    }
    Ok(results)
}

#[cfg(not(feature = "browser"))]
async fn run_in_browser(
    _runner: &SuiteRunner,
    _all: &[scenarios::Scenario],
    _reporter: &ProgressReporter,
) -> CliResult<SuiteResults> {
    Err(CliError::config(
        "built without the browser feature; rerun with --simulate",
    ))
}

/// Print scenario names, one per line
///
/// # Errors
///
/// Returns error if no scenario matches or stdout cannot be written
pub fn list_scenarios(filter: Option<&str>, out: &mut impl Write) -> CliResult<usize> {
    let mut count = 0;
    for scenario in scenarios::all()
        .iter()
        .filter(|s| filter.map_or(true, |f| s.matches(f)))
    {
        writeln!(out, "{}", scenario.full_name())?;
        count += 1;
    }
    if count == 0 {
        return Err(CliError::invalid_argument(format!(
            "no scenario matches filter {:?}",
            filter.unwrap_or_default()
        )));
    }
    Ok(count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::ScreenArg;
    use alerts_e2e::ScreenFormat;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod config_resolution_tests {
        use super::*;

        #[test]
        fn test_defaults_without_inputs() {
            let config = resolve_suite_config_with(&SuiteArgs::default(), env(&[])).unwrap();
            assert_eq!(config, SuiteConfig::default());
        }

        #[test]
        fn test_env_overrides_file_and_flags_override_env() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(
                &path,
                "base_url: http://from-file:3030\nuser_name: File User\nscenario_timeout_ms: 5000\n",
            )
            .unwrap();

            let args = SuiteArgs {
                config: Some(path),
                user: Some("Flag User".to_string()),
                screen: Some(ScreenArg::Mobile),
                no_sandbox: true,
                ..SuiteArgs::default()
            };
            let config = resolve_suite_config_with(
                &args,
                env(&[
                    ("ALERTS_E2E_BASE_URL", "http://from-env:8080"),
                    ("ALERTS_E2E_USER", "Env User"),
                ]),
            )
            .unwrap();

            assert_eq!(config.base_url, "http://from-env:8080");
            assert_eq!(config.user_name, "Flag User");
            assert_eq!(config.scenario_timeout_ms, 5000);
            assert_eq!(config.screen, Some(ScreenFormat::Mobile));
            assert!(!config.browser.sandbox);
        }

        #[test]
        fn test_invalid_flag_url_rejected() {
            let args = SuiteArgs {
                base_url: Some("localhost:3030".to_string()),
                ..SuiteArgs::default()
            };
            let err = resolve_suite_config_with(&args, env(&[])).unwrap_err();
            assert!(matches!(err, CliError::Suite(_)));
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let args = SuiteArgs {
                config: Some("/nonexistent/suite.yaml".into()),
                ..SuiteArgs::default()
            };
            let err = resolve_suite_config_with(&args, env(&[])).unwrap_err();
            assert!(matches!(err, CliError::Suite(E2eError::Io(_))));
        }

        #[test]
        fn test_render_config_roundtrips() {
            let config = SuiteConfig::default();
            let yaml = render_config(&config).unwrap();
            assert!(yaml.contains("base_url"));
            assert_eq!(SuiteConfig::from_yaml_str(&yaml).unwrap(), config);
        }
    }

    mod list_tests {
        use super::*;

        #[test]
        fn test_list_all() {
            let mut out = Vec::new();
            let count = list_scenarios(None, &mut out).unwrap();
            assert_eq!(count, scenarios::all().len());
            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("Alert Details Logs: should see load more"));
        }

        #[test]
        fn test_list_filtered() {
            let mut out = Vec::new();
            let count = list_scenarios(Some("checkboxes"), &mut out).unwrap();
            assert_eq!(count, 6);
        }

        #[test]
        fn test_list_no_match() {
            let mut out = Vec::new();
            assert!(list_scenarios(Some("no such scenario"), &mut out).is_err());
        }
    }
}
