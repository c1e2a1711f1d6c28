//! Test harness for running the scenario suite.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{ScreenFormat, SuiteConfig};
use crate::result::{E2eError, E2eResult};
use crate::scenarios::{Scenario, Session};
use crate::sim::SimulatedApp;

/// Opens a fresh, isolated session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// New session emulating `screen`
    async fn open(&self, screen: ScreenFormat) -> E2eResult<Session>;

    /// Tear a session down
    async fn close(&self, mut session: Session) -> E2eResult<()> {
        session.ui.close().await
    }
}

/// Sessions on a fresh in-memory deployment each
#[derive(Debug, Clone)]
pub struct SimulatedSessions {
    config: SuiteConfig,
}

impl SimulatedSessions {
    /// Create a factory
    #[must_use]
    pub const fn new(config: SuiteConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for SimulatedSessions {
    async fn open(&self, screen: ScreenFormat) -> E2eResult<Session> {
        let app = SimulatedApp::new(self.config.user_name.clone())
            .with_page_size(self.config.log_page_size);
        let ui = app.open(screen);
        Ok(Session {
            seed: Arc::new(app),
            ui: Box::new(ui),
            config: self.config.clone(),
        })
    }
}

#[cfg(all(feature = "browser", feature = "http"))]
mod live {
    use super::{Session, SessionFactory};
    use crate::browser::Browser;
    use crate::config::{ScreenFormat, SuiteConfig};
    use crate::result::E2eResult;
    use crate::seed::HttpSeedApi;
    use crate::ui::BrowserUi;
    use async_trait::async_trait;
    use std::sync::Arc;
    use url::Url;

    /// Sessions on a real browser against a running deployment
    #[derive(Debug)]
    pub struct BrowserSessions {
        config: SuiteConfig,
        app_base: Url,
        browser: Browser,
        seed: Arc<HttpSeedApi>,
    }

    impl BrowserSessions {
        /// Launch the browser
        ///
        /// # Errors
        ///
        /// Returns error if the configuration is invalid or Chromium fails to launch
        pub async fn launch(config: SuiteConfig) -> E2eResult<Self> {
            config.validate()?;
            let app_base = config.app_base()?;
            let seed = Arc::new(HttpSeedApi::new(config.api_base()?));
            let browser = Browser::launch(config.browser.clone()).await?;
            Ok(Self {
                config,
                app_base,
                browser,
                seed,
            })
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Returns error if the browser does not shut down cleanly
        pub async fn shutdown(self) -> E2eResult<()> {
            self.browser.close().await
        }
    }

    #[async_trait]
    impl SessionFactory for BrowserSessions {
        async fn open(&self, screen: ScreenFormat) -> E2eResult<Session> {
            let driver = self.browser.new_page(screen).await?;
            Ok(Session {
                seed: self.seed.clone(),
                ui: Box::new(BrowserUi::new(driver, self.app_base.clone(), screen)),
                config: self.config.clone(),
            })
        }
    }
}

#[cfg(all(feature = "browser", feature = "http"))]
pub use live::BrowserSessions;

/// Result of running a single scenario on one screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// `group: name`
    pub name: String,
    /// Feature group
    pub group: String,
    /// Scenario name
    pub scenario: String,
    /// Screen format it ran on
    pub screen: ScreenFormat,
    /// Whether the scenario passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl TestResult {
    /// Create a passing result
    #[must_use]
    pub fn pass(scenario: &Scenario, screen: ScreenFormat) -> Self {
        Self {
            name: scenario.full_name(),
            group: scenario.group.to_string(),
            scenario: scenario.name.to_string(),
            screen,
            passed: true,
            error: None,
            duration_ms: 0,
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(scenario: &Scenario, screen: ScreenFormat, error: impl Into<String>) -> Self {
        Self {
            passed: false,
            error: Some(error.into()),
            ..Self::pass(scenario, screen)
        }
    }

    /// Set duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Duration of the run
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Results from running the suite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Individual results
    pub results: Vec<TestResult>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteResults {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

/// Runs scenarios sequentially, each in a fresh session
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    config: SuiteConfig,
    /// Whether to stop on first failure
    pub fail_fast: bool,
    /// Only run scenarios whose full name contains this
    pub filter: Option<String>,
}

impl SuiteRunner {
    /// Create a runner
    #[must_use]
    pub const fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            fail_fast: false,
            filter: None,
        }
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Restrict to matching scenarios
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Scenarios that pass the filter
    #[must_use]
    pub fn select(&self, scenarios: &[Scenario]) -> Vec<Scenario> {
        scenarios
            .iter()
            .filter(|s| self.filter.as_deref().map_or(true, |f| s.matches(f)))
            .copied()
            .collect()
    }

    /// Number of runs `run` would perform
    #[must_use]
    pub fn planned(&self, scenarios: &[Scenario]) -> usize {
        self.select(scenarios).len() * self.config.screens().len()
    }

    /// Run every selected scenario on every configured screen
    pub async fn run<F>(
        &self,
        factory: &F,
        scenarios: &[Scenario],
        mut on_result: impl FnMut(&TestResult),
    ) -> SuiteResults
    where
        F: SessionFactory + ?Sized,
    {
        let start = Instant::now();
        let selected = self.select(scenarios);
        let mut results = Vec::new();

        'screens: for screen in self.config.screens() {
            for scenario in &selected {
                let result = self.run_one(factory, scenario, screen).await;
                on_result(&result);
                let failed = !result.passed;
                results.push(result);
                if failed && self.fail_fast {
                    break 'screens;
                }
            }
        }

        SuiteResults {
            results,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    async fn run_one<F>(&self, factory: &F, scenario: &Scenario, screen: ScreenFormat) -> TestResult
    where
        F: SessionFactory + ?Sized,
    {
        let start = Instant::now();
        let name = scenario.full_name();
        tracing::info!(scenario = %name, %screen, "running");

        let mut session = match factory.open(screen).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(scenario = %name, %screen, error = %e, "session failed to open");
                return TestResult::fail(scenario, screen, e.to_string())
                    .with_duration(start.elapsed());
            }
        };

        let timeout = self.config.scenario_timeout();
        let outcome = match tokio::time::timeout(timeout, (scenario.run)(&mut session)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(E2eError::Timeout {
                ms: self.config.scenario_timeout_ms,
            }),
        };

        if let Err(e) = factory.close(session).await {
            tracing::warn!(scenario = %name, error = %e, "session did not close cleanly");
        }

        let result = match outcome {
            Ok(()) => {
                tracing::info!(scenario = %name, %screen, "passed");
                TestResult::pass(scenario, screen)
            }
            Err(e) => {
                tracing::warn!(scenario = %name, %screen, error = %e, "failed");
                TestResult::fail(scenario, screen, e.to_string())
            }
        };
        result.with_duration(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;
    use futures::future::{BoxFuture, FutureExt};

    fn passing(_: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
        async { Ok(()) }.boxed()
    }

    fn failing(_: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
        async { Err(E2eError::assertion("boom")) }.boxed()
    }

    fn hanging(_: &mut Session) -> BoxFuture<'_, E2eResult<()>> {
        async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
        .boxed()
    }

    const FAKE: [Scenario; 3] = [
        Scenario {
            group: "G",
            name: "passes",
            run: passing,
        },
        Scenario {
            group: "G",
            name: "fails",
            run: failing,
        },
        Scenario {
            group: "G",
            name: "hangs",
            run: hanging,
        },
    ];

    fn config(screen: Option<ScreenFormat>) -> SuiteConfig {
        SuiteConfig {
            screen,
            scenario_timeout_ms: 50,
            ..SuiteConfig::default()
        }
    }

    mod test_result_tests {
        use super::*;

        #[test]
        fn test_pass_and_fail() {
            let pass = TestResult::pass(&FAKE[0], ScreenFormat::Mobile);
            assert!(pass.passed);
            assert_eq!(pass.name, "G: passes");

            let fail = TestResult::fail(&FAKE[1], ScreenFormat::Widescreen, "boom")
                .with_duration(Duration::from_millis(12));
            assert!(!fail.passed);
            assert_eq!(fail.error.as_deref(), Some("boom"));
            assert_eq!(fail.duration(), Duration::from_millis(12));
        }

        #[test]
        fn test_serializes_screen_lowercase() {
            let json = serde_json::to_value(TestResult::pass(&FAKE[0], ScreenFormat::Mobile)).unwrap();
            assert_eq!(json["screen"], "mobile");
        }
    }

    #[tokio::test]
    async fn test_runner_collects_pass_fail_and_timeout() {
        let runner = SuiteRunner::new(config(Some(ScreenFormat::Widescreen)));
        let factory = SimulatedSessions::new(runner.config().clone());
        let mut seen = 0;
        let results = runner.run(&factory, &FAKE, |_| seen += 1).await;

        assert_eq!(seen, 3);
        assert_eq!(results.passed_count(), 1);
        assert_eq!(results.failed_count(), 2);
        let timeout = &results.failures()[1];
        assert!(timeout.error.as_deref().unwrap().contains("timed out after 50ms"));
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_failure() {
        let runner = SuiteRunner::new(config(None)).with_fail_fast();
        let factory = SimulatedSessions::new(runner.config().clone());
        let results = runner.run(&factory, &FAKE, |_| {}).await;
        assert_eq!(results.total(), 2);
        assert!(!results.all_passed());
    }

    #[tokio::test]
    async fn test_filter_and_screens() {
        let runner = SuiteRunner::new(config(None)).with_filter("PASSES");
        assert_eq!(runner.select(&FAKE).len(), 1);
        assert_eq!(runner.planned(&FAKE), 2);
        let factory = SimulatedSessions::new(runner.config().clone());
        let results = runner.run(&factory, &FAKE, |_| {}).await;
        let screens: Vec<_> = results.results.iter().map(|r| r.screen).collect();
        assert_eq!(screens, vec![ScreenFormat::Widescreen, ScreenFormat::Mobile]);
    }

    #[tokio::test]
    async fn test_full_suite_passes_against_simulator() {
        let runner = SuiteRunner::new(SuiteConfig::default());
        let factory = SimulatedSessions::new(runner.config().clone());
        let results = runner.run(&factory, &scenarios::all(), |_| {}).await;
        assert!(results.all_passed(), "{:#?}", results.failures());
        assert_eq!(results.total(), 30);
    }
}
