//! Runs the suite in Chromium against a running deployment.
//!
//! Skipped unless `ALERTS_E2E_BASE_URL` points at the application.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use alerts_e2e::config::ENV_BASE_URL;
use alerts_e2e::prelude::*;
use alerts_e2e::{BrowserSessions, E2eError};

macro_rules! require_deployment {
    () => {
        if std::env::var(ENV_BASE_URL).map_or(true, |v| v.is_empty()) {
            eprintln!("skipping: {ENV_BASE_URL} is not set");
            return;
        }
    };
}

fn live_config() -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.apply_env().expect("environment overrides should be valid");
    config
}

#[tokio::test]
async fn test_live_suite() {
    require_deployment!();
    let config = live_config();
    let sessions = match BrowserSessions::launch(config.clone()).await {
        Ok(sessions) => sessions,
        Err(E2eError::BrowserNotFound) => {
            eprintln!("skipping: no Chromium available");
            return;
        }
        Err(e) => panic!("browser launch failed: {e}"),
    };

    let runner = SuiteRunner::new(config);
    let results = runner
        .run(&sessions, &scenarios::all(), |r| {
            eprintln!("{} [{}] {}", if r.passed { "ok" } else { "FAILED" }, r.screen, r.name);
        })
        .await;
    sessions.shutdown().await.unwrap();

    assert!(results.all_passed(), "{:#?}", results.failures());
}
