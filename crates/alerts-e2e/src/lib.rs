//! Alerts E2E: end-to-end browser suite for the Alerts UI
//!
//! Every scenario seeds its own fixtures, navigates, performs user gestures
//! and polls the page until its expectations hold.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌──────────────────────┐  │
//! │   │ Scenarios  │    │ AlertsUi   │    │ BrowserUi (CDP)      │  │
//! │   │ + expect() │───►│ + SeedApi  │───►│ SimulatedUi (memory) │  │
//! │   └────────────┘    └────────────┘    └──────────────────────┘  │
//! │          ▲                                                       │
//! │   ┌────────────┐                                                 │
//! │   │ contract   │  search, selection, bulk, lifecycle, wizard,    │
//! │   │ model      │  log pagination rules                           │
//! │   └────────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `browser` feature enables Chromium control through chromiumoxide and
//! the `http` feature enables the fixture API client. Without them the suite
//! runs against the in-memory reference application in [`sim`].

#![warn(missing_docs)]

pub mod assertion;
pub mod browser;
pub mod config;
pub mod contract;
pub mod driver;
pub mod harness;
pub mod locator;
pub mod model;
mod result;
pub mod scenarios;
pub mod seed;
pub mod sim;
pub mod ui;

pub use assertion::{eventually, expect, AssertionCheckResult, Expect, RetryConfig};
#[cfg(feature = "browser")]
pub use browser::{Browser, ChromiumDriver};
pub use browser::BrowserConfig;
pub use config::{ScreenFormat, SuiteConfig};
pub use driver::{MockDriver, PageDriver};
#[cfg(all(feature = "browser", feature = "http"))]
pub use harness::BrowserSessions;
pub use harness::{SessionFactory, SimulatedSessions, SuiteResults, SuiteRunner, TestResult};
pub use locator::Selector;
pub use model::{Alert, AlertLogs, AlertNumber, AlertStatus, Service, ServiceId};
pub use result::{ContractError, E2eError, E2eResult};
pub use scenarios::{Scenario, Session};
#[cfg(feature = "http")]
pub use seed::HttpSeedApi;
pub use seed::{AlertLogsOptions, AlertOptions, SeedApi, ServiceOptions};
pub use sim::{SimulatedApp, SimulatedUi};
pub use ui::{AlertsUi, BrowserUi, Route};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::{expect, RetryConfig};
    pub use super::config::{ScreenFormat, SuiteConfig};
    pub use super::contract::AlertAction;
    pub use super::harness::{SessionFactory, SimulatedSessions, SuiteRunner};
    pub use super::result::{E2eError, E2eResult};
    pub use super::scenarios::{self, Scenario, Session};
    pub use super::seed::{AlertLogsOptions, AlertOptions, SeedApi, ServiceOptions};
    pub use super::ui::{AlertsUi, Checkbox, DialogField, MenuTarget, Route};
}
