//! The Alerts scenario suite.
//!
//! Every scenario seeds its own data, navigates, interacts and asserts
//! against a fresh [`Session`]. Scenarios only see the [`AlertsUi`] and
//! [`SeedApi`] traits, so the same suite runs against a real browser or the
//! in-memory reference application.

mod checkboxes;
mod creation;
mod details;
mod list;
mod logs;

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

use crate::assertion::{expect, Expect};
use crate::config::{ScreenFormat, SuiteConfig};
use crate::result::E2eResult;
use crate::seed::SeedApi;
use crate::ui::AlertsUi;

/// A seeded backend and one page, scoped to one scenario
pub struct Session {
    /// Fixture seeding
    pub seed: Arc<dyn SeedApi>,
    /// The page under test
    pub ui: Box<dyn AlertsUi>,
    /// Suite configuration
    pub config: SuiteConfig,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("screen", &self.ui.screen())
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Screen format of the page
    #[must_use]
    pub fn screen(&self) -> ScreenFormat {
        self.ui.screen()
    }

    /// Display name of the signed-in user
    #[must_use]
    pub fn user(&self) -> &str {
        &self.config.user_name
    }

    /// Retrying expectations on the page
    #[must_use]
    pub fn expect(&self) -> Expect<'_> {
        expect(self.ui.as_ref(), self.config.retry())
    }
}

/// Body of a scenario
pub type ScenarioFn = for<'a> fn(&'a mut Session) -> BoxFuture<'a, E2eResult<()>>;

/// One named scenario
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Feature group, e.g. "Alerts List"
    pub group: &'static str,
    /// Scenario name
    pub name: &'static str,
    /// Scenario body
    pub run: ScenarioFn,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// `group: name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}: {}", self.group, self.name)
    }

    /// Case-insensitive substring match on the full name
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.full_name()
            .to_lowercase()
            .contains(&filter.trim().to_lowercase())
    }
}

/// Every scenario, in suite order
#[must_use]
pub fn all() -> Vec<Scenario> {
    [
        list::SCENARIOS.as_slice(),
        checkboxes::SCENARIOS.as_slice(),
        creation::SCENARIOS.as_slice(),
        details::SCENARIOS.as_slice(),
        logs::SCENARIOS.as_slice(),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_suite_covers_every_group() {
        let scenarios = all();
        assert_eq!(scenarios.len(), 15);
        let groups: HashSet<_> = scenarios.iter().map(|s| s.group).collect();
        assert_eq!(
            groups,
            HashSet::from([
                "Alerts List",
                "Alerts checkboxes",
                "Alert Creation",
                "Alert Details",
                "Alert Details Logs",
            ])
        );
    }

    #[test]
    fn test_names_are_unique() {
        let scenarios = all();
        let names: HashSet<_> = scenarios.iter().map(Scenario::full_name).collect();
        assert_eq!(names.len(), scenarios.len());
    }

    #[test]
    fn test_filter_matching() {
        let scenarios = all();
        let searching: Vec<_> = scenarios.iter().filter(|s| s.matches("SEARCHING")).collect();
        assert_eq!(searching.len(), 3);
        assert!(scenarios.iter().all(|s| s.matches("")));
    }
}
