//! Retrying assertions over an [`AlertsUi`].
//!
//! `expect(ui, retry).body_contains("Acknowledged").await?` polls the page
//! until the condition holds or the retry budget runs out.

pub mod retry;

pub use retry::{eventually, AssertionCheckResult, RetryConfig, RetryFailure, RetryResult};

use crate::contract::AlertAction;
use crate::model::AlertNumber;
use crate::result::E2eResult;
use crate::ui::{AlertsUi, Checkbox, DialogSnapshot};

const EXCERPT_LEN: usize = 160;

/// Shorten page text for failure messages
fn excerpt(text: &str) -> String {
    let flat = text.replace('\n', " | ");
    match flat.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => format!("{}...", &flat[..end]),
        None => flat,
    }
}

/// Create an expectation on a page (Playwright-style)
#[must_use]
pub fn expect(ui: &dyn AlertsUi, retry: RetryConfig) -> Expect<'_> {
    Expect { ui, retry }
}

/// Assertion builder bound to one page
#[derive(Clone, Copy)]
pub struct Expect<'a> {
    ui: &'a dyn AlertsUi,
    retry: RetryConfig,
}

impl std::fmt::Debug for Expect<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expect")
            .field("screen", &self.ui.screen())
            .field("retry", &self.retry)
            .finish()
    }
}

impl Expect<'_> {
    /// Use a different retry budget
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Page text contains `text`
    pub async fn body_contains(&self, text: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("page contains {text:?}");
        eventually(&self.retry, &desc, || async move {
            let body = ui.body_text().await?;
            Ok(AssertionCheckResult::check(body.contains(text), || {
                format!("page text was {:?}", excerpt(&body))
            }))
        })
        .await
        .map(drop)
    }

    /// Page text does not contain `text`
    pub async fn body_not_contains(&self, text: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("page does not contain {text:?}");
        eventually(&self.retry, &desc, || async move {
            let body = ui.body_text().await?;
            Ok(AssertionCheckResult::check(!body.contains(text), || {
                format!("page text was {:?}", excerpt(&body))
            }))
        })
        .await
        .map(drop)
    }

    /// Alerts list text contains `text`
    pub async fn list_contains(&self, text: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("list contains {text:?}");
        eventually(&self.retry, &desc, || async move {
            let list = ui.list_text().await?;
            Ok(AssertionCheckResult::check(list.contains(text), || {
                format!("list text was {:?}", excerpt(&list))
            }))
        })
        .await
        .map(drop)
    }

    /// Alerts list text does not contain `text`
    pub async fn list_not_contains(&self, text: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("list does not contain {text:?}");
        eventually(&self.retry, &desc, || async move {
            let list = ui.list_text().await?;
            Ok(AssertionCheckResult::check(!list.contains(text), || {
                format!("list text was {:?}", excerpt(&list))
            }))
        })
        .await
        .map(drop)
    }

    /// The list renders exactly `count` rows
    pub async fn row_count(&self, count: usize) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("list has {count} row(s)");
        eventually(&self.retry, &desc, || async move {
            let rows = ui.alert_rows().await?;
            Ok(AssertionCheckResult::check(rows.len() == count, || {
                format!("found {} row(s)", rows.len())
            }))
        })
        .await
        .map(drop)
    }

    /// The list renders one row and it is the row of `number`
    pub async fn only_row(&self, number: AlertNumber) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("list shows only #{number}");
        eventually(&self.retry, &desc, || async move {
            let rows = ui.alert_rows().await?;
            let numbers: Vec<_> = rows.iter().map(|r| r.number).collect();
            Ok(AssertionCheckResult::check(numbers == [Some(number)], || {
                format!("rows were {numbers:?}")
            }))
        })
        .await
        .map(drop)
    }

    async fn row_matches(&self, number: AlertNumber, text: &str, present: bool) -> E2eResult<()> {
        let ui = self.ui;
        let verb = if present { "contains" } else { "does not contain" };
        let desc = format!("row of #{number} {verb} {text:?}");
        eventually(&self.retry, &desc, || async move {
            let rows = ui.alert_rows().await?;
            let Some(row) = rows.iter().find(|r| r.number == Some(number)) else {
                return Ok(AssertionCheckResult::Fail(format!("no row for #{number}")));
            };
            Ok(AssertionCheckResult::check(
                row.text.contains(text) == present,
                || format!("row text was {:?}", excerpt(&row.text)),
            ))
        })
        .await
        .map(drop)
    }

    /// The row of `number` is rendered and contains `text`
    pub async fn row_contains(&self, number: AlertNumber, text: &str) -> E2eResult<()> {
        self.row_matches(number, text, true).await
    }

    /// The row of `number` is rendered and does not contain `text`
    pub async fn row_not_contains(&self, number: AlertNumber, text: &str) -> E2eResult<()> {
        self.row_matches(number, text, false).await
    }

    /// Checkbox state
    pub async fn checked(&self, checkbox: Checkbox, expected: bool) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("{checkbox:?} checked={expected}");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.is_checked(checkbox).await?;
            Ok(AssertionCheckResult::check(actual == expected, || {
                format!("checked={actual}")
            }))
        })
        .await
        .map(drop)
    }

    /// Bulk update message contains `text`
    pub async fn update_message_contains(&self, text: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("update message contains {text:?}");
        eventually(&self.retry, &desc, || async move {
            let message = ui.update_message().await?;
            Ok(AssertionCheckResult::check(
                message.as_deref().is_some_and(|m| m.contains(text)),
                || format!("update message was {message:?}"),
            ))
        })
        .await
        .map(drop)
    }

    /// Bulk action button presence
    pub async fn bulk_action_visible(&self, action: AlertAction, visible: bool) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("{action} button visible={visible}");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.bulk_action_visible(action).await?;
            Ok(AssertionCheckResult::check(actual == visible, || {
                format!("visible={actual}")
            }))
        })
        .await
        .map(drop)
    }

    /// Exactly `count` log entries are displayed
    pub async fn log_count_eq(&self, count: usize) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("{count} log entries displayed");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.log_entry_count().await?;
            Ok(AssertionCheckResult::check(actual == count, || {
                format!("{actual} displayed")
            }))
        })
        .await
        .map(drop)
    }

    /// More than `count` log entries are displayed
    pub async fn log_count_gt(&self, count: usize) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("more than {count} log entries displayed");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.log_entry_count().await?;
            Ok(AssertionCheckResult::check(actual > count, || {
                format!("{actual} displayed")
            }))
        })
        .await
        .map(drop)
    }

    /// Current path equals `path`
    pub async fn location_path(&self, path: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("location is {path}");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.location_path().await?;
            Ok(AssertionCheckResult::check(actual == path, || {
                format!("location was {actual}")
            }))
        })
        .await
        .map(drop)
    }

    /// A link containing `text` points at `href`
    pub async fn link_href(&self, text: &str, href: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("link {text:?} points at {href}");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.link_href(text).await?;
            Ok(AssertionCheckResult::check(
                actual.as_deref() == Some(href),
                || format!("href was {actual:?}"),
            ))
        })
        .await
        .map(drop)
    }

    /// No link containing `text` is rendered
    pub async fn no_link(&self, text: &str) -> E2eResult<()> {
        let ui = self.ui;
        let desc = format!("no link {text:?}");
        eventually(&self.retry, &desc, || async move {
            let actual = ui.link_href(text).await?;
            Ok(AssertionCheckResult::check(actual.is_none(), || {
                format!("href was {actual:?}")
            }))
        })
        .await
        .map(drop)
    }

    /// The dialog is closed
    pub async fn dialog_closed(&self) -> E2eResult<()> {
        let ui = self.ui;
        eventually(&self.retry, "dialog closed", || async move {
            let dialog = ui.dialog().await?;
            Ok(AssertionCheckResult::check(dialog.is_none(), || {
                "dialog still open".to_string()
            }))
        })
        .await
        .map(drop)
    }

    /// The dialog is open and satisfies `check`
    pub async fn dialog<F>(&self, description: &str, check: F) -> E2eResult<()>
    where
        F: Fn(&DialogSnapshot) -> bool + Sync,
    {
        let ui = self.ui;
        let check = &check;
        eventually(&self.retry, description, || async move {
            Ok(match ui.dialog().await? {
                None => AssertionCheckResult::Fail("dialog not open".to_string()),
                Some(dialog) => AssertionCheckResult::check(check(&dialog), || {
                    format!("dialog text was {:?}", excerpt(&dialog.text))
                }),
            })
        })
        .await
        .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenFormat;
    use crate::seed::{AlertOptions, SeedApi, ServiceOptions};
    use crate::sim::SimulatedApp;
    use crate::ui::Route;
    use std::time::Duration;

    fn quick() -> RetryConfig {
        RetryConfig::new(Duration::from_millis(30)).with_poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(400);
        let short = excerpt(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), EXCERPT_LEN + 3);
        assert_eq!(excerpt("a\nb"), "a | b");
    }

    #[tokio::test]
    async fn test_passing_and_failing_expectations() {
        let app = SimulatedApp::new("E2E User");
        let alert = app
            .create_alert(AlertOptions::new().with_summary("disk full"))
            .await
            .unwrap();
        let mut ui = app.open(ScreenFormat::Widescreen);
        ui.visit(&Route::details(alert.number)).await.unwrap();

        let e = expect(&ui, quick());
        e.body_contains("disk full").await.unwrap();
        e.location_path(&format!("/alerts/{}", alert.number))
            .await
            .unwrap();
        e.dialog_closed().await.unwrap();

        let err = e.body_contains("not on the page").await.unwrap_err();
        assert!(err.to_string().contains("page contains \"not on the page\""));
        assert!(e.body_not_contains("disk full").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_row_fails() {
        let app = SimulatedApp::new("E2E User");
        let mut ui = app.open(ScreenFormat::Mobile);
        ui.visit(&Route::alerts()).await.unwrap();
        let e = expect(&ui, quick());
        e.row_count(1).await.unwrap();
        let err = e.row_contains(AlertNumber(1), "x").await.unwrap_err();
        assert!(err.to_string().contains("no row for #1"));
    }

    #[tokio::test]
    async fn test_only_row_rejects_no_results_row() {
        let app = SimulatedApp::new("E2E User");
        let alert = app.create_alert(AlertOptions::new()).await.unwrap();
        let mut ui = app.open(ScreenFormat::Widescreen);

        // favorites only: the alert is filtered out, a placeholder row remains
        ui.visit(&Route::alerts()).await.unwrap();
        let e = expect(&ui, quick());
        e.row_count(1).await.unwrap();
        let err = e.only_row(alert.number).await.unwrap_err();
        assert!(err.to_string().contains("rows were [None]"), "{err}");

        ui.visit(&Route::alerts().all_services()).await.unwrap();
        expect(&ui, quick()).only_row(alert.number).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_link_follows_screen_layout() {
        let app = SimulatedApp::new("E2E User");
        let alert = app
            .create_alert(
                AlertOptions::new()
                    .with_service(ServiceOptions::new().with_escalation_steps(1)),
            )
            .await
            .unwrap();
        let route = Route::details(alert.number);

        let mut mobile = app.open(ScreenFormat::Mobile);
        mobile.visit(&route).await.unwrap();
        expect(&mobile, quick()).no_link("Escalation Policy").await.unwrap();

        let mut wide = app.open(ScreenFormat::Widescreen);
        wide.visit(&route).await.unwrap();
        let err = expect(&wide, quick())
            .no_link("Escalation Policy")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no link \"Escalation Policy\""), "{err}");
    }
}
