use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::{AlertRow, AlertsUi, Checkbox, DialogField, DialogSnapshot, MenuTarget, Route};
use crate::config::ScreenFormat;
use crate::contract::AlertAction;
use crate::driver::PageDriver;
use crate::locator::{selectors, Selector};
use crate::model::AlertNumber;
use crate::result::{E2eError, E2eResult};

const DIALOG_SNAPSHOT: &str = r"((d) => {
    if (!d) return null;
    const visible = (el) => {
        const style = window.getComputedStyle(el);
        return el.offsetParent !== null && style.visibility !== 'hidden' && style.opacity !== '0';
    };
    const label = Array.from(d.querySelectorAll('label'))
        .map(l => l.innerText.trim())
        .find(t => t.startsWith('Selected Services'));
    return {
        text: d.innerText,
        buttons: Array.from(d.querySelectorAll('button'))
            .filter(b => b.innerText.trim().length > 0)
            .map(b => ({ label: b.innerText.trim(), visible: visible(b) })),
        chips: Array.from(d.querySelectorAll('[data-cy=service-chip-container] [data-cy=service-chip]'))
            .filter(visible)
            .map(c => c.innerText.trim()),
        selectedLabel: label === undefined ? null : label,
        listItems: d.querySelectorAll('li').length,
    };
})";

const ALERT_ROWS: &str = r"(rows) => rows.map(li => {
    const cb = li.querySelector('span[data-cy^=alert-] input');
    const span = cb ? cb.closest('span[data-cy^=alert-]') : null;
    const number = span ? Number(span.getAttribute('data-cy').slice('alert-'.length)) : null;
    return { number: Number.isFinite(number) ? number : null, text: li.innerText, checked: cb ? cb.checked : false };
})";

/// [`AlertsUi`] over a real browser page
#[derive(Debug)]
pub struct BrowserUi<D: PageDriver> {
    driver: D,
    base_url: Url,
    screen: ScreenFormat,
}

impl<D: PageDriver> BrowserUi<D> {
    /// Drive `driver` against the application at `base_url`
    ///
    /// `base_url` must end in `/` (see [`crate::SuiteConfig::app_base`]).
    pub const fn new(driver: D, base_url: Url, screen: ScreenFormat) -> Self {
        Self {
            driver,
            base_url,
            screen,
        }
    }

    /// Underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> E2eResult<T> {
        let value = self.driver.evaluate(script).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn text_of(&self, selector: &Selector) -> E2eResult<Option<String>> {
        self.eval(&format!(
            "((el) => el ? el.innerText : null)({})",
            selector.to_query()
        ))
        .await
    }

    async fn count(&self, selector: &Selector) -> E2eResult<usize> {
        self.eval(&selector.to_count_query()).await
    }
}

#[async_trait]
impl<D: PageDriver> AlertsUi for BrowserUi<D> {
    fn screen(&self) -> ScreenFormat {
        self.screen
    }

    async fn visit(&mut self, route: &Route) -> E2eResult<()> {
        let url = route.url(&self.base_url)?;
        self.driver.navigate(url.as_str()).await
    }

    async fn location_path(&self) -> E2eResult<String> {
        let url = Url::parse(&self.driver.current_url().await?)?;
        // application paths are relative to the base path
        let base = self.base_url.path().trim_end_matches('/');
        Ok(url
            .path()
            .strip_prefix(base)
            .filter(|p| p.starts_with('/'))
            .unwrap_or(url.path())
            .to_string())
    }

    async fn body_text(&self) -> E2eResult<String> {
        self.eval("document.body ? document.body.innerText : ''").await
    }

    async fn list_text(&self) -> E2eResult<String> {
        Ok(self
            .text_of(&selectors::alerts_list())
            .await?
            .unwrap_or_default())
    }

    async fn page_search(&mut self, text: &str) -> E2eResult<()> {
        let search = selectors::page_search();
        self.driver.clear(&search).await?;
        self.driver.type_text(&search, text).await
    }

    async fn page_fab(&mut self) -> E2eResult<()> {
        self.driver.click(&selectors::page_fab()).await
    }

    async fn page_action(&mut self, label: &str) -> E2eResult<()> {
        match self.driver.click(&selectors::button(label)).await {
            Err(E2eError::ElementNotFound { .. }) if self.screen.is_mobile() => {
                // Narrow layouts collapse page actions into the overflow menu
                self.driver
                    .click(&Selector::data_cy("other-actions"))
                    .await?;
                self.driver
                    .click(&selectors::menu_items().with_text(label))
                    .await
            }
            other => other,
        }
    }

    async fn menu(&mut self, target: MenuTarget, option: &str) -> E2eResult<()> {
        self.driver.click(&target.selector()).await?;
        self.driver
            .click(&selectors::menu_items().with_text(option))
            .await
    }

    async fn alert_rows(&self) -> E2eResult<Vec<AlertRow>> {
        self.eval(&format!(
            "({ALERT_ROWS})({})",
            selectors::alert_rows().to_all_query()
        ))
        .await
    }

    async fn toggle_favorites_filter(&mut self) -> E2eResult<()> {
        self.driver.click(&selectors::filter_button()).await?;
        self.driver.click(&selectors::toggle_favorites()).await
    }

    async fn open_alert(&mut self, number: AlertNumber) -> E2eResult<()> {
        self.driver
            .click(&selectors::alerts_list().within("li").with_text(number.to_string()))
            .await
    }

    async fn click_checkbox(&mut self, checkbox: Checkbox) -> E2eResult<()> {
        self.driver.click(&checkbox.selector()).await
    }

    async fn is_checked(&self, checkbox: Checkbox) -> E2eResult<bool> {
        let selector = checkbox.selector();
        let checked: Option<bool> = self
            .eval(&format!(
                "((el) => el ? el.checked : null)({})",
                selector.to_query()
            ))
            .await?;
        checked.ok_or_else(|| E2eError::ElementNotFound {
            selector: selector.to_string(),
        })
    }

    async fn bulk_action(&mut self, action: AlertAction) -> E2eResult<()> {
        self.driver.click(&selectors::bulk_action(action)).await
    }

    async fn bulk_action_visible(&self, action: AlertAction) -> E2eResult<bool> {
        Ok(self.count(&selectors::bulk_action(action)).await? > 0)
    }

    async fn update_message(&self) -> E2eResult<Option<String>> {
        self.text_of(&selectors::update_message()).await
    }

    async fn link_href(&self, text: &str) -> E2eResult<Option<String>> {
        self.eval(&format!(
            "((el) => el ? el.getAttribute('href') : null)({})",
            Selector::css("a").with_text(text).to_query()
        ))
        .await
    }

    async fn log_entry_count(&self) -> E2eResult<usize> {
        self.count(&selectors::log_entries()).await
    }

    async fn load_more_logs(&mut self) -> E2eResult<()> {
        self.driver.click(&selectors::load_more_logs()).await
    }

    async fn dialog(&self) -> E2eResult<Option<DialogSnapshot>> {
        self.eval(&format!(
            "{DIALOG_SNAPSHOT}({})",
            selectors::dialog().to_query()
        ))
        .await
    }

    async fn dialog_fill(&mut self, field: DialogField, text: &str) -> E2eResult<()> {
        self.driver.type_text(&field.selector(), text).await
    }

    async fn dialog_clear(&mut self, field: DialogField) -> E2eResult<()> {
        self.driver.clear(&field.selector()).await
    }

    async fn dialog_pick_service(&mut self, name: &str) -> E2eResult<()> {
        let option = selectors::dialog().within("li span").with_text(name);
        self.driver.click(&option).await
    }

    async fn dialog_button(&mut self, label: &str) -> E2eResult<()> {
        self.driver
            .click(&selectors::dialog().within("button").with_text(label))
            .await
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.driver.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use serde_json::json;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    fn ui() -> BrowserUi<MockDriver> {
        BrowserUi::new(MockDriver::new(), base("http://localhost:3030/"), ScreenFormat::Widescreen)
    }

    #[tokio::test]
    async fn test_location_path_is_relative_to_base_path() {
        let mut ui = BrowserUi::new(
            MockDriver::new(),
            base("https://ops.example.test/alerts-ui/"),
            ScreenFormat::Widescreen,
        );
        ui.visit(&Route::details(AlertNumber(12))).await.unwrap();
        assert_eq!(
            ui.driver().history(),
            vec!["navigate:https://ops.example.test/alerts-ui/alerts/12"]
        );
        assert_eq!(ui.location_path().await.unwrap(), "/alerts/12");

        ui.visit(&Route::alerts().with_search("a b")).await.unwrap();
        assert_eq!(ui.location_path().await.unwrap(), "/alerts");
    }

    #[tokio::test]
    async fn test_visit_joins_base_url() {
        let mut ui = ui();
        ui.visit(&Route::alerts().all_services()).await.unwrap();
        assert_eq!(
            ui.driver().history(),
            vec!["navigate:http://localhost:3030/alerts?allServices=1"]
        );
        assert_eq!(ui.location_path().await.unwrap(), "/alerts");
    }

    #[tokio::test]
    async fn test_set_checked_clicks_only_on_change() {
        let mut ui = ui();
        ui.driver().push_result(json!(true));
        ui.set_checked(Checkbox::SelectAll, true).await.unwrap();
        assert!(!ui.driver().was_called("click:"));

        ui.driver().push_result(json!(false));
        ui.set_checked(Checkbox::Alert(AlertNumber(3)), true)
            .await
            .unwrap();
        assert!(ui
            .driver()
            .history()
            .contains(&"click:span[data-cy=alert-3] input".to_string()));
    }

    #[tokio::test]
    async fn test_missing_checkbox_is_not_found() {
        let ui = ui();
        ui.driver().push_result(serde_json::Value::Null);
        let err = ui.is_checked(Checkbox::SelectAll).await.unwrap_err();
        assert!(matches!(err, E2eError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_rows_and_dialog_decode() {
        let ui = ui();
        ui.driver().push_result(json!([
            { "number": 7, "text": "7: UNACKNOWLEDGED", "checked": true },
            { "number": null, "text": "No results" }
        ]));
        let rows = ui.alert_rows().await.unwrap();
        assert_eq!(rows[0].number, Some(AlertNumber(7)));
        assert!(rows[0].checked);
        assert_eq!(rows[1].number, None);

        ui.driver().push_result(serde_json::Value::Null);
        assert_eq!(ui.dialog().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_menu_opens_then_picks() {
        let mut ui = ui();
        ui.menu(MenuTarget::Checkboxes, "All").await.unwrap();
        assert_eq!(
            ui.driver().history(),
            vec![
                "click:[data-cy=checkboxes-menu] [data-cy=other-actions]",
                r#"click:[role=menuitem]:contains("All")"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_page_action_falls_back_to_menu_on_mobile() {
        let mut ui = BrowserUi::new(MockDriver::new(), base("http://h/"), ScreenFormat::Mobile);
        ui.driver().set_missing(&selectors::button("Close"));
        ui.page_action("Close").await.unwrap();
        assert_eq!(ui.driver().history().len(), 3);
        assert!(ui.driver().was_called("click:[data-cy=other-actions]"));
    }
}
