//! Rendered pages of the in-memory application for one screen format.

use async_trait::async_trait;
use std::vec::IntoIter;

use super::{Backend, SimulatedApp};
use crate::config::ScreenFormat;
use crate::contract::{
    AlertAction, AlertFilter, CreateAlertWizard, FilterOutcome, HeaderState, LogPager,
    SearchQuery, Selection, SelectionMenu, WizardButton, WizardStep,
};
use crate::model::{Alert, AlertLogEntry, AlertNumber, Service};
use crate::result::{ContractError, E2eResult};
use crate::seed::AlertOptions;
use crate::ui::{
    AlertRow, AlertsUi, Checkbox, DialogButton, DialogField, DialogSnapshot, MenuTarget, Route,
};

const NO_RESULTS: &str = "No results";
const LOAD_MORE: &str = "Load More";

#[derive(Debug)]
struct ListPage {
    filter: AlertFilter,
    selection: Selection,
    update_message: Option<String>,
}

impl ListPage {
    fn refresh(&mut self, backend: &Backend) {
        let visible: Vec<AlertNumber> = self
            .filter
            .apply(backend.alerts())
            .alerts()
            .iter()
            .map(|a| a.number)
            .collect();
        self.selection.set_visible(visible);
    }

    fn rows(&self, backend: &Backend) -> Vec<AlertRow> {
        match self.filter.apply(backend.alerts()) {
            FilterOutcome::NoResults => vec![AlertRow {
                number: None,
                text: NO_RESULTS.to_string(),
                checked: false,
            }],
            FilterOutcome::Results(alerts) => alerts
                .into_iter()
                .map(|a| AlertRow {
                    number: Some(a.number),
                    text: row_text(a),
                    checked: self.selection.is_checked(a.number),
                })
                .collect(),
        }
    }
}

fn row_text(alert: &Alert) -> String {
    format!(
        "{}: {}\n{}\n{}",
        alert.number, alert.status, alert.summary, alert.service.name
    )
}

#[derive(Debug)]
struct DetailsPage {
    number: AlertNumber,
    pager: LogPager<IntoIter<AlertLogEntry>>,
    more: bool,
}

impl DetailsPage {
    fn open(app: &SimulatedApp, backend: &Backend, number: AlertNumber) -> Result<Self, ContractError> {
        let _ = backend.alert(number)?;
        let mut pager = LogPager::new(backend.logs_newest_first(number), app.page_size());
        let more = pager.has_more();
        Ok(Self {
            number,
            pager,
            more,
        })
    }
}

#[derive(Debug)]
enum Page {
    Blank,
    List(ListPage),
    Details(DetailsPage),
}

impl Page {
    fn path(&self) -> String {
        match self {
            Self::Blank => "/".to_string(),
            Self::List(_) => Route::alerts().pathname(),
            Self::Details(details) => Route::details(details.number).pathname(),
        }
    }
}

fn list_mut<'a>(page: &'a mut Page, gesture: &'static str) -> Result<&'a mut ListPage, ContractError> {
    match page {
        Page::List(list) => Ok(list),
        other => Err(ContractError::NotOnPage {
            gesture,
            path: other.path(),
        }),
    }
}

fn details_mut<'a>(
    page: &'a mut Page,
    gesture: &'static str,
) -> Result<&'a mut DetailsPage, ContractError> {
    match page {
        Page::Details(details) => Ok(details),
        other => Err(ContractError::NotOnPage {
            gesture,
            path: other.path(),
        }),
    }
}

fn wizard_mut(wizard: &mut Option<CreateAlertWizard>) -> Result<&mut CreateAlertWizard, ContractError> {
    wizard.as_mut().ok_or(ContractError::DialogClosed)
}

fn unavailable(label: &str) -> ContractError {
    ContractError::ButtonUnavailable {
        label: label.to_string(),
    }
}

/// Links rendered on the details page as `(text, href)`
fn detail_links(alert: &Alert, screen: ScreenFormat) -> Vec<(String, String)> {
    let mut links = vec![(
        alert.service.name.clone(),
        format!("/services/{}", alert.service.id),
    )];
    if !screen.is_mobile() {
        if let Some(ep) = &alert.service.escalation_policy {
            links.push((
                "Escalation Policy".to_string(),
                format!("/escalation-policies/{}", ep.id),
            ));
        }
    }
    links
}

fn dialog_snapshot(wizard: &CreateAlertWizard, services: &[Service]) -> DialogSnapshot {
    let mut lines = vec!["Create New Alert".to_string()];
    lines.extend(
        [
            WizardStep::Info,
            WizardStep::ServiceSelection,
            WizardStep::Confirm,
            WizardStep::Review,
        ]
        .iter()
        .map(|s| s.title().to_string()),
    );

    let chips: Vec<String> = wizard.selected().iter().map(|s| s.name.clone()).collect();
    let mut selected_label = None;
    let mut list_items = 0;

    match wizard.step() {
        WizardStep::Info => {
            lines.push("Summary".to_string());
            lines.push("Details".to_string());
        }
        WizardStep::ServiceSelection => {
            let results = wizard.search_results(services);
            list_items = results.len();
            lines.extend(results.iter().map(|s| s.name.clone()));
            selected_label = Some(wizard.selected_label());
        }
        WizardStep::Confirm => {
            lines.push(format!("Summary\n{}", wizard.summary()));
            lines.push(format!("Details\n{}", wizard.details()));
            selected_label = Some(wizard.selected_label());
        }
        WizardStep::Review => {
            let created = wizard.created();
            list_items = created.len();
            lines.push(format!("Successfully created {} alerts", created.len()));
            lines.extend(
                created
                    .iter()
                    .map(|a| format!("#{} {} ({})", a.number, a.summary, a.service.name)),
            );
        }
    }

    let shows_chips = matches!(
        wizard.step(),
        WizardStep::ServiceSelection | WizardStep::Confirm
    );
    if let Some(label) = &selected_label {
        lines.push(label.clone());
    }
    if shows_chips {
        lines.extend(chips.iter().cloned());
    }

    let buttons: Vec<DialogButton> = wizard
        .buttons()
        .into_iter()
        .map(|(button, visible)| DialogButton {
            label: button.label().to_string(),
            visible,
        })
        .collect();
    lines.extend(
        buttons
            .iter()
            .filter(|b| b.visible)
            .map(|b| b.label.clone()),
    );

    DialogSnapshot {
        text: lines.join("\n"),
        buttons,
        chips: if shows_chips { chips } else { Vec::new() },
        selected_label,
        list_items,
    }
}

/// [`AlertsUi`] rendered from a [`SimulatedApp`]
#[derive(Debug)]
pub struct SimulatedUi {
    app: SimulatedApp,
    screen: ScreenFormat,
    page: Page,
    wizard: Option<CreateAlertWizard>,
}

impl SimulatedUi {
    /// Blank page on `app`
    #[must_use]
    pub const fn new(app: SimulatedApp, screen: ScreenFormat) -> Self {
        Self {
            app,
            screen,
            page: Page::Blank,
            wizard: None,
        }
    }

    fn details_text(&self, backend: &Backend, details: &DetailsPage) -> E2eResult<String> {
        let alert = backend.alert(details.number)?;
        let mut lines = vec![
            alert.summary.clone(),
            alert.details.clone(),
            alert.status.label().to_string(),
        ];
        lines.extend(detail_links(alert, self.screen).into_iter().map(|(text, _)| text));
        lines.extend(
            AlertAction::ALL
                .iter()
                .filter(|a| alert.status.offers(**a))
                .map(|a| a.label().to_string()),
        );
        lines.extend(details.pager.displayed().iter().map(|e| e.message.clone()));
        if details.more {
            lines.push(LOAD_MORE.to_string());
        }
        Ok(lines.join("\n"))
    }

    fn list_body(backend: &Backend, list: &ListPage) -> String {
        let mut lines = vec!["Alerts".to_string()];
        if !list.selection.is_empty() {
            lines.extend(AlertAction::ALL.iter().map(|a| a.label().to_string()));
        }
        if let Some(message) = &list.update_message {
            lines.push(message.clone());
        }
        lines.extend(list.rows(backend).into_iter().map(|r| r.text));
        lines.join("\n")
    }
}

#[async_trait]
impl AlertsUi for SimulatedUi {
    fn screen(&self) -> ScreenFormat {
        self.screen
    }

    async fn visit(&mut self, route: &Route) -> E2eResult<()> {
        tracing::debug!(path = %route.path(), screen = %self.screen, "visit");
        let backend = self.app.backend().await;
        self.wizard = None;
        self.page = match route {
            Route::Alerts {
                all_services,
                search,
            } => {
                let mut list = ListPage {
                    filter: AlertFilter {
                        query: SearchQuery::parse(search.as_deref().unwrap_or_default()),
                        favorites_only: !all_services,
                        include_closed: false,
                    },
                    selection: Selection::new(),
                    update_message: None,
                };
                list.refresh(&backend);
                Page::List(list)
            }
            Route::AlertDetails(number) => {
                Page::Details(DetailsPage::open(&self.app, &backend, *number)?)
            }
        };
        Ok(())
    }

    async fn location_path(&self) -> E2eResult<String> {
        Ok(self.page.path())
    }

    async fn body_text(&self) -> E2eResult<String> {
        let backend = self.app.backend().await;
        let mut body = match &self.page {
            Page::Blank => String::new(),
            Page::List(list) => Self::list_body(&backend, list),
            Page::Details(details) => self.details_text(&backend, details)?,
        };
        if let Some(wizard) = self.wizard.as_ref().filter(|w| w.is_open()) {
            body.push('\n');
            body.push_str(&dialog_snapshot(wizard, backend.services()).text);
        }
        Ok(body)
    }

    async fn list_text(&self) -> E2eResult<String> {
        let backend = self.app.backend().await;
        Ok(match &self.page {
            Page::List(list) => list
                .rows(&backend)
                .into_iter()
                .map(|r| r.text)
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        })
    }

    async fn page_search(&mut self, text: &str) -> E2eResult<()> {
        let backend = self.app.backend().await;
        let list = list_mut(&mut self.page, "search")?;
        list.filter.query = SearchQuery::parse(text);
        list.refresh(&backend);
        Ok(())
    }

    async fn page_fab(&mut self) -> E2eResult<()> {
        let _ = list_mut(&mut self.page, "create alert")?;
        self.wizard = Some(CreateAlertWizard::new());
        Ok(())
    }

    async fn page_action(&mut self, label: &str) -> E2eResult<()> {
        let action = AlertAction::from_label(label).ok_or_else(|| unavailable(label))?;
        let mut backend = self.app.backend().await;
        let details = details_mut(&mut self.page, "page action")?;
        let status = backend.apply_action(details.number, action)?;
        tracing::debug!(number = %details.number, %action, %status, "page action");
        *details = DetailsPage::open(&self.app, &backend, details.number)?;
        Ok(())
    }

    async fn menu(&mut self, target: MenuTarget, option: &str) -> E2eResult<()> {
        let MenuTarget::Checkboxes = target;
        let list = list_mut(&mut self.page, "checkbox menu")?;
        let choice = SelectionMenu::from_label(option).ok_or_else(|| unavailable(option))?;
        list.selection.menu(choice);
        Ok(())
    }

    async fn alert_rows(&self) -> E2eResult<Vec<AlertRow>> {
        let backend = self.app.backend().await;
        Ok(match &self.page {
            Page::List(list) => list.rows(&backend),
            _ => Vec::new(),
        })
    }

    async fn toggle_favorites_filter(&mut self) -> E2eResult<()> {
        let backend = self.app.backend().await;
        let list = list_mut(&mut self.page, "filter")?;
        list.filter.favorites_only = !list.filter.favorites_only;
        list.refresh(&backend);
        Ok(())
    }

    async fn open_alert(&mut self, number: AlertNumber) -> E2eResult<()> {
        let backend = self.app.backend().await;
        let list = list_mut(&mut self.page, "open alert")?;
        if !list.selection.visible().contains(&number) {
            return Err(ContractError::UnknownAlert(number).into());
        }
        self.page = Page::Details(DetailsPage::open(&self.app, &backend, number)?);
        Ok(())
    }

    async fn click_checkbox(&mut self, checkbox: Checkbox) -> E2eResult<()> {
        let list = list_mut(&mut self.page, "checkbox")?;
        match checkbox {
            Checkbox::SelectAll => list.selection.click_header(),
            Checkbox::Alert(number) => list.selection.toggle(number)?,
        }
        Ok(())
    }

    async fn is_checked(&self, checkbox: Checkbox) -> E2eResult<bool> {
        let Page::List(list) = &self.page else {
            return Err(ContractError::NotOnPage {
                gesture: "checkbox",
                path: self.page.path(),
            }
            .into());
        };
        match checkbox {
            Checkbox::SelectAll => Ok(list.selection.header_state() == HeaderState::All),
            Checkbox::Alert(number) if list.selection.visible().contains(&number) => {
                Ok(list.selection.is_checked(number))
            }
            Checkbox::Alert(number) => Err(ContractError::UnknownAlert(number).into()),
        }
    }

    async fn bulk_action(&mut self, action: AlertAction) -> E2eResult<()> {
        let mut backend = self.app.backend().await;
        let list = list_mut(&mut self.page, "bulk action")?;
        if list.selection.is_empty() {
            return Err(unavailable(action.label()).into());
        }
        let outcome = backend.apply_bulk(action, &list.selection.checked());
        list.update_message = Some(outcome.message());
        list.selection.clear();
        list.refresh(&backend);
        Ok(())
    }

    async fn bulk_action_visible(&self, _action: AlertAction) -> E2eResult<bool> {
        Ok(matches!(&self.page, Page::List(list) if !list.selection.is_empty()))
    }

    async fn update_message(&self) -> E2eResult<Option<String>> {
        Ok(match &self.page {
            Page::List(list) => list.update_message.clone(),
            _ => None,
        })
    }

    async fn link_href(&self, text: &str) -> E2eResult<Option<String>> {
        let backend = self.app.backend().await;
        let Page::Details(details) = &self.page else {
            return Ok(None);
        };
        let alert = backend.alert(details.number)?;
        Ok(detail_links(alert, self.screen)
            .into_iter()
            .find(|(label, _)| label.contains(text))
            .map(|(_, href)| href))
    }

    async fn log_entry_count(&self) -> E2eResult<usize> {
        Ok(match &self.page {
            Page::Details(details) => details.pager.displayed().len(),
            _ => 0,
        })
    }

    async fn load_more_logs(&mut self) -> E2eResult<()> {
        let details = details_mut(&mut self.page, "load more")?;
        if !details.more {
            return Err(unavailable(LOAD_MORE).into());
        }
        let appended = details.pager.load_more();
        details.more = details.pager.has_more();
        tracing::debug!(appended, more = details.more, "load more logs");
        Ok(())
    }

    async fn dialog(&self) -> E2eResult<Option<DialogSnapshot>> {
        let backend = self.app.backend().await;
        Ok(self
            .wizard
            .as_ref()
            .filter(|w| w.is_open())
            .map(|w| dialog_snapshot(w, backend.services())))
    }

    async fn dialog_fill(&mut self, field: DialogField, text: &str) -> E2eResult<()> {
        let wizard = wizard_mut(&mut self.wizard)?;
        match field {
            DialogField::Summary => wizard.type_summary(text)?,
            DialogField::Details => wizard.type_details(text)?,
            DialogField::ServiceSearch => wizard.type_service_search(text)?,
        }
        Ok(())
    }

    async fn dialog_clear(&mut self, field: DialogField) -> E2eResult<()> {
        let wizard = wizard_mut(&mut self.wizard)?;
        match field {
            DialogField::Summary => wizard.clear_summary()?,
            DialogField::Details => wizard.clear_details()?,
            DialogField::ServiceSearch => wizard.clear_service_search()?,
        }
        Ok(())
    }

    async fn dialog_pick_service(&mut self, name: &str) -> E2eResult<()> {
        let backend = self.app.backend().await;
        let wizard = wizard_mut(&mut self.wizard)?;
        let service = wizard
            .search_results(backend.services())
            .into_iter()
            .find(|s| s.name.contains(name))
            .cloned()
            .ok_or_else(|| ContractError::UnknownService {
                name: name.to_string(),
            })?;
        wizard.add_service(service)?;
        Ok(())
    }

    async fn dialog_button(&mut self, label: &str) -> E2eResult<()> {
        let button = WizardButton::from_label(label).ok_or_else(|| unavailable(label))?;
        let mut backend = self.app.backend().await;
        let wizard = wizard_mut(&mut self.wizard)?;
        match button {
            WizardButton::Next => wizard.next()?,
            WizardButton::Back => wizard.back()?,
            WizardButton::Cancel => wizard.cancel()?,
            WizardButton::Done => wizard.done()?,
            WizardButton::Submit => {
                let mut created = Vec::new();
                for draft in wizard.drafts()? {
                    created.push(backend.create_alert(AlertOptions {
                        service_id: Some(draft.service_id),
                        service: None,
                        summary: Some(draft.summary),
                        details: Some(draft.details),
                    })?);
                }
                tracing::debug!(count = created.len(), "alerts created from dialog");
                wizard.complete(created)?;
            }
        }
        if !wizard.is_open() {
            self.wizard = None;
            if let Page::List(list) = &mut self.page {
                list.refresh(&backend);
            }
        }
        Ok(())
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.page = Page::Blank;
        self.wizard = None;
        Ok(())
    }
}
