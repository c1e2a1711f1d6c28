//! The page surface the scenarios drive.
//!
//! [`AlertsUi`] covers every gesture and read the suite performs against the
//! Alerts UI. [`BrowserUi`] implements it over a real page; the simulator in
//! [`crate::sim`] implements it over the in-memory reference application.

mod browser;

pub use browser::BrowserUi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::config::ScreenFormat;
use crate::contract::AlertAction;
use crate::locator::{selectors, Selector};
use crate::model::AlertNumber;
use crate::result::E2eResult;

/// An application route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The alerts list
    Alerts {
        /// `allServices=1`: do not restrict to favorited services
        all_services: bool,
        /// Pre-filled search text
        search: Option<String>,
    },
    /// Details page of one alert
    AlertDetails(AlertNumber),
}

impl Route {
    /// `/alerts` with default filters
    #[must_use]
    pub const fn alerts() -> Self {
        Self::Alerts {
            all_services: false,
            search: None,
        }
    }

    /// `/alerts/<number>`
    #[must_use]
    pub const fn details(number: AlertNumber) -> Self {
        Self::AlertDetails(number)
    }

    /// Show alerts of every service
    #[must_use]
    pub fn all_services(self) -> Self {
        match self {
            Self::Alerts { search, .. } => Self::Alerts {
                all_services: true,
                search,
            },
            other => other,
        }
    }

    /// Pre-fill the search
    #[must_use]
    pub fn with_search(self, text: impl Into<String>) -> Self {
        match self {
            Self::Alerts { all_services, .. } => Self::Alerts {
                all_services,
                search: Some(text.into()),
            },
            other => other,
        }
    }

    /// Path without the query string
    #[must_use]
    pub fn pathname(&self) -> String {
        match self {
            Self::Alerts { .. } => "/alerts".to_string(),
            Self::AlertDetails(number) => format!("/alerts/{number}"),
        }
    }

    /// Path including the query string
    #[must_use]
    pub fn path(&self) -> String {
        match self.query() {
            Some(query) => format!("{}?{query}", self.pathname()),
            None => self.pathname(),
        }
    }

    /// Absolute URL under an application base ending in `/`
    ///
    /// # Errors
    ///
    /// Returns error if the route cannot be joined onto `base`
    pub fn url(&self, base: &Url) -> E2eResult<Url> {
        let mut url = base.join(self.pathname().trim_start_matches('/'))?;
        url.set_query(self.query().as_deref());
        Ok(url)
    }

    fn query(&self) -> Option<String> {
        let Self::Alerts {
            all_services,
            search,
        } = self
        else {
            return None;
        };
        if !*all_services && search.is_none() {
            return None;
        }
        let mut query = form_urlencoded::Serializer::new(String::new());
        if *all_services {
            query.append_pair("allServices", "1");
        }
        if let Some(search) = search {
            query.append_pair("search", search);
        }
        Some(query.finish())
    }
}

/// A selection checkbox on the alerts list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkbox {
    /// Header select-all checkbox
    SelectAll,
    /// Checkbox of one alert row
    Alert(AlertNumber),
}

impl Checkbox {
    /// Input element of the checkbox
    #[must_use]
    pub fn selector(self) -> Selector {
        match self {
            Self::SelectAll => selectors::select_all(),
            Self::Alert(number) => selectors::alert_checkbox(number),
        }
    }
}

/// Element that opens a dropdown menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    /// Header checkbox menu
    Checkboxes,
}

impl MenuTarget {
    /// Menu trigger element
    #[must_use]
    pub fn selector(self) -> Selector {
        match self {
            Self::Checkboxes => selectors::checkboxes_menu(),
        }
    }
}

/// Text field of the create-alert dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    /// `input[name=summary]`
    Summary,
    /// `textarea[name=details]`
    Details,
    /// `input[name=serviceSearch]`
    ServiceSearch,
}

impl DialogField {
    /// Field element inside the dialog
    #[must_use]
    pub fn selector(self) -> Selector {
        selectors::dialog_field(match self {
            Self::Summary => "input[name=summary]",
            Self::Details => "textarea[name=details]",
            Self::ServiceSearch => "input[name=serviceSearch]",
        })
    }
}

/// One rendered row of the alerts list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRow {
    /// Alert number (None for the empty-state row)
    pub number: Option<AlertNumber>,
    /// Rendered text
    pub text: String,
    /// Row checkbox state
    #[serde(default)]
    pub checked: bool,
}

/// A button rendered in the dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    /// Button label
    pub label: String,
    /// Whether it is visible
    pub visible: bool,
}

/// Rendered state of the open dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogSnapshot {
    /// Visible text
    pub text: String,
    /// Buttons in document order
    pub buttons: Vec<DialogButton>,
    /// Labels of the service chips
    pub chips: Vec<String>,
    /// "Selected Services (N)" label, when rendered
    pub selected_label: Option<String>,
    /// Number of list items
    pub list_items: usize,
}

impl DialogSnapshot {
    /// Button with the given label
    #[must_use]
    pub fn button(&self, label: &str) -> Option<&DialogButton> {
        self.buttons.iter().find(|b| b.label.trim() == label)
    }

    /// Whether a button with the given label is visible
    #[must_use]
    pub fn is_button_visible(&self, label: &str) -> bool {
        self.button(label).is_some_and(|b| b.visible)
    }

    /// Whether a chip for `name` is shown
    #[must_use]
    pub fn has_chip(&self, name: &str) -> bool {
        self.chips.iter().any(|c| c.contains(name))
    }

    /// Whether the dialog text contains `text`
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.text.contains(text)
    }
}

/// The Alerts UI as seen by a user.
///
/// Gestures take `&mut self`; reads take `&self` so assertions can poll them.
#[async_trait]
pub trait AlertsUi: Send + Sync {
    /// Screen format this page emulates
    fn screen(&self) -> ScreenFormat;

    /// Load a route
    async fn visit(&mut self, route: &Route) -> E2eResult<()>;

    /// Current path without query string
    async fn location_path(&self) -> E2eResult<String>;

    /// Visible text of the whole page
    async fn body_text(&self) -> E2eResult<String>;

    /// Visible text of the alerts list
    async fn list_text(&self) -> E2eResult<String>;

    /// Replace the page search text
    async fn page_search(&mut self, text: &str) -> E2eResult<()>;

    /// Click the floating action button
    async fn page_fab(&mut self) -> E2eResult<()>;

    /// Invoke a named page action (detail page lifecycle buttons)
    async fn page_action(&mut self, label: &str) -> E2eResult<()>;

    /// Open a dropdown menu and pick `option`
    async fn menu(&mut self, target: MenuTarget, option: &str) -> E2eResult<()>;

    /// Rows of the alerts list
    async fn alert_rows(&self) -> E2eResult<Vec<AlertRow>>;

    /// Open the filter popover and flip the favorites-only switch
    async fn toggle_favorites_filter(&mut self) -> E2eResult<()>;

    /// Click the list item of an alert
    async fn open_alert(&mut self, number: AlertNumber) -> E2eResult<()>;

    /// Click a checkbox
    async fn click_checkbox(&mut self, checkbox: Checkbox) -> E2eResult<()>;

    /// Whether a checkbox is checked
    async fn is_checked(&self, checkbox: Checkbox) -> E2eResult<bool>;

    /// Click a bulk action button
    async fn bulk_action(&mut self, action: AlertAction) -> E2eResult<()>;

    /// Whether a bulk action button is rendered
    async fn bulk_action_visible(&self, action: AlertAction) -> E2eResult<bool>;

    /// Bulk update message, if shown
    async fn update_message(&self) -> E2eResult<Option<String>>;

    /// `href` of the first link containing `text`
    async fn link_href(&self, text: &str) -> E2eResult<Option<String>>;

    /// Number of displayed alert log entries
    async fn log_entry_count(&self) -> E2eResult<usize>;

    /// Click "Load More" in the alert log
    async fn load_more_logs(&mut self) -> E2eResult<()>;

    /// Snapshot of the open dialog
    async fn dialog(&self) -> E2eResult<Option<DialogSnapshot>>;

    /// Type into a dialog field
    async fn dialog_fill(&mut self, field: DialogField, text: &str) -> E2eResult<()>;

    /// Clear a dialog field
    async fn dialog_clear(&mut self, field: DialogField) -> E2eResult<()>;

    /// Pick a service from the picker results
    async fn dialog_pick_service(&mut self, name: &str) -> E2eResult<()>;

    /// Click a dialog button by label
    async fn dialog_button(&mut self, label: &str) -> E2eResult<()>;

    /// Tear the page down
    async fn close(&mut self) -> E2eResult<()>;

    /// Check or uncheck, clicking only when the state differs
    async fn set_checked(&mut self, checkbox: Checkbox, checked: bool) -> E2eResult<()> {
        if self.is_checked(checkbox).await? != checked {
            self.click_checkbox(checkbox).await?;
        }
        Ok(())
    }
}
