//! Element selectors rendered to DOM query expressions.
//!
//! Every selector renders to a JavaScript expression that evaluates to an
//! array of elements; single-element and count queries are derived from it.

use std::fmt;

use crate::contract::AlertAction;
use crate::model::AlertNumber;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., `ul[data-cy=alerts-list] li`)
    Css(String),
    /// `data-cy` attribute
    DataCy(String),
    /// CSS selector filtered by contained text
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
    /// CSS selector evaluated inside the first match of another selector
    Within {
        /// Scope element
        scope: Box<Selector>,
        /// CSS selector relative to the scope
        css: String,
    },
}

/// Render a string as a JavaScript string literal
pub(crate) fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

impl Selector {
    /// Plain CSS selector
    #[must_use]
    pub fn css(s: impl Into<String>) -> Self {
        Self::Css(s.into())
    }

    /// `[data-cy=...]` selector
    #[must_use]
    pub fn data_cy(s: impl Into<String>) -> Self {
        Self::DataCy(s.into())
    }

    /// Narrow to elements containing `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        match self {
            Self::Css(css) => Self::CssWithText { css, text },
            Self::DataCy(id) => Self::CssWithText {
                css: data_cy_css(&id),
                text,
            },
            other => Self::CssWithText {
                css: other.css_fragment(),
                text,
            },
        }
    }

    /// Query `css` inside the first element matching `self`
    #[must_use]
    pub fn within(self, css: impl Into<String>) -> Self {
        Self::Within {
            scope: Box::new(self),
            css: css.into(),
        }
    }

    fn css_fragment(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::DataCy(id) => data_cy_css(id),
            Self::CssWithText { css, .. } => css.clone(),
            Self::Within { scope, css } => format!("{} {css}", scope.css_fragment()),
        }
    }

    /// Expression evaluating to an array of all matches
    #[must_use]
    pub fn to_all_query(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({}))", js_str(s)),
            Self::DataCy(id) => format!(
                "Array.from(document.querySelectorAll({}))",
                js_str(&data_cy_css(id))
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({})).filter(el => el.textContent.includes({}))",
                js_str(css),
                js_str(text)
            ),
            Self::Within { scope, css } => format!(
                "((root) => root ? Array.from(root.querySelectorAll({})) : [])({})",
                js_str(css),
                scope.to_query()
            ),
        }
    }

    /// Expression evaluating to the first match or `undefined`
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{}[0]", self.to_all_query())
    }

    /// Expression evaluating to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_all_query())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CssWithText { css, text } => write!(f, "{css}:contains({text:?})"),
            other => f.write_str(&other.css_fragment()),
        }
    }
}

fn data_cy_css(id: &str) -> String {
    format!("[data-cy={id}]")
}

/// Named selectors for the Alerts UI
pub mod selectors {
    use super::{AlertAction, AlertNumber, Selector};

    /// Rows of the alerts list
    #[must_use]
    pub fn alert_rows() -> Selector {
        Selector::css("ul[data-cy=alerts-list] li")
    }

    /// The alerts list itself
    #[must_use]
    pub fn alerts_list() -> Selector {
        Selector::css("ul[data-cy=alerts-list]")
    }

    /// Header select-all checkbox input
    #[must_use]
    pub fn select_all() -> Selector {
        Selector::css("span[data-cy=select-all] input")
    }

    /// Checkbox input of one alert row
    #[must_use]
    pub fn alert_checkbox(number: AlertNumber) -> Selector {
        Selector::css(format!("span[data-cy=alert-{number}] input"))
    }

    /// Trigger of the header checkbox menu
    #[must_use]
    pub fn checkboxes_menu() -> Selector {
        Selector::css("[data-cy=checkboxes-menu] [data-cy=other-actions]")
    }

    /// Bulk action button
    #[must_use]
    pub fn bulk_action(action: AlertAction) -> Selector {
        Selector::css(format!("button[data-cy={}]", action.data_cy()))
    }

    /// Bulk update result message
    #[must_use]
    pub fn update_message() -> Selector {
        Selector::css("span[data-cy=update-message]")
    }

    /// Filter popover trigger
    #[must_use]
    pub fn filter_button() -> Selector {
        Selector::css(r#"button[aria-label="Filter Alerts"]"#)
    }

    /// Favorites-only switch inside the filter popover
    #[must_use]
    pub fn toggle_favorites() -> Selector {
        Selector::css("span[data-cy=toggle-favorites]")
    }

    /// Entries of the alert log
    #[must_use]
    pub fn log_entries() -> Selector {
        Selector::css("ul[data-cy=alert-logs] li")
    }

    /// "Load More" affordance of the alert log
    #[must_use]
    pub fn load_more_logs() -> Selector {
        Selector::data_cy("load-more-logs")
    }

    /// Open dialog
    #[must_use]
    pub fn dialog() -> Selector {
        Selector::css("div[role=dialog]")
    }

    /// A field inside the open dialog
    #[must_use]
    pub fn dialog_field(css: &str) -> Selector {
        dialog().within(css)
    }

    /// Page search box
    #[must_use]
    pub fn page_search() -> Selector {
        Selector::css("input[name=search]")
    }

    /// Floating action button
    #[must_use]
    pub fn page_fab() -> Selector {
        Selector::css("button[data-cy=page-fab]")
    }

    /// Open menu items
    #[must_use]
    pub fn menu_items() -> Selector {
        Selector::css("[role=menuitem]")
    }

    /// Button with the given label
    #[must_use]
    pub fn button(label: &str) -> Selector {
        Selector::css("button").with_text(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_query() {
        let q = Selector::css("ul li").to_query();
        assert_eq!(q, r#"Array.from(document.querySelectorAll("ul li"))[0]"#);
    }

    #[test]
    fn test_count_query() {
        let q = selectors::log_entries().to_count_query();
        assert!(q.ends_with(".length"));
        assert!(q.contains(r#""ul[data-cy=alert-logs] li""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let q = selectors::button(r#"say "hi""#).to_all_query();
        assert!(q.contains(r#"includes("say \"hi\"")"#));
    }

    #[test]
    fn test_within_scopes_to_first_match() {
        let q = selectors::dialog_field("input[name=summary]").to_all_query();
        assert!(q.starts_with("((root) => root ?"));
        assert!(q.contains(r#"root.querySelectorAll("input[name=summary]")"#));
        assert!(q.contains(r#"document.querySelectorAll("div[role=dialog]"))[0]"#));
    }

    #[test]
    fn test_named_selectors() {
        assert_eq!(
            selectors::alert_checkbox(AlertNumber(12)).to_string(),
            "span[data-cy=alert-12] input"
        );
        assert_eq!(
            selectors::bulk_action(AlertAction::Escalate).to_string(),
            "button[data-cy=escalate]"
        );
        assert_eq!(
            selectors::load_more_logs().to_string(),
            "[data-cy=load-more-logs]"
        );
        assert_eq!(
            selectors::button("Next").to_string(),
            r#"button:contains("Next")"#
        );
    }
}
