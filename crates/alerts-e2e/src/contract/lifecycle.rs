//! Alert lifecycle actions and their attribution lines.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::AlertStatus;

/// An action that moves an alert through its lifecycle.
///
/// The same three actions are offered on the detail page and as bulk actions
/// on the list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertAction {
    /// Acknowledge an unacknowledged alert
    Acknowledge,
    /// Request escalation (re-notify); resets acknowledgment
    Escalate,
    /// Close the alert
    Close,
}

impl AlertAction {
    /// All actions in the order the UI presents them
    pub const ALL: [Self; 3] = [Self::Acknowledge, Self::Escalate, Self::Close];

    /// Button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Acknowledge => "Acknowledge",
            Self::Escalate => "Escalate",
            Self::Close => "Close",
        }
    }

    /// `data-cy` value of the bulk action button
    #[must_use]
    pub const fn data_cy(self) -> &'static str {
        match self {
            Self::Acknowledge => "acknowledge",
            Self::Escalate => "escalate",
            Self::Close => "close",
        }
    }

    /// Parse a button label (case-insensitive)
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Attribution line recorded when `user` performs this action
    #[must_use]
    pub fn attribution(self, user: &str) -> String {
        match self {
            Self::Acknowledge => format!("Acknowledged by {user}"),
            Self::Escalate => format!("Escalation requested by {user}"),
            Self::Close => format!("Closed by {user}"),
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Attribution line for alert creation
#[must_use]
pub fn created_attribution(user: &str) -> String {
    format!("Created by {user}")
}

impl AlertStatus {
    /// Status after applying `action`, or `None` when the action does not
    /// change this alert.
    #[must_use]
    pub const fn apply(self, action: AlertAction) -> Option<Self> {
        match (self, action) {
            (Self::Unacknowledged, AlertAction::Acknowledge) => Some(Self::Acknowledged),
            (Self::Unacknowledged | Self::Acknowledged, AlertAction::Escalate) => {
                Some(Self::Unacknowledged)
            }
            (Self::Unacknowledged | Self::Acknowledged, AlertAction::Close) => Some(Self::Closed),
            _ => None,
        }
    }

    /// Whether the detail page offers `action` for this status
    #[must_use]
    pub const fn offers(self, action: AlertAction) -> bool {
        self.apply(action).is_some()
    }
}
