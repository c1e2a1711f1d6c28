//! Row checkboxes and the header select-all control.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::AlertNumber;
use crate::result::ContractError;

/// Visual state of the header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderState {
    /// No rows checked
    None,
    /// Some but not all rows checked (indeterminate)
    Partial,
    /// Every visible row checked
    All,
}

/// Options of the header checkbox menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMenu {
    /// Check every visible row
    All,
    /// Clear the selection
    None,
}

impl SelectionMenu {
    /// Parse a menu option label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "All" => Some(Self::All),
            "None" => Some(Self::None),
            _ => None,
        }
    }
}

/// Checked rows over the currently visible list
#[derive(Debug, Clone, Default)]
pub struct Selection {
    visible: Vec<AlertNumber>,
    checked: BTreeSet<AlertNumber>,
}

impl Selection {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible rows; rows that disappeared are unchecked
    pub fn set_visible(&mut self, rows: impl IntoIterator<Item = AlertNumber>) {
        self.visible = rows.into_iter().collect();
        let visible = &self.visible;
        self.checked.retain(|n| visible.contains(n));
    }

    /// Visible rows in display order
    #[must_use]
    pub fn visible(&self) -> &[AlertNumber] {
        &self.visible
    }

    /// Check or uncheck a single row
    pub fn set(&mut self, number: AlertNumber, checked: bool) -> Result<(), ContractError> {
        if !self.visible.contains(&number) {
            return Err(ContractError::UnknownAlert(number));
        }
        if checked {
            let _ = self.checked.insert(number);
        } else {
            let _ = self.checked.remove(&number);
        }
        Ok(())
    }

    /// Flip a single row
    pub fn toggle(&mut self, number: AlertNumber) -> Result<(), ContractError> {
        let checked = self.is_checked(number);
        self.set(number, !checked)
    }

    /// Whether a row is checked
    #[must_use]
    pub fn is_checked(&self, number: AlertNumber) -> bool {
        self.checked.contains(&number)
    }

    /// Header checkbox state
    #[must_use]
    pub fn header_state(&self) -> HeaderState {
        if self.checked.is_empty() {
            HeaderState::None
        } else if self.checked.len() == self.visible.len() {
            HeaderState::All
        } else {
            HeaderState::Partial
        }
    }

    /// Click the header checkbox.
    ///
    /// An indeterminate header clears the selection rather than filling it.
    pub fn click_header(&mut self) {
        match self.header_state() {
            HeaderState::None => self.checked = self.visible.iter().copied().collect(),
            HeaderState::Partial | HeaderState::All => self.checked.clear(),
        }
    }

    /// Pick an option from the header menu
    pub fn menu(&mut self, option: SelectionMenu) {
        match option {
            SelectionMenu::All => self.checked = self.visible.iter().copied().collect(),
            SelectionMenu::None => self.checked.clear(),
        }
    }

    /// Checked rows in display order
    #[must_use]
    pub fn checked(&self) -> Vec<AlertNumber> {
        self.visible
            .iter()
            .copied()
            .filter(|n| self.checked.contains(n))
            .collect()
    }

    /// Number of checked rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.checked.len()
    }

    /// Whether nothing is checked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Uncheck everything
    pub fn clear(&mut self) {
        self.checked.clear();
    }
}
