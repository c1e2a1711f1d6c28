//! The four-step "create alert" dialog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Alert, Service, ServiceId};
use crate::result::ContractError;

/// Wizard steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    /// Summary and details
    Info,
    /// Service picker
    ServiceSelection,
    /// Read-only confirmation
    Confirm,
    /// Created alerts
    Review,
}

impl WizardStep {
    /// Step heading
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Info => "Alert Info",
            Self::ServiceSelection => "Service Selection",
            Self::Confirm => "Confirm",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Dialog buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardButton {
    /// Abandon the wizard
    Cancel,
    /// Previous step
    Back,
    /// Next step
    Next,
    /// Create the alerts
    Submit,
    /// Close after review
    Done,
}

impl WizardButton {
    /// Button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cancel => "Cancel",
            Self::Back => "Back",
            Self::Next => "Next",
            Self::Submit => "Submit",
            Self::Done => "Done",
        }
    }

    /// Parse a button label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        [Self::Cancel, Self::Back, Self::Next, Self::Submit, Self::Done]
            .into_iter()
            .find(|b| b.label() == label.trim())
    }
}

/// One alert to create on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    /// Target service
    pub service_id: ServiceId,
    /// Summary
    pub summary: String,
    /// Details
    pub details: String,
}

/// Create-alert wizard state
#[derive(Debug, Clone)]
pub struct CreateAlertWizard {
    step: WizardStep,
    summary: String,
    details: String,
    service_search: String,
    selected: Vec<Service>,
    created: Vec<Alert>,
    open: bool,
}

impl Default for CreateAlertWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateAlertWizard {
    /// Open a fresh wizard on the info step
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: WizardStep::Info,
            summary: String::new(),
            details: String::new(),
            service_search: String::new(),
            selected: Vec::new(),
            created: Vec::new(),
            open: true,
        }
    }

    /// Current step
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// Whether the dialog is still open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Entered summary
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Entered details
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Current picker search text
    #[must_use]
    pub fn service_search(&self) -> &str {
        &self.service_search
    }

    /// Selected services in the order they were added
    #[must_use]
    pub fn selected(&self) -> &[Service] {
        &self.selected
    }

    /// Alerts created on submit
    #[must_use]
    pub fn created(&self) -> &[Alert] {
        &self.created
    }

    /// Running count label shown above the chips
    #[must_use]
    pub fn selected_label(&self) -> String {
        format!("Selected Services ({})", self.selected.len())
    }

    fn require(&self, expected: WizardStep) -> Result<(), ContractError> {
        if !self.open {
            return Err(ContractError::DialogClosed);
        }
        if self.step == expected {
            Ok(())
        } else {
            Err(ContractError::WrongStep {
                expected: expected.title(),
                actual: self.step.title(),
            })
        }
    }

    /// Type into the summary field (appends, like keystrokes)
    pub fn type_summary(&mut self, text: &str) -> Result<(), ContractError> {
        self.require(WizardStep::Info)?;
        self.summary.push_str(text);
        Ok(())
    }

    /// Type into the details field
    pub fn type_details(&mut self, text: &str) -> Result<(), ContractError> {
        self.require(WizardStep::Info)?;
        self.details.push_str(text);
        Ok(())
    }

    /// Type into the service search
    pub fn type_service_search(&mut self, text: &str) -> Result<(), ContractError> {
        self.require(WizardStep::ServiceSelection)?;
        self.service_search.push_str(text);
        Ok(())
    }

    /// Clear the summary field
    pub fn clear_summary(&mut self) -> Result<(), ContractError> {
        self.require(WizardStep::Info)?;
        self.summary.clear();
        Ok(())
    }

    /// Clear the details field
    pub fn clear_details(&mut self) -> Result<(), ContractError> {
        self.require(WizardStep::Info)?;
        self.details.clear();
        Ok(())
    }

    /// Clear the service search
    pub fn clear_service_search(&mut self) -> Result<(), ContractError> {
        self.require(WizardStep::ServiceSelection)?;
        self.service_search.clear();
        Ok(())
    }

    /// Services offered by the picker for the current search.
    ///
    /// Already-selected services are not offered again; an empty search
    /// offers nothing.
    #[must_use]
    pub fn search_results<'a>(&self, services: &'a [Service]) -> Vec<&'a Service> {
        let needle = self.service_search.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        services
            .iter()
            .filter(|s| !self.selected.iter().any(|sel| sel.id == s.id))
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Add a service chip
    pub fn add_service(&mut self, service: Service) -> Result<(), ContractError> {
        self.require(WizardStep::ServiceSelection)?;
        if !self.selected.iter().any(|s| s.id == service.id) {
            self.selected.push(service);
        }
        Ok(())
    }

    /// Remove a service chip
    pub fn remove_service(&mut self, id: &ServiceId) -> Result<(), ContractError> {
        self.require(WizardStep::ServiceSelection)?;
        self.selected.retain(|s| &s.id != id);
        Ok(())
    }

    /// Buttons rendered on the current step with their visibility
    #[must_use]
    pub fn buttons(&self) -> Vec<(WizardButton, bool)> {
        match self.step {
            WizardStep::Info => vec![(WizardButton::Cancel, true), (WizardButton::Next, true)],
            WizardStep::ServiceSelection => {
                vec![(WizardButton::Back, true), (WizardButton::Next, true)]
            }
            WizardStep::Confirm => vec![(WizardButton::Back, true), (WizardButton::Submit, true)],
            WizardStep::Review => vec![(WizardButton::Back, false), (WizardButton::Done, true)],
        }
    }

    /// Whether a button is visible on the current step
    #[must_use]
    pub fn is_visible(&self, button: WizardButton) -> bool {
        self.open && self.buttons().contains(&(button, true))
    }

    /// Advance one step
    pub fn next(&mut self) -> Result<(), ContractError> {
        if !self.is_visible(WizardButton::Next) {
            return Err(unavailable(WizardButton::Next));
        }
        self.step = match self.step {
            WizardStep::Info => {
                if self.summary.trim().is_empty() {
                    return Err(ContractError::SummaryRequired);
                }
                WizardStep::ServiceSelection
            }
            WizardStep::ServiceSelection => WizardStep::Confirm,
            step => step,
        };
        Ok(())
    }

    /// Go back one step; entered data is kept
    pub fn back(&mut self) -> Result<(), ContractError> {
        if !self.is_visible(WizardButton::Back) {
            return Err(unavailable(WizardButton::Back));
        }
        self.step = match self.step {
            WizardStep::ServiceSelection => WizardStep::Info,
            WizardStep::Confirm => WizardStep::ServiceSelection,
            step => step,
        };
        Ok(())
    }

    /// One draft per selected service, valid only on the confirm step
    pub fn drafts(&self) -> Result<Vec<AlertDraft>, ContractError> {
        if !self.is_visible(WizardButton::Submit) {
            return Err(unavailable(WizardButton::Submit));
        }
        Ok(self
            .selected
            .iter()
            .map(|s| AlertDraft {
                service_id: s.id.clone(),
                summary: self.summary.trim().to_string(),
                details: self.details.clone(),
            })
            .collect())
    }

    /// Record the created alerts and move to review
    pub fn complete(&mut self, created: Vec<Alert>) -> Result<(), ContractError> {
        self.require(WizardStep::Confirm)?;
        self.created = created;
        self.step = WizardStep::Review;
        Ok(())
    }

    /// Close from the review step
    pub fn done(&mut self) -> Result<(), ContractError> {
        if !self.is_visible(WizardButton::Done) {
            return Err(unavailable(WizardButton::Done));
        }
        self.open = false;
        Ok(())
    }

    /// Abandon from the info step
    pub fn cancel(&mut self) -> Result<(), ContractError> {
        if !self.is_visible(WizardButton::Cancel) {
            return Err(unavailable(WizardButton::Cancel));
        }
        self.open = false;
        Ok(())
    }
}

fn unavailable(button: WizardButton) -> ContractError {
    ContractError::ButtonUnavailable {
        label: button.label().to_string(),
    }
}
