//! Result and error types for the alerts suite.

use thiserror::Error;

use crate::model::{AlertNumber, AlertStatus};

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while seeding, driving, or asserting
#[derive(Debug, Error)]
pub enum E2eError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a selector
    #[error("No element matches {selector}")]
    ElementNotFound {
        /// Rendered selector
        selector: String,
    },

    /// Script evaluation error
    #[error("Evaluation failed: {message}")]
    EvaluationError {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Assertion failed after retrying
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Fixture seeding failed
    #[error("Seeding failed: {message}")]
    Seed {
        /// Error message
        message: String,
    },

    /// The reference application rejected a gesture
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// URL parse or join error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl E2eError {
    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a seeding error
    #[must_use]
    pub fn seed(message: impl Into<String>) -> Self {
        Self::Seed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::PageError {
            message: message.into(),
        }
    }
}

/// Rule violations raised by the alerts contract model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The wizard cannot leave the info step without a summary
    #[error("Summary is required")]
    SummaryRequired,

    /// A wizard operation was attempted on the wrong step
    #[error("Wizard is on step {actual}, expected {expected}")]
    WrongStep {
        /// Step the operation belongs to
        expected: &'static str,
        /// Step the wizard is on
        actual: &'static str,
    },

    /// The wizard is not open
    #[error("Create alert dialog is not open")]
    DialogClosed,

    /// A dialog button is absent or hidden on the current step
    #[error("Button {label:?} is not available")]
    ButtonUnavailable {
        /// Button label
        label: String,
    },

    /// No service matched a picker search
    #[error("No service named {name:?} in search results")]
    UnknownService {
        /// Service name searched for
        name: String,
    },

    /// Alert number not known (or not visible)
    #[error("Alert #{0} not found")]
    UnknownAlert(AlertNumber),

    /// Lifecycle action not offered for the current status
    #[error("{action} is not available for {status} alerts")]
    ActionNotOffered {
        /// Action label
        action: &'static str,
        /// Current status
        status: AlertStatus,
    },

    /// Gesture attempted on a page that does not have it
    #[error("{gesture} is not available on {path}")]
    NotOnPage {
        /// Gesture name
        gesture: &'static str,
        /// Current path
        path: String,
    },
}
