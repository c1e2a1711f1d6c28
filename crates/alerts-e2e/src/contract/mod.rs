//! Product rules of the Alerts UI.
//!
//! These are the behaviors the scenarios assert on, expressed as plain data
//! transformations. The in-memory reference application is built from them,
//! and scenarios use them to compute expected values.

pub mod bulk;
pub mod lifecycle;
pub mod logs;
pub mod search;
pub mod selection;
pub mod wizard;

pub use bulk::{apply_bulk, BulkOutcome, BulkPlan};
pub use lifecycle::{created_attribution, AlertAction};
pub use logs::{LogPageSize, LogPager};
pub use search::{AlertFilter, FilterOutcome, SearchQuery};
pub use selection::{HeaderState, Selection, SelectionMenu};
pub use wizard::{AlertDraft, CreateAlertWizard, WizardButton, WizardStep};
