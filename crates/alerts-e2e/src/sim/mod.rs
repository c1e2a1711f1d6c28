//! In-memory reference application.
//!
//! [`SimulatedApp`] is a backend built from the contract rules. It accepts
//! fixture seeding through [`SeedApi`] and renders pages through
//! [`SimulatedUi`], so the whole scenario suite runs offline and
//! deterministically.

mod backend;
mod ui;

pub use backend::Backend;
pub use ui::SimulatedUi;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::ScreenFormat;
use crate::contract::LogPageSize;
use crate::model::{Alert, AlertLogs, Service};
use crate::result::E2eResult;
use crate::seed::{AlertLogsOptions, AlertOptions, SeedApi, ServiceOptions};

/// Shared handle to one simulated deployment
#[derive(Debug, Clone)]
pub struct SimulatedApp {
    backend: Arc<Mutex<Backend>>,
    page_size: LogPageSize,
}

impl SimulatedApp {
    /// Fresh deployment whose signed-in user is `user`
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(Mutex::new(Backend::new(user))),
            page_size: LogPageSize::default(),
        }
    }

    /// Use different log page sizes
    #[must_use]
    pub const fn with_page_size(mut self, page_size: LogPageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Open a page on this deployment
    #[must_use]
    pub fn open(&self, screen: ScreenFormat) -> SimulatedUi {
        SimulatedUi::new(self.clone(), screen)
    }

    /// Lock the backend state
    pub async fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().await
    }

    pub(crate) const fn page_size(&self) -> LogPageSize {
        self.page_size
    }
}

#[async_trait]
impl SeedApi for SimulatedApp {
    async fn create_service(&self, options: ServiceOptions) -> E2eResult<Service> {
        Ok(self.backend().await.create_service(options))
    }

    async fn create_alert(&self, options: AlertOptions) -> E2eResult<Alert> {
        self.backend().await.create_alert(options)
    }

    async fn create_alert_logs(&self, options: AlertLogsOptions) -> E2eResult<AlertLogs> {
        self.backend().await.create_alert_logs(options)
    }
}
