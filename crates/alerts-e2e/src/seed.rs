//! Fixture seeding.
//!
//! Scenarios create their own services, alerts and alert logs before they
//! navigate. [`SeedApi`] is implemented by the HTTP fixture client and by the
//! in-memory reference application.

use async_trait::async_trait;
use serde::Serialize;

use crate::model::{Alert, AlertLogs, Service, ServiceId};
use crate::result::E2eResult;

/// Unique, human-readable name with a random suffix
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix} {}", &id[..12])
}

/// Escalation policy to create alongside a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpOptions {
    /// Number of escalation steps
    pub step_count: u32,
}

/// Options for [`SeedApi::create_service`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOptions {
    /// Name (generated when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Mark as favorite
    pub favorite: bool,
    /// Escalation policy to create
    #[serde(rename = "ep", skip_serializing_if = "Option::is_none")]
    pub escalation_policy: Option<EpOptions>,
}

impl ServiceOptions {
    /// Default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as a favorite
    #[must_use]
    pub const fn favorite(mut self) -> Self {
        self.favorite = true;
        self
    }

    /// Create an escalation policy with `step_count` steps
    #[must_use]
    pub const fn with_escalation_steps(mut self, step_count: u32) -> Self {
        self.escalation_policy = Some(EpOptions { step_count });
        self
    }
}

/// Options for [`SeedApi::create_alert`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertOptions {
    /// Existing service to attach to
    #[serde(rename = "serviceID", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    /// Service to create when `service_id` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceOptions>,
    /// Summary (generated when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Details (generated when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AlertOptions {
    /// Default options: a new service, generated text
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to an existing service
    #[must_use]
    pub fn for_service(id: ServiceId) -> Self {
        Self {
            service_id: Some(id),
            ..Self::default()
        }
    }

    /// Create a new service with these options
    #[must_use]
    pub fn with_service(mut self, service: ServiceOptions) -> Self {
        self.service = Some(service);
        self
    }

    /// Set the summary
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// Options for [`SeedApi::create_alert_logs`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertLogsOptions {
    /// Number of log events to generate
    pub count: usize,
    /// Alert to create and attach the events to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertOptions>,
}

impl AlertLogsOptions {
    /// Generate `count` events on a new alert
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count, alert: None }
    }
}

/// Backend fixture interface
#[async_trait]
pub trait SeedApi: Send + Sync {
    /// Create a service
    async fn create_service(&self, options: ServiceOptions) -> E2eResult<Service>;

    /// Create an alert
    async fn create_alert(&self, options: AlertOptions) -> E2eResult<Alert>;

    /// Create an alert with a batch of log events
    async fn create_alert_logs(&self, options: AlertLogsOptions) -> E2eResult<AlertLogs>;
}

#[cfg(feature = "http")]
mod http {
    use super::{AlertLogsOptions, AlertOptions, SeedApi, ServiceOptions};
    use crate::model::{Alert, AlertLogs, Service};
    use crate::result::{E2eError, E2eResult};
    use async_trait::async_trait;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use url::Url;

    /// [`SeedApi`] over the backend's HTTP fixture endpoints
    #[derive(Debug, Clone)]
    pub struct HttpSeedApi {
        base_url: Url,
        client: reqwest::Client,
    }

    impl HttpSeedApi {
        /// Create a client for the fixture API at `base_url` (ending in `/`)
        #[must_use]
        pub fn new(base_url: Url) -> Self {
            Self::with_client(base_url, reqwest::Client::new())
        }

        /// Create with a custom reqwest client
        #[must_use]
        pub const fn with_client(base_url: Url, client: reqwest::Client) -> Self {
            Self { base_url, client }
        }

        /// Returns the base URL
        #[must_use]
        pub const fn base_url(&self) -> &Url {
            &self.base_url
        }

        async fn post<B: Serialize + Sync, T: DeserializeOwned>(
            &self,
            path: &str,
            body: &B,
        ) -> E2eResult<T> {
            let url = self.base_url.join(path)?;
            tracing::debug!(%url, "seeding fixture");

            let resp = self
                .client
                .post(url.clone())
                .json(body)
                .send()
                .await
                .map_err(|e| E2eError::seed(format!("POST {url}: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(E2eError::seed(format!(
                    "POST {url} returned {}: {body}",
                    status.as_u16()
                )));
            }

            resp.json()
                .await
                .map_err(|e| E2eError::seed(format!("POST {url}: invalid response: {e}")))
        }
    }

    #[async_trait]
    impl SeedApi for HttpSeedApi {
        async fn create_service(&self, options: ServiceOptions) -> E2eResult<Service> {
            self.post("fixtures/service", &options).await
        }

        async fn create_alert(&self, options: AlertOptions) -> E2eResult<Alert> {
            self.post("fixtures/alert", &options).await
        }

        async fn create_alert_logs(&self, options: AlertLogsOptions) -> E2eResult<AlertLogs> {
            self.post("fixtures/alert-logs", &options).await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_fixture_paths_stay_under_base_path() {
            let api = HttpSeedApi::new(Url::parse("http://localhost:3030/api/").unwrap());
            assert_eq!(
                api.base_url().join("fixtures/alert-logs").unwrap().as_str(),
                "http://localhost:3030/api/fixtures/alert-logs"
            );
        }

        #[tokio::test]
        async fn test_unreachable_backend_is_seed_error() {
            let api = HttpSeedApi::new(Url::parse("http://127.0.0.1:1/").unwrap());
            let err = api.create_service(ServiceOptions::new()).await.unwrap_err();
            assert!(matches!(err, E2eError::Seed { .. }));
        }
    }
}

#[cfg(feature = "http")]
pub use http::HttpSeedApi;
