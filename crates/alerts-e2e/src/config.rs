//! Suite configuration.
//!
//! Values come from defaults, an optional YAML file, then environment
//! variables, in that order. The CLI applies its flags last.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::assertion::RetryConfig;
use crate::browser::BrowserConfig;
use crate::contract::LogPageSize;
use crate::result::{E2eError, E2eResult};

/// Base URL of the application under test
pub const ENV_BASE_URL: &str = "ALERTS_E2E_BASE_URL";
/// Base URL of the fixture API
pub const ENV_API_URL: &str = "ALERTS_E2E_API_URL";
/// Restrict to one screen format
pub const ENV_SCREEN: &str = "ALERTS_E2E_SCREEN";
/// Display name of the seeded user
pub const ENV_USER: &str = "ALERTS_E2E_USER";
/// Chromium executable
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Viewport class a scenario runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenFormat {
    /// Desktop layout
    Widescreen,
    /// Phone layout
    Mobile,
}

impl ScreenFormat {
    /// Every format, in run order
    pub const ALL: [Self; 2] = [Self::Widescreen, Self::Mobile];

    /// Viewport `(width, height)` in CSS pixels
    #[must_use]
    pub const fn viewport(self) -> (u32, u32) {
        match self {
            Self::Widescreen => (1440, 900),
            Self::Mobile => (375, 667),
        }
    }

    /// Whether this is the mobile layout
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }

    /// Lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Widescreen => "widescreen",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for ScreenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenFormat {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "widescreen" | "wide" | "desktop" => Ok(Self::Widescreen),
            "mobile" | "phone" => Ok(Self::Mobile),
            other => Err(E2eError::config(format!(
                "unknown screen format {other:?} (expected widescreen or mobile)"
            ))),
        }
    }
}

/// Configuration of a suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Base URL of the application under test
    pub base_url: String,
    /// Base URL of the fixture API (defaults to `base_url`)
    pub api_url: Option<String>,
    /// Display name of the user the UI runs as
    pub user_name: String,
    /// Run only this screen format (None = every format)
    pub screen: Option<ScreenFormat>,
    /// Assertion timeout in milliseconds
    pub assert_timeout_ms: u64,
    /// Assertion poll interval in milliseconds
    pub poll_interval_ms: u64,
    /// Per-scenario timeout in milliseconds
    pub scenario_timeout_ms: u64,
    /// Log page sizes of the deployment
    pub log_page_size: LogPageSize,
    /// Browser settings
    pub browser: BrowserConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030".to_string(),
            api_url: None,
            user_name: "E2E User".to_string(),
            screen: None,
            assert_timeout_ms: 4_000,
            poll_interval_ms: 100,
            scenario_timeout_ms: 60_000,
            log_page_size: LogPageSize::default(),
            browser: BrowserConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Parse YAML configuration
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is malformed or the result is invalid
    pub fn from_yaml_str(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> E2eResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded suite config");
        Self::from_yaml_str(&yaml)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an invalid value
    pub fn apply_env(&mut self) -> E2eResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an invalid value
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> E2eResult<()> {
        let get = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(screen) = get(ENV_SCREEN) {
            self.screen = Some(screen.parse()?);
        }
        if let Some(user) = get(ENV_USER) {
            self.user_name = user;
        }
        if let Some(path) = get(ENV_CHROMIUM_PATH) {
            self.browser.chromium_path = Some(path);
        }
        self.validate()
    }

    /// Check invariants
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid field
    pub fn validate(&self) -> E2eResult<()> {
        parse_base("base_url", &self.base_url)?;
        if let Some(ref url) = self.api_url {
            parse_base("api_url", url)?;
        }
        if self.scenario_timeout_ms == 0 {
            return Err(E2eError::config("scenario_timeout_ms must be positive"));
        }
        if self.log_page_size.initial == 0 || self.log_page_size.subsequent == 0 {
            return Err(E2eError::config("log page sizes must be positive"));
        }
        Ok(())
    }

    /// Fixture API base URL as configured
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Parsed application base, always ending in `/`
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not an absolute http(s) URL
    pub fn app_base(&self) -> E2eResult<Url> {
        parse_base("base_url", &self.base_url)
    }

    /// Parsed fixture API base, always ending in `/`
    ///
    /// # Errors
    ///
    /// Returns error if the API URL is not an absolute http(s) URL
    pub fn api_base(&self) -> E2eResult<Url> {
        let field = if self.api_url.is_some() { "api_url" } else { "base_url" };
        parse_base(field, self.api_url())
    }

    /// Screen formats to run
    #[must_use]
    pub fn screens(&self) -> Vec<ScreenFormat> {
        self.screen.map_or_else(|| ScreenFormat::ALL.to_vec(), |s| vec![s])
    }

    /// Retry policy for assertions
    #[must_use]
    pub const fn retry(&self) -> RetryConfig {
        RetryConfig::new(Duration::from_millis(self.assert_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    /// Per-scenario timeout
    #[must_use]
    pub const fn scenario_timeout(&self) -> Duration {
        Duration::from_millis(self.scenario_timeout_ms)
    }

    /// Absolute URL of an application path, relative to the base path
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid
    pub fn url_for(&self, path: &str) -> E2eResult<Url> {
        Ok(self.app_base()?.join(path.trim_start_matches('/'))?)
    }
}

/// Parse an http(s) base URL and give it a trailing slash so joins stay
/// under its path
fn parse_base(field: &str, raw: &str) -> E2eResult<Url> {
    let invalid =
        |why: String| E2eError::config(format!("{field} is not a usable URL ({why}): {raw:?}"));
    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("scheme {} is not http(s)", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
