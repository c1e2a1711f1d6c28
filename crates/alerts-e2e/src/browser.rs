//! Browser control over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature this launches Chromium through chromiumoxide
//! and hands out [`ChromiumDriver`] pages. Without it only the configuration
//! types are available and the suite runs against the simulator.

use serde::{Deserialize, Serialize};

use crate::config::ScreenFormat;

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Emulate a mobile device
    pub mobile: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        let (viewport_width, viewport_height) = ScreenFormat::Widescreen.viewport();
        Self {
            headless: true,
            viewport_width,
            viewport_height,
            mobile: false,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Size the viewport for a screen format
    #[must_use]
    pub const fn for_screen(self, screen: ScreenFormat) -> Self {
        let (width, height) = screen.viewport();
        let mut config = self.with_viewport(width, height);
        config.mobile = screen.is_mobile();
        config
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::BrowserConfig;
    use crate::config::ScreenFormat;
    use crate::driver::{scripts, PageDriver};
    use crate::locator::Selector;
    use crate::result::{E2eError, E2eResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> E2eResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| E2eError::BrowserLaunchError { message })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                let message = e.to_string();
                if message.contains("Could not auto detect") {
                    E2eError::BrowserNotFound
                } else {
                    E2eError::BrowserLaunchError { message }
                }
            })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            tracing::debug!(
                headless = config.headless,
                width = config.viewport_width,
                height = config.viewport_height,
                "browser launched"
            );

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Open a blank page emulating `screen`
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self, screen: ScreenFormat) -> E2eResult<ChromiumDriver> {
            let viewport = self.config.clone().for_screen(screen);
            let browser = self.inner.lock().await;
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| E2eError::page(e.to_string()))?;

            let metrics = SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(viewport.viewport_width))
                .height(i64::from(viewport.viewport_height))
                .device_scale_factor(1.0)
                .mobile(viewport.mobile)
                .build()
                .map_err(E2eError::page)?;
            page.execute(metrics)
                .await
                .map_err(|e| E2eError::page(e.to_string()))?;

            Ok(ChromiumDriver { page })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> E2eResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| E2eError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            let _ = browser.wait().await;
            self.handle.abort();
            Ok(())
        }
    }

    /// [`PageDriver`] over a chromiumoxide page
    #[derive(Debug, Clone)]
    pub struct ChromiumDriver {
        page: CdpPage,
    }

    impl ChromiumDriver {
        async fn run_gesture(&self, script: String, selector: &Selector) -> E2eResult<()> {
            let found = self.evaluate(&script).await?;
            if scripts::found(&found) {
                Ok(())
            } else {
                Err(E2eError::ElementNotFound {
                    selector: selector.to_string(),
                })
            }
        }
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn navigate(&self, url: &str) -> E2eResult<()> {
            tracing::debug!(url, "navigate");
            self.page
                .goto(url)
                .await
                .map_err(|e| E2eError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> E2eResult<String> {
            self.page
                .url()
                .await
                .map_err(|e| E2eError::page(e.to_string()))?
                .ok_or_else(|| E2eError::page("page has no URL"))
        }

        async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
            let result = self
                .page
                .evaluate(script)
                .await
                .map_err(|e| E2eError::EvaluationError {
                    message: e.to_string(),
                })?;
            Ok(result
                .into_value::<serde_json::Value>()
                .unwrap_or(serde_json::Value::Null))
        }

        async fn click(&self, selector: &Selector) -> E2eResult<()> {
            tracing::debug!(%selector, "click");
            self.run_gesture(scripts::click(selector), selector).await
        }

        async fn type_text(&self, selector: &Selector, text: &str) -> E2eResult<()> {
            tracing::debug!(%selector, text, "type");
            self.run_gesture(scripts::focus(selector), selector).await?;
            self.page
                .execute(InsertTextParams::new(text))
                .await
                .map_err(|e| E2eError::InputError {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn clear(&self, selector: &Selector) -> E2eResult<()> {
            tracing::debug!(%selector, "clear");
            self.run_gesture(scripts::clear(selector), selector).await
        }

        async fn close(&self) -> E2eResult<()> {
            self.page
                .clone()
                .close()
                .await
                .map_err(|e| E2eError::page(e.to_string()))
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, ChromiumDriver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_headless_widescreen() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!((config.viewport_width, config.viewport_height), (1440, 900));
    }

    #[test]
    fn test_for_screen() {
        let config = BrowserConfig::default().for_screen(ScreenFormat::Mobile);
        assert_eq!((config.viewport_width, config.viewport_height), (375, 667));
        assert!(config.mobile);
    }

    #[test]
    fn test_builders() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_no_sandbox()
            .with_chromium_path("/usr/bin/chromium");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }
}
