//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::Result;
use headless_chrome::{Browser, LaunchOptions, Tab};
use pagesense_core::PageSenseError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for browser launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// User agent string
    pub user_agent: Option<String>,
    /// Navigation timeout in seconds
    pub timeout_seconds: u64,
    /// Pause after navigation so late scripts can render
    pub settle_millis: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: None,
            timeout_seconds: 30,
            settle_millis: 500,
        }
    }
}

impl BrowserConfig {
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn browser_error(context: &str, e: impl std::fmt::Display) -> PageSenseError {
    PageSenseError::Browser(format!("{}: {}", context, e))
}

/// Active browser session with Chrome DevTools Protocol
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a new browser instance
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| browser_error("Failed to launch browser", e))?;

        let user_agent_arg: Option<String> = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(ref ua_arg) = user_agent_arg {
            launch_options.args.push(OsStr::new(ua_arg));
        }

        let browser =
            Browser::new(launch_options).map_err(|e| browser_error("Failed to launch browser", e))?;
        let tab = browser
            .new_tab()
            .map_err(|e| browser_error("Failed to create tab", e))?;
        tab.set_default_timeout(config.timeout());

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Connect to an existing browser instance
    ///
    /// # Arguments
    /// * `port` - Chrome DevTools Protocol port (typically 9222)
    pub async fn connect(port: u16) -> Result<Self> {
        info!("Connecting to existing browser on port {}", port);

        let browser = Browser::connect(format!("http://127.0.0.1:{}", port))
            .map_err(|e| browser_error("Failed to connect to browser", e))?;
        let tab = browser
            .new_tab()
            .map_err(|e| browser_error("Failed to create tab", e))?;

        info!("Connected to browser successfully");

        Ok(Self {
            browser,
            tab,
            config: BrowserConfig::default(),
        })
    }

    /// Navigate to a URL and wait for the load to finish
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| browser_error(&format!("Failed to navigate to {}", url), e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| browser_error(&format!("Navigation timeout for {}", url), e))?;

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    /// Give client-side rendering a moment before inspecting
    pub async fn settle(&self) {
        let pause = self.config.settle_duration();
        if !pause.is_zero() {
            debug!("Settling for {:?}", pause);
            tokio::time::sleep(pause).await;
        }
    }

    /// Execute JavaScript in the page context
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        self.evaluate(script)
    }

    /// Blocking evaluation used by the snapshot queries
    pub(crate) fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript ({} bytes)", script.len());

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| browser_error("JavaScript evaluation failed", e))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the current URL
    pub async fn get_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    /// Get the current page title
    pub async fn get_title(&self) -> Result<String> {
        self.tab
            .get_title()
            .map_err(|e| browser_error("Failed to read title", e))
    }

    /// Names of every cookie visible to the tab, HttpOnly ones included
    pub(crate) fn all_cookie_names(&self) -> Result<Vec<String>> {
        let cookies = self
            .tab
            .get_cookies()
            .map_err(|e| browser_error("Failed to read cookies", e))?;
        Ok(cookies.into_iter().map(|c| c.name).collect())
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Get reference to the active tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Close the tab and shut down the browser process
    ///
    /// Dropping a session without calling this still terminates the
    /// browser process it launched.
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        self.tab
            .close(true)
            .map_err(|e| browser_error("Failed to close tab", e))?;
        drop(self.tab);
        drop(self.browser);
        debug!("Browser session closed");
        Ok(())
    }
}
