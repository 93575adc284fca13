use crate::session::{BrowserSession, SessionLauncher};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use trendscope_core::BrowserError;

/// Launches a local Chrome/Chromium through the DevTools protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

impl ChromeLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    fn launch(&self, headless: bool) -> Result<ChromeSession, BrowserError> {
        let launch_failed = |e: &dyn std::fmt::Display| BrowserError::LaunchFailed {
            reason: e.to_string(),
        };

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .sandbox(false)
            .args(vec![OsStr::new("--disable-gpu")])
            .build()
            .map_err(|e| launch_failed(&e))?;

        let browser = Browser::new(options).map_err(|e| launch_failed(&e))?;
        let tab = browser.new_tab().map_err(|e| launch_failed(&e))?;
        debug!("Chrome launched (headless: {})", headless);

        Ok(ChromeSession {
            browser: Some(browser),
            tab,
        })
    }
}

/// One browser process with a single tab.
pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeSession {
    fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.browser.is_some() {
            Ok(())
        } else {
            Err(BrowserError::SessionClosed)
        }
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.ensure_open()?;
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.ensure_open()?;
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| {
                debug!("Waiting for {} failed: {}", selector, e);
                BrowserError::ElementTimeout {
                    selector: selector.to_string(),
                    timeout_secs: timeout.as_secs(),
                }
            })
    }

    fn scroll_by(&mut self, delta_y: i64) -> Result<(), BrowserError> {
        self.ensure_open()?;
        self.tab
            .evaluate(&format!("window.scrollBy(0, {delta_y});"), false)
            .map(|_| ())
            .map_err(|e| BrowserError::ScriptFailed {
                reason: e.to_string(),
            })
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        self.ensure_open()?;
        self.tab
            .get_content()
            .map_err(|e| BrowserError::SnapshotFailed {
                reason: e.to_string(),
            })
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        let browser = self.browser.take().ok_or(BrowserError::SessionClosed)?;
        let closed = self.tab.close(false).map(|_| ()).map_err(|e| BrowserError::CloseFailed {
            reason: e.to_string(),
        });
        // Dropping the handle terminates the browser process.
        drop(browser);
        closed
    }
}
