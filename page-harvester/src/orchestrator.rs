use crate::harvester::PageHarvester;
use crate::retry::{RetryConfig, RetryExecutor};
use crate::session::{BrowserSession, SessionGuard, SessionLauncher};
use tracing::{info, warn};
use trendscope_core::{BrowserError, CoreError, DocumentCollection, HarvestConfig};
use url::Url;

/// Checks that `raw` is an absolute http(s) URL with a host.
pub fn validate_account_url(raw: &str) -> Result<Url, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

/// Harvests one account page end to end: launch, navigate, wait for the
/// first post, scroll, close.
pub struct AccountHarvester<L: SessionLauncher> {
    launcher: L,
    harvester: PageHarvester,
    navigation: RetryExecutor,
}

impl<L: SessionLauncher> AccountHarvester<L> {
    pub fn new(launcher: L, harvester: PageHarvester) -> Self {
        let navigation = RetryExecutor::new(RetryConfig::navigation(harvester.config()));
        Self {
            launcher,
            harvester,
            navigation,
        }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Collects distinct post texts from `url`.
    ///
    /// The URL is checked before any browser starts. Once a session is open it
    /// is closed exactly once on every path out of this function.
    pub fn harvest_account(
        &self,
        url: &str,
        headless: bool,
    ) -> Result<DocumentCollection, CoreError> {
        let url = validate_account_url(url)?;
        let config = self.harvester.config();

        info!("Harvesting {}", url);
        let mut session = SessionGuard::new(self.launcher.launch(headless)?);

        self.navigation
            .execute("navigate", || session.navigate(url.as_str()))?;
        session.wait_for_element(&config.ready_selector, config.element_wait_timeout)?;

        let (documents, stats) = self
            .harvester
            .harvest_with_stats(&mut *session, config.max_scrolls)?;

        if let Err(e) = session.close() {
            warn!("Browser session for {} did not close cleanly: {}", url, e);
        }

        info!(
            "Harvested {} posts from {} in {:?} ({} scrolls, {} duplicates)",
            documents.len(),
            url,
            stats.elapsed,
            stats.iterations,
            stats.duplicates_skipped
        );
        Ok(documents)
    }
}

/// Whether an error from [`AccountHarvester::harvest_account`] means the
/// browser itself could not be started.
pub fn is_launch_failure(error: &CoreError) -> bool {
    matches!(error, CoreError::Browser(BrowserError::LaunchFailed { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_account_url("https://x.com/rustlang").is_ok());
        assert!(validate_account_url("http://example.com/feed?tab=latest").is_ok());
    }

    #[test]
    fn test_rejects_malformed_urls() {
        for raw in ["", "not a url", "x.com/rustlang", "ftp://example.com/a", "https://"] {
            let err = validate_account_url(raw).unwrap_err();
            assert!(matches!(err, CoreError::InvalidUrl { .. }), "{raw} accepted");
        }
    }
}
