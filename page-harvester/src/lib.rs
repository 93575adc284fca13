//! Browser-driven collection of post text from account pages.
//!
//! [`AccountHarvester`] drives a [`BrowserSession`] through one account:
//! navigate, wait for the first post, then scroll and snapshot repeatedly,
//! keeping each distinct post text once. The Chrome backend lives behind the
//! `chrome` feature; anything implementing [`SessionLauncher`] can stand in.

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod extract;
pub mod harvester;
pub mod orchestrator;
pub mod retry;
pub mod session;

#[cfg(test)]
mod tests;

#[cfg(feature = "chrome")]
pub use chrome::{ChromeLauncher, ChromeSession};
pub use extract::{PostExtractor, PostScan};
pub use harvester::{HarvestStats, PageHarvester};
pub use orchestrator::{is_launch_failure, validate_account_url, AccountHarvester};
pub use retry::{RetryConfig, RetryExecutor};
pub use session::{BrowserSession, SessionGuard, SessionLauncher};
