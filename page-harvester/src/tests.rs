use crate::{AccountHarvester, BrowserSession, PageHarvester, SessionGuard, SessionLauncher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trendscope_core::{BrowserError, CoreError, HarvestConfig};

fn page(posts: &[&str]) -> String {
    let articles: String = posts
        .iter()
        .map(|text| format!(r#"<article><div data-testid="tweetText">{text}</div></article>"#))
        .collect();
    format!("<html><body>{articles}</body></html>")
}

fn fast_config() -> HarvestConfig {
    HarvestConfig {
        settle_duration: Duration::ZERO,
        navigation_backoff: Duration::from_millis(1),
        max_scrolls: 5,
        ..Default::default()
    }
}

#[derive(Clone, Default)]
struct Counters {
    launches: Arc<AtomicUsize>,
    navigations: Arc<AtomicUsize>,
    scrolls: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Counters {
    fn get(counter: &Arc<AtomicUsize>) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Replays a fixed list of snapshots, one per scroll; the last repeats.
#[derive(Clone, Default)]
struct Script {
    snapshots: Vec<String>,
    failing_navigations: usize,
    navigation_error: Option<BrowserError>,
    element_missing: bool,
    scroll_error_at: Option<usize>,
}

struct MockSession {
    script: Script,
    counters: Counters,
    scrolled: usize,
}

impl BrowserSession for MockSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let attempt = self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.script.navigation_error {
            return Err(error.clone());
        }
        if attempt < self.script.failing_navigations {
            return Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(())
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        if self.script.element_missing {
            return Err(BrowserError::ElementTimeout {
                selector: selector.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
        Ok(())
    }

    fn scroll_by(&mut self, _delta_y: i64) -> Result<(), BrowserError> {
        if self.script.scroll_error_at == Some(self.scrolled) {
            return Err(BrowserError::ScriptFailed {
                reason: "page crashed".to_string(),
            });
        }
        self.scrolled += 1;
        self.counters.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        let snapshots = &self.script.snapshots;
        let index = self.scrolled.saturating_sub(1).min(snapshots.len().saturating_sub(1));
        Ok(snapshots.get(index).cloned().unwrap_or_default())
    }

    fn close(&mut self) -> Result<(), BrowserError> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockLauncher {
    script: Script,
    counters: Counters,
    fail_launch: bool,
}

impl MockLauncher {
    fn new(script: Script) -> Self {
        Self {
            script,
            counters: Counters::default(),
            fail_launch: false,
        }
    }
}

impl SessionLauncher for MockLauncher {
    type Session = MockSession;

    fn launch(&self, _headless: bool) -> Result<MockSession, BrowserError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(BrowserError::LaunchFailed {
                reason: "chrome not found".to_string(),
            });
        }
        Ok(MockSession {
            script: self.script.clone(),
            counters: self.counters.clone(),
            scrolled: 0,
        })
    }
}

fn account_harvester(
    launcher: MockLauncher,
    config: HarvestConfig,
) -> AccountHarvester<MockLauncher> {
    AccountHarvester::new(launcher, PageHarvester::new(config).unwrap())
}

#[test]
fn test_identical_snapshots_yield_distinct_documents() {
    let script = Script {
        snapshots: vec![
            page(&["alpha", "beta"]),
            page(&["alpha", "beta"]),
            page(&["beta", "gamma"]),
        ],
        ..Default::default()
    };
    let harvester = account_harvester(MockLauncher::new(script), fast_config());

    let documents = harvester.harvest_account("https://x.com/example", true).unwrap();
    let texts: Vec<_> = documents.iter().map(|d| d.as_str()).collect();
    assert_eq!(texts, vec!["alpha", "beta", "gamma"]);

    let counters = &harvester.launcher().counters;
    assert_eq!(Counters::get(&counters.scrolls), 5);
    assert_eq!(Counters::get(&counters.closes), 1);
}

#[test]
fn test_repeated_snapshot_harvested_once_for_any_scroll_count() {
    let harvester = PageHarvester::new(fast_config()).unwrap();

    for max_scrolls in [1, 2, 5, 12] {
        let counters = Counters::default();
        let mut session = MockSession {
            script: Script {
                snapshots: vec![page(&["alpha", "beta", "alpha"])],
                ..Default::default()
            },
            counters: counters.clone(),
            scrolled: 0,
        };

        let documents = harvester.harvest(&mut session, max_scrolls).unwrap();
        let texts: Vec<_> = documents.iter().map(|d| d.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "beta"], "max_scrolls = {max_scrolls}");
        assert_eq!(Counters::get(&counters.scrolls), max_scrolls as usize);
        assert_eq!(Counters::get(&counters.closes), 0);
    }
}

#[test]
fn test_zero_scrolls_harvest_nothing() {
    let harvester = PageHarvester::new(fast_config()).unwrap();
    let mut session = MockSession {
        script: Script {
            snapshots: vec![page(&["alpha"])],
            ..Default::default()
        },
        counters: Counters::default(),
        scrolled: 0,
    };
    assert!(harvester.harvest(&mut session, 0).unwrap().is_empty());
}

#[test]
fn test_whitespace_variants_are_distinct() {
    let script = Script {
        snapshots: vec![page(&["same text", "same  text", "same text"])],
        ..Default::default()
    };
    let harvester = account_harvester(MockLauncher::new(script), fast_config());

    let documents = harvester.harvest_account("https://x.com/example", true).unwrap();
    assert_eq!(documents.len(), 2);
}

#[test]
fn test_session_closed_once_on_navigation_failure() {
    let script = Script {
        navigation_error: Some(BrowserError::NavigationFailed {
            url: "https://x.com/example".to_string(),
            reason: "dns".to_string(),
        }),
        ..Default::default()
    };
    let harvester = account_harvester(MockLauncher::new(script), fast_config());

    let err = harvester
        .harvest_account("https://x.com/example", true)
        .unwrap_err();
    assert!(matches!(err, CoreError::Browser(BrowserError::NavigationFailed { .. })));

    let counters = &harvester.launcher().counters;
    assert_eq!(Counters::get(&counters.closes), 1);
    assert_eq!(Counters::get(&counters.scrolls), 0);
}

#[test]
fn test_navigation_retried_when_configured() {
    let script = Script {
        snapshots: vec![page(&["after retry"])],
        failing_navigations: 2,
        ..Default::default()
    };
    let config = HarvestConfig {
        navigation_attempts: 3,
        ..fast_config()
    };
    let harvester = account_harvester(MockLauncher::new(script), config);

    let documents = harvester.harvest_account("https://x.com/example", true).unwrap();
    assert_eq!(documents.len(), 1);

    let counters = &harvester.launcher().counters;
    assert_eq!(Counters::get(&counters.navigations), 3);
    assert_eq!(Counters::get(&counters.launches), 1);
    assert_eq!(Counters::get(&counters.closes), 1);
}

#[test]
fn test_missing_first_post_times_out() {
    let script = Script {
        element_missing: true,
        ..Default::default()
    };
    let harvester = account_harvester(MockLauncher::new(script), fast_config());

    let err = harvester
        .harvest_account("https://x.com/example", true)
        .unwrap_err();
    match err {
        CoreError::Browser(BrowserError::ElementTimeout { timeout_secs, .. }) => {
            assert_eq!(timeout_secs, 20)
        }
        other => panic!("expected element timeout, got {other:?}"),
    }
    assert_eq!(Counters::get(&harvester.launcher().counters.closes), 1);
}

#[test]
fn test_scroll_failure_mid_harvest_still_closes() {
    let script = Script {
        snapshots: vec![page(&["one"])],
        scroll_error_at: Some(2),
        ..Default::default()
    };
    let harvester = account_harvester(MockLauncher::new(script), fast_config());

    let err = harvester
        .harvest_account("https://x.com/example", true)
        .unwrap_err();
    assert!(matches!(err, CoreError::Browser(BrowserError::ScriptFailed { .. })));
    assert_eq!(Counters::get(&harvester.launcher().counters.closes), 1);
}

#[test]
fn test_invalid_url_never_launches() {
    let harvester = account_harvester(MockLauncher::new(Script::default()), fast_config());

    let err = harvester.harvest_account("not a url", true).unwrap_err();
    assert!(matches!(err, CoreError::InvalidUrl { .. }));

    let counters = &harvester.launcher().counters;
    assert_eq!(Counters::get(&counters.launches), 0);
    assert_eq!(Counters::get(&counters.closes), 0);
}

#[test]
fn test_launch_failure_reported() {
    let mut launcher = MockLauncher::new(Script::default());
    launcher.fail_launch = true;
    let harvester = account_harvester(launcher, fast_config());

    let err = harvester
        .harvest_account("https://x.com/example", true)
        .unwrap_err();
    assert!(crate::is_launch_failure(&err));
    assert_eq!(Counters::get(&harvester.launcher().counters.closes), 0);
}

#[test]
fn test_idle_limit_stops_early() {
    let script = Script {
        snapshots: vec![page(&["a"]), page(&["a", "b"])],
        ..Default::default()
    };
    let config = HarvestConfig {
        max_scrolls: 20,
        idle_scroll_limit: Some(3),
        ..fast_config()
    };
    let harvester = PageHarvester::new(config).unwrap();
    let launcher = MockLauncher::new(script);
    let mut session = launcher.launch(true).unwrap();

    let (documents, stats) = harvester.harvest_with_stats(&mut session, 20).unwrap();
    assert_eq!(documents.len(), 2);
    // scroll 2 adds "b", scrolls 3..=5 add nothing
    assert_eq!(stats.iterations, 5);
    assert!(stats.stopped_early);
    assert_eq!(Counters::get(&launcher.counters.scrolls), 5);
}

#[test]
fn test_without_idle_limit_runs_every_scroll() {
    let script = Script {
        snapshots: vec![page(&["a"])],
        ..Default::default()
    };
    let harvester = PageHarvester::new(fast_config()).unwrap();
    let launcher = MockLauncher::new(script);
    let mut session = launcher.launch(true).unwrap();

    let (documents, stats) = harvester.harvest_with_stats(&mut session, 7).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(stats.iterations, 7);
    assert_eq!(stats.duplicates_skipped, 6);
    assert!(!stats.stopped_early);
}

#[test]
fn test_posts_without_text_skipped() {
    let markup = format!(
        "{}<article><img src='a.png'></article>",
        page(&["text post"])
    );
    let script = Script {
        snapshots: vec![markup],
        ..Default::default()
    };
    let harvester = PageHarvester::new(fast_config()).unwrap();
    let launcher = MockLauncher::new(script);
    let mut session = launcher.launch(true).unwrap();

    let (documents, stats) = harvester.harvest_with_stats(&mut session, 1).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(stats.candidates_seen, 2);
    assert_eq!(stats.candidates_without_text, 1);
}

#[test]
fn test_guard_closes_on_drop_and_not_twice() {
    let launcher = MockLauncher::new(Script::default());

    {
        let _guard = SessionGuard::new(launcher.launch(true).unwrap());
    }
    assert_eq!(Counters::get(&launcher.counters.closes), 1);

    let guard = SessionGuard::new(launcher.launch(true).unwrap());
    guard.close().unwrap();
    assert_eq!(Counters::get(&launcher.counters.closes), 2);
}
