use crate::extract::PostExtractor;
use crate::session::BrowserSession;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use trendscope_core::{BrowserError, ConfigError, DocumentCollection, HarvestConfig};

/// Counters for one harvest run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestStats {
    pub iterations: u32,
    pub candidates_seen: usize,
    pub documents_added: usize,
    pub duplicates_skipped: usize,
    pub candidates_without_text: usize,
    pub stopped_early: bool,
    pub elapsed: Duration,
}

impl HarvestStats {
    fn record_iteration(
        &mut self,
        candidates: usize,
        without_text: usize,
        added: usize,
        duplicates: usize,
    ) {
        self.iterations += 1;
        self.candidates_seen += candidates;
        self.candidates_without_text += without_text;
        self.documents_added += added;
        self.duplicates_skipped += duplicates;
    }
}

/// Scrolls an already loaded page and collects every distinct post text it renders.
///
/// Each iteration scrolls by the configured delta, waits for the page to
/// settle, snapshots the markup and keeps texts not seen before. With an
/// `idle_scroll_limit`, the loop stops after that many consecutive iterations
/// that added nothing; otherwise it always runs the full scroll count.
#[derive(Debug, Clone)]
pub struct PageHarvester {
    config: HarvestConfig,
    extractor: PostExtractor,
}

impl PageHarvester {
    pub fn new(config: HarvestConfig) -> Result<Self, ConfigError> {
        let extractor = PostExtractor::from_config(&config)?;
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn harvest<S>(
        &self,
        session: &mut S,
        max_scrolls: u32,
    ) -> Result<DocumentCollection, BrowserError>
    where
        S: BrowserSession + ?Sized,
    {
        self.harvest_with_stats(session, max_scrolls)
            .map(|(documents, _)| documents)
    }

    pub fn harvest_with_stats<S>(
        &self,
        session: &mut S,
        max_scrolls: u32,
    ) -> Result<(DocumentCollection, HarvestStats), BrowserError>
    where
        S: BrowserSession + ?Sized,
    {
        let started = Instant::now();
        let mut documents = DocumentCollection::new();
        let mut stats = HarvestStats::default();
        let mut idle_iterations = 0u32;

        for iteration in 0..max_scrolls {
            session.scroll_by(self.config.scroll_delta)?;
            if !self.config.settle_duration.is_zero() {
                thread::sleep(self.config.settle_duration);
            }

            let markup = session.page_source()?;
            let scan = self.extractor.extract(&markup);

            let mut added = 0;
            let mut duplicates = 0;
            for text in scan.texts {
                if documents.insert(text) {
                    added += 1;
                } else {
                    duplicates += 1;
                }
            }
            stats.record_iteration(scan.candidates, scan.without_text, added, duplicates);

            debug!(
                "Scroll {}/{}: {} posts in view, {} new, {} total",
                iteration + 1,
                max_scrolls,
                scan.candidates,
                added,
                documents.len()
            );

            if let Some(limit) = self.config.idle_scroll_limit {
                idle_iterations = if added == 0 { idle_iterations + 1 } else { 0 };
                if idle_iterations >= limit {
                    info!(
                        "No new posts for {} scrolls, stopping after {} of {}",
                        idle_iterations,
                        iteration + 1,
                        max_scrolls
                    );
                    stats.stopped_early = iteration + 1 < max_scrolls;
                    break;
                }
            }
        }

        stats.elapsed = started.elapsed();
        Ok((documents, stats))
    }
}
