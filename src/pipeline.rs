use artifact_store::ArtifactStore;
use keyword_engine::KeywordReducer;
use page_harvester::{is_launch_failure, AccountHarvester, PageHarvester, SessionLauncher};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use trendscope_core::{AppConfig, Category, CoreError, ErrorReporter, KeywordRanking, RawDocument};
use visualizer::{render_bar_chart, render_word_cloud_svg, WordCloudOptions};

const BAR_CHART_WIDTH: usize = 40;

/// Summary of one scrape stage.
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    pub documents: Vec<RawDocument>,
    pub accounts_ok: usize,
    pub accounts_failed: usize,
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct VisualizeReport {
    pub chart: String,
    pub word_cloud: PathBuf,
}

/// The three stages, each reading what the previous one wrote to disk.
pub struct Pipeline {
    config: AppConfig,
    store: ArtifactStore,
    reporter: ErrorReporter,
    cancelled: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(config: AppConfig, cancelled: Arc<AtomicBool>) -> Self {
        let store = ArtifactStore::new(config.paths.clone());
        Self {
            config,
            store,
            reporter: ErrorReporter::new(),
            cancelled,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Category list from disk; a missing or malformed file is reported and
    /// treated as no categories.
    pub fn load_categories(&self) -> Vec<Category> {
        match self.store.load_categories() {
            Ok(categories) => categories,
            Err(e) => {
                self.reporter.report_error(&CoreError::from(e));
                Vec::new()
            }
        }
    }

    /// Harvests every account of `category` one after another.
    ///
    /// A failing account is reported and contributes nothing. Documents from
    /// all accounts are concatenated in account order and saved. Cancellation
    /// is honoured between accounts: what was collected so far is saved and
    /// `Cancelled` is returned. A cancelled run that collected nothing leaves
    /// any earlier posts file untouched.
    pub async fn scrape<L>(
        &self,
        category: &Category,
        launcher: L,
    ) -> Result<ScrapeReport, CoreError>
    where
        L: SessionLauncher + Send + 'static,
    {
        if category.accounts.is_empty() {
            return Err(CoreError::InvalidInput {
                message: format!("no account URLs listed for category {:?}", category.name),
            });
        }

        info!(
            "Scraping {} accounts for category {}",
            category.accounts.len(),
            category.name
        );

        let headless = self.config.harvest.headless;
        let page_harvester = PageHarvester::new(self.config.harvest.clone())?;
        let mut harvester = AccountHarvester::new(launcher, page_harvester);
        let mut report = ScrapeReport::default();
        let mut interrupted = false;

        for url in &category.accounts {
            if self.cancelled.load(Ordering::SeqCst) {
                warn!("Interrupted, skipping remaining accounts");
                interrupted = true;
                break;
            }

            info!("Scraping {}", url);
            let account_url = url.clone();
            let (returned, result) = tokio::task::spawn_blocking(move || {
                let result = harvester.harvest_account(&account_url, headless);
                (harvester, result)
            })
            .await
            .map_err(|e| CoreError::Internal {
                message: format!("harvest task for {url} failed: {e}"),
            })?;
            harvester = returned;

            match result {
                Ok(documents) => {
                    info!("Collected {} posts from {}", documents.len(), url);
                    report.accounts_ok += 1;
                    report.documents.extend(documents.into_documents());
                }
                Err(e) => {
                    report.accounts_failed += 1;
                    self.reporter.report_skipped(url, &e);
                    if is_launch_failure(&e) {
                        warn!("Is Chrome or Chromium installed and on PATH?");
                    }
                }
            }
        }

        info!(
            "Collected {} posts ({} accounts ok, {} failed)",
            report.documents.len(),
            report.accounts_ok,
            report.accounts_failed
        );

        if interrupted && report.documents.is_empty() {
            warn!(
                "Nothing collected before the interrupt, keeping {}",
                self.config.paths.raw_documents_file(&category.name).display()
            );
        } else {
            report.path = Some(self.store.save_documents(&category.name, &report.documents)?);
        }

        if interrupted {
            return Err(CoreError::Cancelled {
                operation: format!("scrape of category {}", category.name),
            });
        }
        Ok(report)
    }

    pub fn extract(&self, category: &str) -> Result<KeywordRanking, CoreError> {
        let top_n = NonZeroUsize::new(self.config.keywords.top_n).ok_or_else(|| {
            CoreError::InvalidInput {
                message: "top_n must be at least 1".to_string(),
            }
        })?;

        let documents = self.store.load_documents(category)?;
        info!("Extracting keywords from {} posts", documents.len());

        let reducer = KeywordReducer::from_config(&self.config.keywords);
        let ranking = reducer.reduce(&documents, top_n);
        self.store.save_ranking(category, &ranking)?;
        Ok(ranking)
    }

    pub fn visualize(&self, category: &str) -> Result<VisualizeReport, CoreError> {
        let ranking = self.store.load_ranking(category)?;
        info!("Rendering {} keywords", ranking.len());

        let chart = render_bar_chart(&ranking, BAR_CHART_WIDTH);
        let svg = render_word_cloud_svg(&ranking, &WordCloudOptions::default());
        let word_cloud = self.store.save_word_cloud(category, &svg)?;

        Ok(VisualizeReport { chart, word_cloud })
    }
}
