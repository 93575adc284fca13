mod menu;
mod pipeline;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use page_harvester::ChromeLauncher;
use pipeline::Pipeline;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use trendscope_core::{AppConfig, Category, CoreError, ErrorExt, Stage};

const DEFAULT_LOG_FILTER: &str =
    "trendscope=info,page_harvester=info,artifact_store=info,keyword_engine=info";

const SCRAPE_PROMPT: &str = "Select a category by number: ";
const EXTRACT_PROMPT: &str = "Select a category by number for keyword extraction: ";
const VISUALIZE_PROMPT: &str = "Select a category by number for visualization: ";

#[derive(Parser)]
#[command(name = "trendscope", version, about = "Trending keywords from social account feeds")]
struct Cli {
    /// TOML configuration file (default: ./trendscope.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Harvest posts from every account in a category
    Scrape {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        browser: BrowserArgs,
    },
    /// Rank keywords in the harvested posts
    Extract {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        ranking: RankingArgs,
    },
    /// Print a bar chart and write a word cloud for the ranked keywords
    Visualize {
        #[command(flatten)]
        target: Target,
    },
    /// Scrape, extract and visualize in one go
    Run {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        browser: BrowserArgs,
        #[command(flatten)]
        ranking: RankingArgs,
    },
}

#[derive(Args)]
struct Target {
    /// Category name (default: pick from a menu)
    #[arg(short = 'C', long)]
    category: Option<String>,
}

#[derive(Args)]
struct BrowserArgs {
    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

#[derive(Args)]
struct RankingArgs {
    /// Number of keywords to keep
    #[arg(short = 'n', long)]
    top_n: Option<usize>,
}

fn apply_overrides(
    config: &mut AppConfig,
    browser: Option<&BrowserArgs>,
    ranking: Option<&RankingArgs>,
) {
    if browser.is_some_and(|b| b.headed) {
        config.harvest.headless = false;
    }
    if let Some(top_n) = ranking.and_then(|r| r.top_n) {
        config.keywords.top_n = top_n;
    }
}

/// Resolves the category from `--category` or the interactive menu.
fn choose_category(
    pipeline: &Pipeline,
    target: &Target,
    prompt: &str,
) -> anyhow::Result<Option<Category>> {
    let categories = pipeline.load_categories();

    if let Some(name) = &target.category {
        return match menu::find_category(&categories, name) {
            Some(category) => Ok(Some(category.clone())),
            None => bail!(
                "category {:?} not found in {}",
                name,
                pipeline.config().paths.categories_file.display()
            ),
        };
    }

    let stdin = io::stdin();
    let chosen =
        menu::select_category(&categories, prompt, &mut stdin.lock(), &mut io::stdout())
            .context("reading category choice")?;
    Ok(chosen.cloned())
}

/// Extract and visualize only need a name; they also accept one that is no
/// longer listed in the category file.
fn choose_category_name(
    pipeline: &Pipeline,
    target: &Target,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    if let Some(name) = &target.category {
        return Ok(Some(name.clone()));
    }
    Ok(choose_category(pipeline, target, prompt)?.map(|c| c.name))
}

async fn scrape(
    pipeline: &Pipeline,
    interrupts: &Interrupts,
    category: &Category,
) -> Result<(), CoreError> {
    println!("Scraping posts for category: {}", category.name);
    interrupts.begin_scrape();
    let result = pipeline.scrape(category, ChromeLauncher::new()).await;
    interrupts.end_scrape();
    let report = result?;
    println!(
        "Collected {} posts from {} of {} accounts.",
        report.documents.len(),
        report.accounts_ok,
        category.accounts.len()
    );
    if let Some(path) = report.path {
        println!("Posts saved to '{}'.", path.display());
    }
    Ok(())
}

fn extract(pipeline: &Pipeline, category: &str) -> Result<(), CoreError> {
    let ranking = pipeline.extract(category)?;
    println!(
        "Extracted {} keywords, saved to '{}'.",
        ranking.len(),
        pipeline.config().paths.keywords_file(category).display()
    );
    Ok(())
}

fn visualize(pipeline: &Pipeline, category: &str) -> Result<(), CoreError> {
    let report = pipeline.visualize(category)?;
    println!("Top keywords for {category}:\n");
    print!("{}", report.chart);
    println!("\nWord cloud saved to '{}'.", report.word_cloud.display());
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum InterruptAction {
    FinishAccount,
    Exit,
}

/// First Ctrl-C while scraping sets `cancelled`; any other one exits.
fn interrupt_action(scraping: &AtomicBool, cancelled: &AtomicBool) -> InterruptAction {
    if scraping.load(Ordering::SeqCst) && !cancelled.swap(true, Ordering::SeqCst) {
        InterruptAction::FinishAccount
    } else {
        InterruptAction::Exit
    }
}

/// Ctrl-C handling. The listener is installed when the first scrape starts,
/// so the category menu keeps the default behaviour.
#[derive(Default)]
struct Interrupts {
    cancelled: Arc<AtomicBool>,
    scraping: Arc<AtomicBool>,
    listening: AtomicBool,
}

impl Interrupts {
    fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    fn begin_scrape(&self) {
        self.scraping.store(true, Ordering::SeqCst);
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let scraping = self.scraping.clone();
        let cancelled = self.cancelled.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                match interrupt_action(&scraping, &cancelled) {
                    InterruptAction::FinishAccount => warn!(
                        "Interrupt received, finishing the current account before stopping \
                         (press Ctrl-C again to quit now)"
                    ),
                    InterruptAction::Exit => {
                        warn!("Interrupted");
                        std::process::exit(130);
                    }
                }
            }
        });
    }

    fn end_scrape(&self) {
        self.scraping.store(false, Ordering::SeqCst);
    }
}

fn stage_failed(stage: Stage) -> impl FnOnce(CoreError) -> anyhow::Error {
    move |error| {
        error.log_error();
        anyhow::anyhow!(
            "{} stage failed: {} ({})",
            stage,
            error.user_friendly_message(),
            error.error_code()
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(io::stderr)
        .init();

    let started = Instant::now();
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match &cli.command {
        Commands::Scrape { browser, .. } => apply_overrides(&mut config, Some(browser), None),
        Commands::Extract { ranking, .. } => apply_overrides(&mut config, None, Some(ranking)),
        Commands::Visualize { .. } => {}
        Commands::Run { browser, ranking, .. } => {
            apply_overrides(&mut config, Some(browser), Some(ranking))
        }
    }
    config.validate().context("invalid command-line override")?;

    let interrupts = Interrupts::default();
    let pipeline = Pipeline::new(config, interrupts.cancel_flag());

    match &cli.command {
        Commands::Scrape { target, .. } => {
            let Some(category) = choose_category(&pipeline, target, SCRAPE_PROMPT)? else {
                return Ok(());
            };
            scrape(&pipeline, &interrupts, &category)
                .await
                .map_err(stage_failed(Stage::Scrape))?;
        }
        Commands::Extract { target, .. } => {
            let Some(name) = choose_category_name(&pipeline, target, EXTRACT_PROMPT)? else {
                return Ok(());
            };
            extract(&pipeline, &name).map_err(stage_failed(Stage::Extract))?;
        }
        Commands::Visualize { target } => {
            let Some(name) = choose_category_name(&pipeline, target, VISUALIZE_PROMPT)? else {
                return Ok(());
            };
            visualize(&pipeline, &name).map_err(stage_failed(Stage::Visualize))?;
        }
        Commands::Run { target, .. } => {
            let Some(category) = choose_category(&pipeline, target, SCRAPE_PROMPT)? else {
                return Ok(());
            };
            scrape(&pipeline, &interrupts, &category)
                .await
                .map_err(stage_failed(Stage::Scrape))?;
            extract(&pipeline, &category.name).map_err(stage_failed(Stage::Extract))?;
            visualize(&pipeline, &category.name).map_err(stage_failed(Stage::Visualize))?;
        }
    }

    info!("Finished in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}
