use page_harvester::{AccountHarvester, ChromeLauncher, PageHarvester};
use std::env;
use trendscope_core::HarvestConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let Some(url) = env::args().nth(1) else {
        eprintln!("usage: manual_harvest <account-url> [scrolls] [--headed]");
        return Ok(());
    };
    let scrolls = env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    let headless = !env::args().any(|a| a == "--headed");

    let config = HarvestConfig {
        max_scrolls: scrolls,
        ..Default::default()
    };
    let harvester = AccountHarvester::new(ChromeLauncher::new(), PageHarvester::new(config)?);

    println!("Harvesting {url} ({scrolls} scrolls, headless: {headless})");
    let documents = harvester.harvest_account(&url, headless)?;

    println!("{} distinct posts", documents.len());
    for (i, document) in documents.iter().enumerate() {
        println!("{:>3}. {}", i + 1, document.as_str().replace('\n', " "));
    }
    Ok(())
}
