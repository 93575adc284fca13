use scraper::{Html, Selector};
use trendscope_core::{ConfigError, HarvestConfig};

/// Result of scanning one markup snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostScan {
    /// Text of every post that carried a text node, in document order.
    pub texts: Vec<String>,
    /// Number of post containers found.
    pub candidates: usize,
    /// Containers with no text node.
    pub without_text: usize,
}

/// Pulls post text out of a rendered page snapshot.
#[derive(Debug, Clone)]
pub struct PostExtractor {
    post: Selector,
    text: Selector,
}

impl PostExtractor {
    pub fn new(post_selector: &str, text_selector: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            post: parse_selector("harvest.post_selector", post_selector)?,
            text: parse_selector("harvest.text_selector", text_selector)?,
        })
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self, ConfigError> {
        Self::new(&config.post_selector, &config.text_selector)
    }

    /// For each post container, the concatenated text of its first descendant
    /// matching the text selector. Containers without one are counted and skipped.
    pub fn extract(&self, markup: &str) -> PostScan {
        let document = Html::parse_document(markup);
        let mut scan = PostScan::default();

        for post in document.select(&self.post) {
            scan.candidates += 1;
            match post.select(&self.text).next() {
                Some(node) => scan.texts.push(node.text().collect()),
                None => scan.without_text += 1,
            }
        }

        scan
    }
}

fn parse_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: format!("{selector} ({e})"),
    })
}
