//! Runtime configuration.
//!
//! Every tunable of the pipeline lives here so that scroll timing, selectors and
//! keyword filtering can be changed from `trendscope.toml` without touching code.
//! All fields are optional in the file; missing ones fall back to [`Default`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "trendscope.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub harvest: HarvestConfig,
    pub keywords: KeywordConfig,
    pub paths: PathsConfig,
}

/// Scroll-and-snapshot behaviour of the page harvester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Pixels scrolled per iteration
    pub scroll_delta: i64,
    /// Blocking pause after each scroll so lazily loaded posts can render
    #[serde(rename = "settle_duration_ms", with = "duration_ms")]
    pub settle_duration: Duration,
    /// Number of scroll iterations per account
    pub max_scrolls: u32,
    /// How long to wait for the first post before giving up on an account
    #[serde(rename = "element_wait_timeout_ms", with = "duration_ms")]
    pub element_wait_timeout: Duration,
    /// Element whose presence marks the page as ready for scrolling
    pub ready_selector: String,
    /// Container of a single post
    pub post_selector: String,
    /// Text-bearing element inside a post container
    pub text_selector: String,
    pub headless: bool,
    /// Stop after this many consecutive scrolls that found nothing new.
    /// `None` always runs the full `max_scrolls`.
    pub idle_scroll_limit: Option<u32>,
    /// Total navigation attempts per account (1 = no retry)
    pub navigation_attempts: u32,
    #[serde(rename = "navigation_backoff_ms", with = "duration_ms")]
    pub navigation_backoff: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            scroll_delta: 300,
            settle_duration: Duration::from_secs(1),
            max_scrolls: 20,
            element_wait_timeout: Duration::from_secs(20),
            ready_selector: r#"div[data-testid="tweetText"]"#.to_string(),
            post_selector: "article".to_string(),
            text_selector: r#"div[data-testid="tweetText"], span[data-testid="tweetText"]"#
                .to_string(),
            headless: true,
            idle_scroll_limit: None,
            navigation_attempts: 1,
            navigation_backoff: Duration::from_secs(2),
        }
    }
}

/// Keyword extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub top_n: usize,
    /// Replaces the bundled English stopword list when set
    pub stopwords: Option<Vec<String>>,
    /// Added on top of whichever stopword list is active
    pub extra_stopwords: Vec<String>,
    /// Replaces the bundled punctuation set when set
    pub punctuation: Option<Vec<String>>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            stopwords: None,
            extra_stopwords: Vec::new(),
            punctuation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub categories_file: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            categories_file: PathBuf::from("categories/categories.json"),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl PathsConfig {
    pub fn raw_documents_file(&self, category: &str) -> PathBuf {
        self.data_dir.join(format!("{}_tweets.json", category))
    }

    pub fn keywords_file(&self, category: &str) -> PathBuf {
        self.data_dir.join(format!("{}_keywords.json", category))
    }

    pub fn word_cloud_file(&self, category: &str) -> PathBuf {
        self.data_dir.join(format!("{}_wordcloud.svg", category))
    }
}

impl AppConfig {
    /// Loads `path` if given, otherwise `trendscope.toml` when it exists,
    /// otherwise the defaults. The result is validated before returning.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => ConfigError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => ConfigError::InvalidFormat {
                details: format!("{}: {}", path.display(), e),
            },
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let harvest = &self.harvest;
        if harvest.scroll_delta == 0 {
            return Err(ConfigError::InvalidValue {
                field: "harvest.scroll_delta".to_string(),
                value: "0".to_string(),
            });
        }
        if harvest.navigation_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "harvest.navigation_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        if harvest.idle_scroll_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "harvest.idle_scroll_limit".to_string(),
                value: "0".to_string(),
            });
        }
        for (field, value) in [
            ("harvest.ready_selector", &harvest.ready_selector),
            ("harvest.post_selector", &harvest.post_selector),
            ("harvest.text_selector", &harvest.text_selector),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        if self.keywords.top_n == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "keywords.top_n must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
