use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum BrowserError {
    #[error("Failed to launch browser: {reason}")]
    LaunchFailed { reason: String },

    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("Element '{selector}' did not appear within {timeout_secs} seconds")]
    ElementTimeout { selector: String, timeout_secs: u64 },

    #[error("Scroll script failed: {reason}")]
    ScriptFailed { reason: String },

    #[error("Could not read page markup: {reason}")]
    SnapshotFailed { reason: String },

    #[error("Failed to close browser session: {reason}")]
    CloseFailed { reason: String },

    #[error("Browser session already closed")]
    SessionClosed,
}

/// Pipeline stage an artifact belongs to, carried by every artifact error so
/// failures can be traced back to the step that produced or consumed the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scrape,
    Extract,
    Visualize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Scrape => "scrape",
            Stage::Extract => "extract",
            Stage::Visualize => "visualize",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("[{stage}] artifact not found: {}", path.display())]
    Missing { path: PathBuf, stage: Stage },

    #[error("[{stage}] invalid structure in {}: {details}", path.display())]
    Structure {
        path: PathBuf,
        stage: Stage,
        details: String,
    },

    #[error("[{stage}] malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("[{stage}] IO failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    pub fn stage(&self) -> Stage {
        match self {
            ArtifactError::Missing { stage, .. }
            | ArtifactError::Structure { stage, .. }
            | ArtifactError::Json { stage, .. }
            | ArtifactError::Io { stage, .. } => *stage,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            ArtifactError::Missing { path, .. }
            | ArtifactError::Structure { path, .. }
            | ArtifactError::Json { path, .. }
            | ArtifactError::Io { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {details}")]
    InvalidFormat { details: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Permission denied accessing config: {path}")]
    PermissionDenied { path: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
