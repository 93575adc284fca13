use crate::error::*;
use std::time::Duration;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Browser(e) => {
                error!("Browser error details: {:?}", e);
            }
            CoreError::Artifact(e) => {
                error!("Artifact error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Browser(e) => e.is_retryable(),
            CoreError::Artifact(e) => e.is_retryable(),
            CoreError::Io(_) => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Browser(e) => e.retry_after(),
            _ if self.is_retryable() => Some(Duration::from_secs(1)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Browser(e) => e.user_friendly_message(),
            CoreError::Artifact(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::InvalidUrl { url, .. } => {
                format!("'{}' is not a valid account URL. Check the category file.", url)
            }
            CoreError::InvalidInput { .. } => {
                "Invalid input provided. Please check your input and try again.".to_string()
            }
            CoreError::Cancelled { operation } => format!("{} was cancelled.", operation),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Browser(_) => "BROWSER".to_string(),
            CoreError::Artifact(_) => "ARTIFACT".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::InvalidUrl { .. } => "INVALID_URL".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Cancelled { .. } => "CANCELLED".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for BrowserError {
    fn log_error(&self) -> &Self {
        error!("BrowserError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("BrowserError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrowserError::NavigationFailed { .. }
                | BrowserError::ScriptFailed { .. }
                | BrowserError::SnapshotFailed { .. }
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            BrowserError::NavigationFailed { .. } => Some(Duration::from_secs(2)),
            _ if self.is_retryable() => Some(Duration::from_secs(1)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            BrowserError::LaunchFailed { .. } => {
                "Could not start the browser. Is Chrome or Chromium installed?".to_string()
            }
            BrowserError::NavigationFailed { url, .. } => {
                format!("Could not open {}. Please check your connection.", url)
            }
            BrowserError::ElementTimeout { timeout_secs, .. } => format!(
                "No posts appeared within {} seconds. The account may be private or empty.",
                timeout_secs
            ),
            BrowserError::SessionClosed => "The browser session was already closed.".to_string(),
            _ => "The browser reported an error. Please try again.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            BrowserError::LaunchFailed { .. } => "BROWSER_LAUNCH_FAILED".to_string(),
            BrowserError::NavigationFailed { .. } => "BROWSER_NAVIGATION_FAILED".to_string(),
            BrowserError::ElementTimeout { .. } => "BROWSER_SESSION_TIMEOUT".to_string(),
            BrowserError::ScriptFailed { .. } => "BROWSER_SCRIPT_FAILED".to_string(),
            BrowserError::SnapshotFailed { .. } => "BROWSER_SNAPSHOT_FAILED".to_string(),
            BrowserError::CloseFailed { .. } => "BROWSER_CLOSE_FAILED".to_string(),
            BrowserError::SessionClosed => "BROWSER_SESSION_CLOSED".to_string(),
        }
    }
}

impl ErrorExt for ArtifactError {
    fn log_error(&self) -> &Self {
        error!("ArtifactError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ArtifactError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ArtifactError::Missing { path, stage } => {
                let hint = match stage {
                    Stage::Scrape => "",
                    Stage::Extract => " Run the scrape step first.",
                    Stage::Visualize => " Run the scrape and extract steps first.",
                };
                format!("File {} was not found.{}", path.display(), hint)
            }
            ArtifactError::Structure { path, .. } => format!(
                "File {} does not contain the expected data layout.",
                path.display()
            ),
            ArtifactError::Json { path, .. } => {
                format!("File {} is not valid JSON.", path.display())
            }
            ArtifactError::Io { path, .. } => {
                format!("Could not read or write {}.", path.display())
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ArtifactError::Missing { .. } => "ARTIFACT_MISSING".to_string(),
            ArtifactError::Structure { .. } => "ARTIFACT_STRUCTURE".to_string(),
            ArtifactError::Json { .. } => "ARTIFACT_JSON".to_string(),
            ArtifactError::Io { .. } => "ARTIFACT_IO".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file {} not found.", path)
            }
            ConfigError::InvalidFormat { .. } | ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is not usable: {}", reason)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidFormat { .. } => "CONFIG_INVALID_FORMAT".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs failures that the pipeline reports and then carries on from.
#[derive(Debug, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    /// Error-level log plus the code, the user-facing message and, for
    /// transient failures, the suggested wait.
    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
        if error.is_retryable() {
            if let Some(retry_after) = error.retry_after() {
                info!("Error is retryable. Retry after: {:?}", retry_after);
            }
        }
    }

    /// Warn-level log for a failure the caller recovers from by skipping `subject`.
    pub fn report_skipped(&self, subject: &str, error: &CoreError) {
        error.log_warn();
        warn!(
            "Skipping {}: {} ({})",
            subject,
            error.user_friendly_message(),
            error.error_code()
        );
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
