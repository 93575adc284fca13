use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use trendscope_core::{BrowserError, ErrorExt, HarvestConfig};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Page navigation retries, driven by the harvest settings.
    pub fn navigation(config: &HarvestConfig) -> Self {
        let base_delay_ms = config.navigation_backoff.as_millis() as u64;
        Self {
            max_attempts: config.navigation_attempts.max(1),
            base_delay_ms,
            max_delay_ms: base_delay_ms.saturating_mul(8).max(1),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

/// Retry strategy based on error type
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    Retry,
    NoRetry,
}

pub fn get_retry_strategy(error: &BrowserError) -> RetryStrategy {
    if error.is_retryable() {
        RetryStrategy::Retry
    } else {
        RetryStrategy::NoRetry
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let base_delay = Duration::from_millis(config.base_delay_ms);
    let max_delay = Duration::from_millis(config.max_delay_ms);

    let exponential_delay = if attempt == 0 {
        base_delay
    } else {
        let multiplier = config.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (config.base_delay_ms as f64 * multiplier) as u64;
        Duration::from_millis(delay_ms.min(config.max_delay_ms))
    };

    let jitter_range = (exponential_delay.as_millis() as f64 * config.jitter_factor) as u64;
    let jitter = fastrand::u64(0..=jitter_range);
    let final_delay = exponential_delay + Duration::from_millis(jitter);

    final_delay.min(max_delay)
}

/// Runs a blocking browser operation, retrying transient failures.
///
/// The last error is returned unchanged so callers can still match on it.
#[derive(Debug)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn execute<F, T>(&self, operation_name: &str, mut operation: F) -> Result<T, BrowserError>
    where
        F: FnMut() -> Result<T, BrowserError>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut total_delay = Duration::ZERO;
        let mut attempt = 0;

        loop {
            let start_time = Instant::now();
            match operation() {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            "Operation {} succeeded after {} retries (total delay: {:?})",
                            operation_name, attempt, total_delay
                        );
                    }
                    return Ok(result);
                }
                Err(error) => {
                    debug!(
                        "Attempt {} failed for {} after {:?}: {}",
                        attempt + 1,
                        operation_name,
                        start_time.elapsed(),
                        error
                    );

                    let has_attempts_left = attempt + 1 < max_attempts;
                    if get_retry_strategy(&error) == RetryStrategy::NoRetry || !has_attempts_left {
                        if attempt > 0 {
                            error!(
                                "Operation {} failed after {} attempts: {}",
                                operation_name,
                                attempt + 1,
                                error
                            );
                        }
                        return Err(error);
                    }

                    let delay = calculate_delay(attempt, &self.config);
                    total_delay += delay;
                    info!("Retrying {} in {:?} due to: {}", operation_name, delay, error);
                    sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
