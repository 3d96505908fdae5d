use std::time::Duration;

use crate::error::{AppError, Result};
use crate::theme::Theme;

/// Simulated fetch latency of the static repository, in milliseconds.
pub const SIMULATED_LATENCY_MS: u64 = 300;

/// Channel capacity for detail lookup completions.
pub const CHANNEL_CAPACITY: usize = 64;

/// How long the UI loop waits for a key before redrawing.
pub const UI_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Width in cells of a stat comparison bar on the detail screen.
pub const STAT_BAR_WIDTH: u16 = 40;

/// Conventional range of a fun rating. Values outside are logged, not clamped.
pub const FUN_RATING_RANGE: (f64, f64) = (0.0, 10.0);

/// Possession pairs further than this from 100 in total are logged at load.
pub const POSSESSION_SUM_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_path: String,
    /// Alternate dataset file (MATCH_DATA_PATH). The embedded seed is used when unset.
    pub match_data_path: Option<String>,
    /// Latency the static repository sleeps before answering (SIMULATED_LATENCY_MS)
    pub simulated_latency: Duration,
    pub theme: Theme,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_path: std::env::var("LOG_PATH").unwrap_or_else(|_| "matchday.log".to_string()),
            match_data_path: std::env::var("MATCH_DATA_PATH")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            simulated_latency: Duration::from_millis(
                std::env::var("SIMULATED_LATENCY_MS")
                    .unwrap_or_else(|_| SIMULATED_LATENCY_MS.to_string())
                    .parse::<u64>()
                    .map_err(|_| {
                        AppError::Config(
                            "SIMULATED_LATENCY_MS must be a whole number of milliseconds"
                                .to_string(),
                        )
                    })?,
            ),
            theme: std::env::var("THEME")
                .unwrap_or_else(|_| "dark".to_string())
                .parse::<Theme>()?,
        })
    }
}
