mod config;
mod dataset;
mod error;
mod present;
mod repository;
mod screen;
mod state;
mod theme;
mod types;
mod ui;

use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::repository::{MatchRepository, StaticMatchRepository};
use crate::state::MatchStore;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cfg) {
        eprintln!("Cannot open log file {}: {e}", cfg.log_path);
        std::process::exit(1);
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("Fatal error: {e}");
        std::process::exit(1);
    }
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(cfg: &Config) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(cfg: Config) -> Result<()> {
    let (dataset, stats) = Dataset::load(&cfg)?;
    info!(
        summaries = stats.summaries,
        details = stats.details,
        "Match data loaded: {} summaries, {} details ({} fun ratings out of range, {} possession pairs off 100)",
        stats.summaries,
        stats.details,
        stats.fun_rating_out_of_range,
        stats.possession_off_100,
    );

    let store = MatchStore::from_dataset(dataset);
    let missing = store.ids_missing_detail();
    if !missing.is_empty() {
        warn!("Listed matches without a detail record will show as not found: {missing:?}");
    }
    info!(
        matches = store.match_count(),
        details = store.detail_count(),
        latency_ms = cfg.simulated_latency.as_millis() as u64,
        theme = %cfg.theme,
        "Starting match viewer"
    );

    let repo: Arc<dyn MatchRepository> =
        Arc::new(StaticMatchRepository::new(store, cfg.simulated_latency));
    ui::run(repo, cfg.theme).await?;

    info!("Match viewer closed");
    Ok(())
}
