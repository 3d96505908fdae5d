//! Match lookup boundary.
//!
//! Screens only talk to [`MatchRepository`]. The static implementation answers
//! from the in-memory [`MatchStore`] after a simulated latency; a networked
//! client implements the same trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::state::MatchStore;
use crate::types::{MatchDetail, MatchSummary};

#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// All matches in display order.
    async fn list_matches(&self) -> Result<Vec<MatchSummary>>;

    /// `Ok(None)` when the id does not exist. `Err` is reserved for fetch failures.
    async fn match_detail(&self, match_id: &str) -> Result<Option<MatchDetail>>;
}

pub struct StaticMatchRepository {
    store: Arc<MatchStore>,
    latency: Duration,
}

impl StaticMatchRepository {
    pub fn new(store: Arc<MatchStore>, latency: Duration) -> Self {
        Self { store, latency }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl MatchRepository for StaticMatchRepository {
    async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
        self.simulate_latency().await;
        let matches = self.store.summaries();
        debug!(count = matches.len(), "Listed matches");
        Ok(matches)
    }

    async fn match_detail(&self, match_id: &str) -> Result<Option<MatchDetail>> {
        self.simulate_latency().await;
        let detail = self.store.detail(match_id);
        debug!(match_id, found = detail.is_some(), "Detail lookup");
        Ok(detail)
    }
}
