use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::dataset::Dataset;
use crate::types::{MatchDetail, MatchSummary};

// ---------------------------------------------------------------------------
// MatchStore
// ---------------------------------------------------------------------------

/// In-memory match table. Loaded once at startup and read by the repository.
pub struct MatchStore {
    /// match_id → list-view record
    summaries: DashMap<String, MatchSummary>,
    /// match_id → detail-view record
    details: DashMap<String, MatchDetail>,
    /// Insertion order of summary ids; listing follows it.
    order: RwLock<Vec<String>>,
}

impl MatchStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn from_dataset(dataset: Dataset) -> Arc<Self> {
        let store = Self::new();
        for summary in dataset.summaries {
            store.add_summary(summary);
        }
        for detail in dataset.details {
            store.add_detail(detail);
        }
        store
    }

    /// Insert or replace a summary. A replaced summary keeps its list position.
    pub fn add_summary(&self, summary: MatchSummary) {
        let id = summary.id.clone();
        if self.summaries.insert(id.clone(), summary).is_none() {
            self.order
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(id);
        }
    }

    pub fn add_detail(&self, detail: MatchDetail) {
        self.details.insert(detail.id().to_string(), detail);
    }

    /// Summaries in insertion order.
    pub fn summaries(&self) -> Vec<MatchSummary> {
        let order = self.order.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        order
            .iter()
            .filter_map(|id| self.summaries.get(id).map(|s| s.clone()))
            .collect()
    }

    pub fn detail(&self, match_id: &str) -> Option<MatchDetail> {
        self.details.get(match_id).map(|d| d.clone())
    }

    pub fn match_count(&self) -> usize {
        self.summaries.len()
    }

    pub fn detail_count(&self) -> usize {
        self.details.len()
    }

    /// Listed ids with no detail record, in list order.
    pub fn ids_missing_detail(&self) -> Vec<String> {
        let order = self.order.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        order
            .iter()
            .filter(|id| !self.details.contains_key(id.as_str()))
            .cloned()
            .collect()
    }
}

impl Default for MatchStore {
    fn default() -> Self {
        Self {
            summaries: DashMap::new(),
            details: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
