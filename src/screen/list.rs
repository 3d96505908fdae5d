use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dataset::validate_summaries;
use crate::error::{AppError, Result};
use crate::repository::MatchRepository;
use crate::types::MatchSummary;

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    /// May be empty; the view shows a "no matches today" message.
    Ready(Vec<MatchSummary>),
    Failed(String),
}

struct PendingList {
    handle: JoinHandle<()>,
    rx: oneshot::Receiver<Result<Vec<MatchSummary>>>,
}

pub struct ListScreen {
    repo: Arc<dyn MatchRepository>,
    state: ListState,
    pending: Option<PendingList>,
}

impl ListScreen {
    pub fn new(repo: Arc<dyn MatchRepository>) -> Self {
        Self { repo, state: ListState::Loading, pending: None }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Matches currently listed; empty unless the list is ready.
    pub fn matches(&self) -> &[MatchSummary] {
        match &self.state {
            ListState::Ready(matches) => matches,
            _ => &[],
        }
    }

    /// Enter `Loading` and fetch in the background; `drain` applies the
    /// result. A fetch already pending is aborted.
    /// Must be called from within a tokio runtime.
    pub fn start_load(&mut self) {
        if let Some(p) = self.pending.take() {
            p.handle.abort();
            debug!("Pending match list fetch cancelled");
        }

        let (tx, rx) = oneshot::channel();
        let repo = Arc::clone(&self.repo);
        let handle = tokio::spawn(async move {
            let outcome = repo.list_matches().await;
            if tx.send(outcome).is_err() {
                debug!("List screen gone before fetch finished");
            }
        });

        self.state = ListState::Loading;
        self.pending = Some(PendingList { handle, rx });
    }

    /// Apply the fetch result if it has arrived. Returns true if the state
    /// changed.
    pub fn drain(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let outcome = match pending.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(lost_fetch()),
        };
        self.pending = None;
        self.finish(outcome);
        true
    }

    /// Fetch and wait for the result.
    pub async fn load(&mut self) -> &ListState {
        self.start_load();
        if let Some(pending) = self.pending.take() {
            let outcome = pending.rx.await.unwrap_or_else(|_| Err(lost_fetch()));
            self.finish(outcome);
        }
        &self.state
    }

    fn finish(&mut self, outcome: Result<Vec<MatchSummary>>) {
        let checked = outcome.and_then(|matches| {
            validate_summaries(&matches)?;
            Ok(matches)
        });
        self.state = match checked {
            Ok(matches) => {
                info!(count = matches.len(), "Match list loaded");
                ListState::Ready(matches)
            }
            Err(e) => {
                warn!("Match list failed to load: {e}");
                ListState::Failed(e.to_string())
            }
        };
    }
}

impl Drop for ListScreen {
    fn drop(&mut self) {
        if let Some(p) = self.pending.take() {
            p.handle.abort();
        }
    }
}

/// The fetch task ended without reporting (it panicked).
fn lost_fetch() -> AppError {
    AppError::Fetch("list fetch ended without a result".to_string())
}
