use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CHANNEL_CAPACITY;
use crate::dataset::validate_detail;
use crate::error::{AppError, Result};
use crate::repository::MatchRepository;
use crate::types::MatchDetail;

/// How often `settle` re-checks a lookup task that may have died without reporting.
const SETTLE_POLL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// idle → loading → (resolved | not-found | failed)
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading { match_id: String },
    Resolved(MatchDetail),
    NotFound { match_id: String },
    Failed { match_id: String, reason: String },
}

impl DetailState {
    pub fn match_id(&self) -> Option<&str> {
        match self {
            DetailState::Idle => None,
            DetailState::Loading { match_id }
            | DetailState::NotFound { match_id }
            | DetailState::Failed { match_id, .. } => Some(match_id),
            DetailState::Resolved(detail) => Some(detail.id()),
        }
    }
}

/// Identifies one lookup. A new navigation always gets a new `seq`, so a
/// repeated visit to the same id still supersedes the older request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    pub seq: u64,
    pub match_id: String,
}

/// Sent by a lookup task when the repository answers.
#[derive(Debug)]
pub struct Completion {
    pub key: RequestKey,
    pub outcome: Result<Option<MatchDetail>>,
}

struct InFlight {
    key: RequestKey,
    handle: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// DetailScreen
// ---------------------------------------------------------------------------

/// Owns the loading/result state of the detail view. Each navigation spawns
/// one lookup task; only the completion matching the current key is applied.
pub struct DetailScreen {
    repo: Arc<dyn MatchRepository>,
    state: DetailState,
    in_flight: Option<InFlight>,
    next_seq: u64,
    done_tx: mpsc::Sender<Completion>,
    done_rx: mpsc::Receiver<Completion>,
}

impl DetailScreen {
    pub fn new(repo: Arc<dyn MatchRepository>) -> Self {
        let (done_tx, done_rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            repo,
            state: DetailState::Idle,
            in_flight: None,
            next_seq: 0,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Key of the lookup whose result is still awaited, if any.
    #[allow(dead_code)]
    pub fn pending_key(&self) -> Option<&RequestKey> {
        self.in_flight.as_ref().map(|f| &f.key)
    }

    /// Start loading `match_id`, cancelling whatever lookup was pending.
    /// Must be called from within a tokio runtime.
    pub fn navigate(&mut self, match_id: &str) {
        self.cancel_in_flight();

        self.next_seq += 1;
        let key = RequestKey { seq: self.next_seq, match_id: match_id.to_string() };

        let repo = Arc::clone(&self.repo);
        let tx = self.done_tx.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let outcome = repo.match_detail(&task_key.match_id).await;
            if tx.send(Completion { key: task_key, outcome }).await.is_err() {
                debug!("Detail screen gone before lookup finished");
            }
        });

        debug!(seq = key.seq, match_id, "Detail lookup started");
        self.state = DetailState::Loading { match_id: match_id.to_string() };
        self.in_flight = Some(InFlight { key, handle });
    }

    /// Re-run the lookup for the id currently shown. No-op when idle.
    pub fn retry(&mut self) {
        if let Some(match_id) = self.state.match_id().map(str::to_string) {
            self.navigate(&match_id);
        }
    }

    /// Navigate away: cancel the pending lookup and go back to idle.
    pub fn leave(&mut self) {
        self.cancel_in_flight();
        self.state = DetailState::Idle;
    }

    /// Apply a lookup result. Returns false when the result is stale and
    /// was discarded.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.key == completion.key);
        if !is_current {
            debug!(
                seq = completion.key.seq,
                match_id = %completion.key.match_id,
                "Discarding stale detail lookup"
            );
            return false;
        }
        self.in_flight = None;

        let match_id = completion.key.match_id;
        self.state = match completion.outcome.and_then(|found| check_payload(&match_id, found)) {
            Ok(Some(detail)) => {
                info!(match_id = %match_id, "Match detail loaded");
                DetailState::Resolved(detail)
            }
            Ok(None) => {
                info!(match_id = %match_id, "Match not found");
                DetailState::NotFound { match_id }
            }
            Err(e) => {
                warn!(match_id = %match_id, "Match detail failed to load: {e}");
                DetailState::Failed { match_id, reason: e.to_string() }
            }
        };
        true
    }

    /// Apply every completion already delivered, without waiting. Returns true
    /// if the state changed.
    /// A lookup task that died without reporting turns into `Failed` here.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.done_rx.try_recv() {
            changed |= self.apply(completion);
        }
        changed | self.reap_lost()
    }

    /// Wait until the pending lookup (if any) has been applied.
    #[allow(dead_code)]
    pub async fn settle(&mut self) -> &DetailState {
        loop {
            if self.in_flight.is_none() || self.reap_lost() {
                break;
            }
            tokio::select! {
                Some(completion) = self.done_rx.recv() => {
                    self.apply(completion);
                }
                _ = tokio::time::sleep(SETTLE_POLL) => {}
            }
        }
        &self.state
    }

    fn cancel_in_flight(&mut self) {
        if let Some(f) = self.in_flight.take() {
            f.handle.abort();
            debug!(seq = f.key.seq, match_id = %f.key.match_id, "Detail lookup cancelled");
        }
    }

    /// Fail the pending lookup if its task ended without reporting (it
    /// panicked). Returns true if it did.
    fn reap_lost(&mut self) -> bool {
        let lost = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.handle.is_finished() && self.done_rx.is_empty());
        if !lost {
            return false;
        }
        if let Some(f) = self.in_flight.take() {
            warn!(match_id = %f.key.match_id, "Detail lookup ended without a result");
            self.state = DetailState::Failed {
                match_id: f.key.match_id,
                reason: "lookup ended without a result".to_string(),
            };
        }
        true
    }
}

impl Drop for DetailScreen {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// A found record must be for the requested id and pass validation.
fn check_payload(match_id: &str, found: Option<MatchDetail>) -> Result<Option<MatchDetail>> {
    let Some(detail) = found else {
        return Ok(None);
    };
    if detail.id() != match_id {
        return Err(AppError::Malformed(format!(
            "asked for match {match_id:?}, got {:?}",
            detail.id()
        )));
    }
    validate_detail(&detail)?;
    Ok(Some(detail))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::dataset::Dataset;
    use crate::repository::StaticMatchRepository;
    use crate::state::MatchStore;
    use crate::types::{MatchSummary, Side};

    fn seed_store() -> Arc<MatchStore> {
        let (dataset, _) = Dataset::seed().unwrap();
        MatchStore::from_dataset(dataset)
    }

    fn seed_repo() -> Arc<dyn MatchRepository> {
        Arc::new(StaticMatchRepository::new(seed_store(), Duration::ZERO))
    }

    /// Holds each gated lookup until the test releases it.
    struct GatedRepo {
        inner: StaticMatchRepository,
        gates: HashMap<String, Arc<Notify>>,
    }

    impl GatedRepo {
        fn new(ids: &[&str]) -> Self {
            Self {
                inner: StaticMatchRepository::new(seed_store(), Duration::ZERO),
                gates: ids.iter().map(|id| (id.to_string(), Arc::new(Notify::new()))).collect(),
            }
        }
    }

    #[async_trait]
    impl MatchRepository for GatedRepo {
        async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
            self.inner.list_matches().await
        }

        async fn match_detail(&self, match_id: &str) -> Result<Option<MatchDetail>> {
            if let Some(gate) = self.gates.get(match_id) {
                gate.notified().await;
            }
            self.inner.match_detail(match_id).await
        }
    }

    struct FailingRepo;

    #[async_trait]
    impl MatchRepository for FailingRepo {
        async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
            Err(AppError::Fetch("backend down".to_string()))
        }

        async fn match_detail(&self, _match_id: &str) -> Result<Option<MatchDetail>> {
            Err(AppError::Fetch("backend down".to_string()))
        }
    }

    /// Always answers with the same record, whatever id was asked for.
    struct FixedRepo(MatchDetail);

    #[async_trait]
    impl MatchRepository for FixedRepo {
        async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
            Ok(vec![self.0.summary.clone()])
        }

        async fn match_detail(&self, _match_id: &str) -> Result<Option<MatchDetail>> {
            Ok(Some(self.0.clone()))
        }
    }

    /// Lookup task dies before it can report.
    struct PanicRepo;

    #[async_trait]
    impl MatchRepository for PanicRepo {
        async fn list_matches(&self) -> Result<Vec<MatchSummary>> {
            Ok(Vec::new())
        }

        async fn match_detail(&self, match_id: &str) -> Result<Option<MatchDetail>> {
            panic!("backend blew up on {match_id}");
        }
    }

    #[tokio::test]
    async fn starts_idle() {
        let screen = DetailScreen::new(seed_repo());
        assert_eq!(screen.state(), &DetailState::Idle);
        assert!(screen.pending_key().is_none());
    }

    #[tokio::test]
    async fn navigate_enters_loading_then_resolves() {
        let mut screen = DetailScreen::new(seed_repo());
        screen.navigate("2");
        assert_eq!(screen.state(), &DetailState::Loading { match_id: "2".to_string() });

        match screen.settle().await {
            DetailState::Resolved(detail) => {
                assert_eq!(detail.id(), "2");
                assert_eq!(detail.ace_player.team, Side::Away);
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
        assert!(screen.pending_key().is_none());
    }

    #[tokio::test]
    async fn unknown_id_resolves_to_not_found() {
        let mut screen = DetailScreen::new(seed_repo());
        screen.navigate("nonexistent-id");
        assert_eq!(
            screen.settle().await,
            &DetailState::NotFound { match_id: "nonexistent-id".to_string() }
        );
    }

    #[tokio::test]
    async fn fetch_failure_is_distinct_from_not_found() {
        let mut screen = DetailScreen::new(Arc::new(FailingRepo));
        screen.navigate("1");
        match screen.settle().await {
            DetailState::Failed { match_id, reason } => {
                assert_eq!(match_id, "1");
                assert!(reason.contains("backend down"), "reason={reason}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rekeyed_lookup_wins_over_stale_one() {
        let repo = Arc::new(GatedRepo::new(&["1", "2"]));
        let gate_1 = Arc::clone(&repo.gates["1"]);
        let gate_2 = Arc::clone(&repo.gates["2"]);
        let mut screen = DetailScreen::new(repo);

        screen.navigate("1");
        let stale_key = screen.pending_key().cloned().unwrap();
        screen.navigate("2");
        assert_eq!(screen.state(), &DetailState::Loading { match_id: "2".to_string() });

        gate_2.notify_one();
        gate_1.notify_one();
        match screen.settle().await {
            DetailState::Resolved(detail) => assert_eq!(detail.id(), "2"),
            other => panic!("expected match 2, got {other:?}"),
        }

        // A late answer for the first request must not overwrite match 2.
        let seed = seed_store();
        let late = Completion { key: stale_key, outcome: Ok(seed.detail("1")) };
        assert!(!screen.apply(late));
        assert_eq!(screen.state().match_id(), Some("2"));
    }

    #[tokio::test]
    async fn stale_completion_ignored_while_new_lookup_pending() {
        let repo = Arc::new(GatedRepo::new(&["1", "3"]));
        let mut screen = DetailScreen::new(repo);

        screen.navigate("1");
        let stale_key = screen.pending_key().cloned().unwrap();
        screen.navigate("3");

        let late = Completion { key: stale_key, outcome: Ok(seed_store().detail("1")) };
        assert!(!screen.apply(late));
        assert_eq!(screen.state(), &DetailState::Loading { match_id: "3".to_string() });
    }

    #[tokio::test]
    async fn same_id_renavigation_supersedes_older_request() {
        let repo = Arc::new(GatedRepo::new(&["1"]));
        let mut screen = DetailScreen::new(repo);

        screen.navigate("1");
        let first = screen.pending_key().cloned().unwrap();
        screen.navigate("1");
        let second = screen.pending_key().cloned().unwrap();
        assert_eq!(first.match_id, second.match_id);
        assert_ne!(first.seq, second.seq);

        let late = Completion { key: first, outcome: Ok(None) };
        assert!(!screen.apply(late));
        assert!(matches!(screen.state(), DetailState::Loading { .. }));
    }

    #[tokio::test]
    async fn leave_cancels_and_returns_to_idle() {
        let repo = Arc::new(GatedRepo::new(&["1"]));
        let gate = Arc::clone(&repo.gates["1"]);
        let mut screen = DetailScreen::new(repo);

        screen.navigate("1");
        let key = screen.pending_key().cloned().unwrap();
        screen.leave();
        gate.notify_one();

        assert_eq!(screen.state(), &DetailState::Idle);
        assert_eq!(screen.settle().await, &DetailState::Idle);
        assert!(!screen.apply(Completion { key, outcome: Ok(None) }));
    }

    #[tokio::test]
    async fn drain_applies_delivered_completion() {
        let mut screen = DetailScreen::new(seed_repo());
        screen.navigate("3");
        for _ in 0..100 {
            if screen.drain() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(screen.state().match_id(), Some("3"));
        assert!(matches!(screen.state(), DetailState::Resolved(_)));
    }

    #[tokio::test]
    async fn drain_fails_lookup_whose_task_died() {
        let mut screen = DetailScreen::new(Arc::new(PanicRepo));
        screen.navigate("1");
        for _ in 0..100 {
            if screen.drain() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        match screen.state() {
            DetailState::Failed { match_id, reason } => {
                assert_eq!(match_id, "1");
                assert!(reason.contains("without a result"), "{reason}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(screen.pending_key().is_none());
        assert!(!screen.drain());
    }

    #[tokio::test]
    async fn retry_reloads_current_id() {
        let mut screen = DetailScreen::new(seed_repo());
        screen.navigate("nonexistent-id");
        screen.settle().await;
        screen.retry();
        assert_eq!(
            screen.state(),
            &DetailState::Loading { match_id: "nonexistent-id".to_string() }
        );
        screen.settle().await;
        assert!(matches!(screen.state(), DetailState::NotFound { .. }));
    }

    #[tokio::test]
    async fn record_for_other_id_is_a_failure() {
        let detail = seed_store().detail("1").unwrap();
        let mut screen = DetailScreen::new(Arc::new(FixedRepo(detail)));
        screen.navigate("2");
        assert!(matches!(screen.settle().await, DetailState::Failed { .. }));
    }

    #[tokio::test]
    async fn malformed_record_is_a_failure() {
        let mut detail = seed_store().detail("1").unwrap();
        detail.stats.shots.home = -3.0;
        let mut screen = DetailScreen::new(Arc::new(FixedRepo(detail)));
        screen.navigate("1");
        match screen.settle().await {
            DetailState::Failed { reason, .. } => assert!(reason.contains("Malformed"), "{reason}"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
