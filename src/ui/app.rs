use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::widgets::TableState;
use tracing::info;

use crate::repository::MatchRepository;
use crate::screen::{DetailScreen, ListScreen};
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Up,
    Down,
    Open,
    Back,
    Reload,
    AiSummary,
}

pub fn action_for(code: KeyCode, route: Route) -> Option<Action> {
    match (code, route) {
        (KeyCode::Char('q') | KeyCode::Char('Q'), _) => Some(Action::Quit),
        (KeyCode::Char('r') | KeyCode::Char('R'), _) => Some(Action::Reload),
        (KeyCode::Down | KeyCode::Char('j'), _) => Some(Action::Down),
        (KeyCode::Up | KeyCode::Char('k'), _) => Some(Action::Up),
        (KeyCode::Enter, Route::List) => Some(Action::Open),
        (KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b'), Route::Detail) => {
            Some(Action::Back)
        }
        (KeyCode::Char('a'), Route::Detail) => Some(Action::AiSummary),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

pub struct App {
    pub route: Route,
    pub list: ListScreen,
    pub detail: DetailScreen,
    pub table_state: TableState,
    /// Vertical scroll of the detail view, in lines.
    pub detail_scroll: u16,
    /// One-line message shown in the footer (e.g. the AI summary stub).
    pub notice: Option<String>,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    pub fn new(repo: Arc<dyn MatchRepository>, theme: Theme) -> Self {
        Self {
            route: Route::List,
            list: ListScreen::new(Arc::clone(&repo)),
            detail: DetailScreen::new(repo),
            table_state: TableState::default(),
            detail_scroll: 0,
            notice: None,
            theme,
            should_quit: false,
        }
    }

    /// Fetch the list and wait for it; used before the first draw.
    pub async fn load_list(&mut self) {
        self.list.load().await;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.list.matches().len();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn selected_match_id(&self) -> Option<&str> {
        let i = self.table_state.selected()?;
        self.list.matches().get(i).map(|m| m.id.as_str())
    }

    /// Pick up finished list fetches and detail lookups. Returns true if a
    /// redraw is needed.
    pub fn tick(&mut self) -> bool {
        let list_changed = self.list.drain();
        if list_changed {
            self.clamp_selection();
        }
        list_changed | self.detail.drain()
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if let Some(action) = action_for(code, self.route) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        self.notice = None;
        match (action, self.route) {
            (Action::Quit, _) => self.should_quit = true,
            (Action::Down, Route::List) => {
                let max = self.list.matches().len().saturating_sub(1);
                let next = self.table_state.selected().map_or(0, |i| (i + 1).min(max));
                self.table_state.select(Some(next));
            }
            (Action::Up, Route::List) => {
                let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.table_state.select(Some(prev));
            }
            (Action::Down, Route::Detail) => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            (Action::Up, Route::Detail) => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            (Action::Open, Route::List) => {
                if let Some(match_id) = self.selected_match_id().map(str::to_string) {
                    self.open_detail(&match_id);
                }
            }
            (Action::Back, Route::Detail) => {
                self.detail.leave();
                self.route = Route::List;
            }
            (Action::Reload, Route::List) => self.list.start_load(),
            (Action::Reload, Route::Detail) => self.detail.retry(),
            (Action::AiSummary, Route::Detail) => {
                if let Some(match_id) = self.detail.state().match_id() {
                    info!(match_id, "AI summary requested");
                }
                self.notice = Some("📸 경기 한눈에 보기: 곧 제공 예정".to_string());
            }
            _ => {}
        }
    }

    /// Only the id crosses into the detail screen; it resolves everything else.
    pub fn open_detail(&mut self, match_id: &str) {
        self.detail_scroll = 0;
        self.detail.navigate(match_id);
        self.route = Route::Detail;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
