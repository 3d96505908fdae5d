pub mod app;
pub mod render;

use std::sync::Arc;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::config::UI_POLL_INTERVAL;
use crate::error::Result;
use crate::repository::MatchRepository;
use crate::theme::Theme;
use app::App;

/// Restores the terminal when dropped, including on early returns and
/// unwinding panics.
struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Run the list/detail UI until the user quits.
pub async fn run(repo: Arc<dyn MatchRepository>, theme: Theme) -> Result<()> {
    let mut app = App::new(repo, theme);

    // Initial fetch before rendering
    app.load_list().await;

    // Raw mode + alternate screen; also installs a panic hook that restores
    // the terminal before the panic message is printed.
    let _restore = RestoreGuard { restore: ratatui::restore };
    let mut terminal = ratatui::try_init()?;

    run_loop(&mut terminal, &mut app)
}

fn run_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render::render(f, app))?;

        if event::poll(UI_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
        if app.should_quit {
            return Ok(());
        }

        app.tick();
    }
}
