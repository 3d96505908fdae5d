use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::config::STAT_BAR_WIDTH;
use crate::present::{bar_cells, format_rating, format_stat_value, split};
use crate::screen::{DetailState, ListState};
use crate::theme::{Role, Theme};
use crate::types::{MatchDetail, StatPair};
use crate::ui::app::{App, Route};

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    match app.route {
        Route::List => render_list(f, app, chunks[1]),
        Route::Detail => render_detail(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn card(theme: Theme, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.color(Role::CardBorder)))
        .style(Style::default().bg(theme.color(Role::CardBackground)))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.color(Role::Tint)).add_modifier(Modifier::BOLD),
        ))
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let spans = match app.route {
        Route::List => vec![
            Span::styled(
                " 오늘의 경기 ⚽  ",
                Style::default().fg(theme.color(Role::Tint)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} matches", app.list.matches().len()),
                Style::default().fg(theme.color(Role::SecondaryText)),
            ),
        ],
        Route::Detail => vec![Span::styled(
            " ← 뒤로 ",
            Style::default().fg(theme.color(Role::Text)).add_modifier(Modifier::BOLD),
        )],
    };

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.color(Role::CardBorder))),
    );
    f.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// List screen
// ---------------------------------------------------------------------------

fn render_list(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme;
    let secondary = Style::default().fg(theme.color(Role::SecondaryText));

    let message = match app.list.state() {
        ListState::Loading => Some(("경기 목록을 불러오는 중...".to_string(), secondary)),
        ListState::Failed(reason) => Some((
            format!("불러오지 못했습니다 — r 키로 다시 시도 ({reason})"),
            Style::default().fg(theme.color(Role::BadgeText)),
        )),
        ListState::Ready(matches) if matches.is_empty() => {
            Some(("오늘 경기가 없습니다".to_string(), secondary))
        }
        ListState::Ready(_) => None,
    };
    if let Some((text, style)) = message {
        let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
            .alignment(Alignment::Center)
            .block(card(theme, "MATCHES"));
        f.render_widget(paragraph, area);
        return;
    }

    let header_cells = ["#", "경기", "🧠 한줄 요약", "🔥 재미도", "상태"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(theme.color(Role::Tint)).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .list
        .matches()
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut fixture = vec![Span::raw(format!("{} ", m.home_team))];
            fixture.extend(score_spans(
                theme,
                m.home_score,
                m.away_score,
                Style::default().add_modifier(Modifier::BOLD),
            ));
            fixture.push(Span::raw(format!(" {}", m.away_team)));
            Row::new(vec![
                Cell::from(format!("{}", i + 1)).style(secondary),
                Cell::from(Line::from(fixture)),
                Cell::from(truncate(&m.summary, 40)),
                Cell::from(format_rating(m.fun_rating)).style(
                    Style::default()
                        .fg(theme.color(Role::BadgeText))
                        .bg(theme.color(Role::Badge)),
                ),
                Cell::from(m.status.to_string()).style(secondary),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(22),
            Constraint::Min(10),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(card(theme, "MATCHES"))
    .row_highlight_style(
        Style::default()
            .bg(theme.color(Role::CardBorder))
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(table, area, &mut app.table_state);
}

// ---------------------------------------------------------------------------
// Detail screen
// ---------------------------------------------------------------------------

fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme;
    let secondary = Style::default().fg(theme.color(Role::SecondaryText));

    let lines = match app.detail.state() {
        DetailState::Idle => Vec::new(),
        DetailState::Loading { .. } => {
            vec![Line::from(Span::styled("⏳ 경기 정보를 불러오는 중...", secondary))]
        }
        DetailState::NotFound { .. } => vec![Line::from("경기를 찾을 수 없습니다")],
        DetailState::Failed { reason, .. } => vec![
            Line::from(Span::styled(
                "불러오지 못했습니다 — r 키로 다시 시도",
                Style::default().fg(theme.color(Role::BadgeText)),
            )),
            Line::from(Span::styled(reason.clone(), secondary)),
        ],
        DetailState::Resolved(detail) => detail_lines(theme, detail),
    };

    let alignment = if matches!(app.detail.state(), DetailState::Resolved(_)) {
        Alignment::Left
    } else {
        Alignment::Center
    };
    let paragraph = Paragraph::new(lines)
        .alignment(alignment)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0))
        .block(card(theme, "MATCH"));
    f.render_widget(paragraph, area);
}

/// `3 : 1`, with the divider in its own colour.
fn score_spans(theme: Theme, home: u32, away: u32, style: Style) -> [Span<'static>; 3] {
    [
        Span::styled(home.to_string(), style),
        Span::styled(" : ", style.fg(theme.color(Role::ScoreDivider))),
        Span::styled(away.to_string(), style),
    ]
}

fn section(theme: Theme, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.color(Role::Tint)).add_modifier(Modifier::BOLD),
    ))
}

fn detail_lines(theme: Theme, d: &MatchDetail) -> Vec<Line<'static>> {
    let s = &d.summary;
    let secondary = Style::default().fg(theme.color(Role::SecondaryText));
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let badge = Style::default()
        .fg(theme.color(Role::BadgeText))
        .bg(theme.color(Role::Badge))
        .add_modifier(Modifier::BOLD);

    let mut score = vec![Span::styled(format!("  {}  ", s.home_team), bold)];
    score.extend(score_spans(theme, s.home_score, s.away_score, bold));
    score.push(Span::styled(format!("  {}", s.away_team), bold));

    let mut lines = vec![
        Line::from(score),
        Line::default(),
        section(theme, "🧠 한줄 요약"),
        Line::from(s.summary.clone()),
        Line::default(),
        section(theme, "📊 한눈에 보는 승부"),
    ];

    for (label, pair) in d.stats.rows() {
        lines.extend(stat_bar_lines(theme, label, pair, &s.home_team, &s.away_team));
    }

    lines.extend([
        section(theme, "⭐ 오늘의 에이스"),
        Line::from(Span::styled(d.ace_player.name.clone(), bold)),
        Line::from(Span::styled(
            format!("평점 {} · {}", format_rating(d.ace_player.rating), d.ace_team_name()),
            secondary,
        )),
        Line::from(d.ace_player.description.clone()),
        Line::default(),
        section(theme, "🎯 경기 재미도"),
        Line::from(Span::styled(format!(" {} ", d.fun_rating_badge.label()), badge)),
        Line::from(Span::styled(format!("{} / 10", format_rating(s.fun_rating)), secondary)),
        Line::default(),
        Line::from(vec![
            Span::styled(
                " 📸 경기 한눈에 보기 ",
                Style::default().fg(theme.color(Role::Tint)).add_modifier(Modifier::REVERSED),
            ),
            Span::styled("  [a] 곧 제공 예정", secondary),
        ]),
    ]);
    lines
}

fn stat_bar_lines(
    theme: Theme,
    label: &str,
    pair: StatPair,
    home_team: &str,
    away_team: &str,
) -> Vec<Line<'static>> {
    let secondary = Style::default().fg(theme.color(Role::SecondaryText));
    let (home_cells, away_cells) = bar_cells(split(pair.home, pair.away), STAT_BAR_WIDTH);
    let home_value = format_stat_value(pair.home);
    let away_value = format_stat_value(pair.away);

    vec![
        Line::from(Span::styled(label.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            spread(home_team, away_team, STAT_BAR_WIDTH as usize),
            secondary,
        )),
        Line::from(vec![
            Span::styled(
                "█".repeat(home_cells as usize),
                Style::default().fg(theme.color(Role::Tint)),
            ),
            Span::styled("█".repeat(away_cells as usize), secondary),
        ]),
        Line::from(spread(&home_value, &away_value, STAT_BAR_WIDTH as usize)),
        Line::default(),
    ]
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(app.theme.color(Role::Tint));
    let mut spans = vec![
        Span::styled(" [q] ", key),
        Span::raw("quit  "),
        Span::styled("[r] ", key),
        Span::raw("reload  "),
        Span::styled("[↑↓ / j k] ", key),
    ];
    match app.route {
        Route::List => {
            spans.push(Span::raw("select  "));
            spans.push(Span::styled("[enter] ", key));
            spans.push(Span::raw("open  "));
        }
        Route::Detail => {
            spans.push(Span::raw("scroll  "));
            spans.push(Span::styled("[esc] ", key));
            spans.push(Span::raw("back  "));
        }
    }
    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(app.theme.color(Role::BadgeText)),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `left` and `right` pushed to either end of a `width`-column line.
fn spread(left: &str, right: &str, width: usize) -> String {
    let used = display_width(left) + display_width(right);
    let gap = width.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

/// Terminal columns taken by `s`; Hangul and other wide characters take two.
fn display_width(s: &str) -> usize {
    Line::from(s).width()
}

/// Char-safe truncation with a trailing ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::dataset::Dataset;
    use crate::repository::StaticMatchRepository;
    use crate::state::MatchStore;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    async fn seeded_app() -> App {
        let (dataset, _) = Dataset::seed().unwrap();
        let repo = StaticMatchRepository::new(MatchStore::from_dataset(dataset), Duration::ZERO);
        let mut app = App::new(Arc::new(repo), Theme::Light);
        app.load_list().await;
        app
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("전북이 공중볼 경합에서", 4), "전북이…");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn spread_pads_to_width() {
        assert_eq!(spread("18", "8", 10), "18       8");
        assert_eq!(spread("long-left", "long-right", 4), "long-left long-right");
    }

    #[tokio::test]
    async fn list_shows_scores_and_ratings() {
        let mut app = seeded_app().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("3 : 1"), "{text}");
        assert!(text.contains("7.8"), "{text}");
        assert!(text.contains("finished"), "{text}");
    }

    #[tokio::test]
    async fn score_divider_uses_its_role_colour() {
        let mut app = seeded_app().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let cells = terminal.backend().buffer().content();
        let dividers: Vec<_> = (2..cells.len() - 2)
            .filter(|&i| {
                cells[i].symbol() == ":"
                    && cells[i - 2].symbol() == "3"
                    && cells[i + 2].symbol() == "1"
            })
            .collect();
        assert!(!dividers.is_empty(), "no 3 : 1 score on screen");
        for i in dividers {
            assert_eq!(cells[i].fg, Theme::Light.color(Role::ScoreDivider));
        }
    }

    #[tokio::test]
    async fn list_with_non_finite_rating_renders_as_failure() {
        struct NanRatingRepo;

        #[async_trait::async_trait]
        impl crate::repository::MatchRepository for NanRatingRepo {
            async fn list_matches(&self) -> crate::error::Result<Vec<crate::types::MatchSummary>> {
                let (dataset, _) = Dataset::seed()?;
                let mut matches = dataset.summaries;
                matches[2].fun_rating = f64::NAN;
                Ok(matches)
            }

            async fn match_detail(
                &self,
                _match_id: &str,
            ) -> crate::error::Result<Option<MatchDetail>> {
                Ok(None)
            }
        }

        let mut app = App::new(Arc::new(NanRatingRepo), Theme::Dark);
        app.load_list().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(matches!(app.list.state(), ListState::Failed(_)));
    }

    #[tokio::test]
    async fn detail_shows_ratings_and_values() {
        let mut app = seeded_app().await;
        app.open_detail("1");
        app.detail.settle().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 60)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("8.5"), "{text}");
        assert!(text.contains("7.8 / 10"), "{text}");
        assert!(text.contains("18"), "{text}");
    }
}
