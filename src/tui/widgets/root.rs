//! Root layout widget - picks the screen for the current game phase

use crate::app::state::{AppState, ToastKind};
use crate::game::Phase;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{game, help, setup, summary};

/// ┌──────────────────────────────────────────────┐
/// │  Setup / Game / Summary                       │
/// ├──────────────────────────────────────────────┤
/// │ status                                 toast │
/// └──────────────────────────────────────────────┘
pub fn render(frame: &mut Frame, phase: &Phase, state: &mut AppState) {
    let theme = get_theme();
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Screen
            Constraint::Length(3), // Status bar
        ])
        .split(root);

    let (title, icon) = match phase {
        Phase::Idle | Phase::AwaitingSettings => ("Setup", theme.icons.settings),
        Phase::InRound(_) => ("Guess the song", theme.icons.lyrics),
        Phase::RoundComplete(_) => ("Results", theme.icons.star),
    };

    let main = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} lyriguess · {} ", icon, title))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = main.inner(rows[0]);
    frame.render_widget(main, rows[0]);

    match phase {
        Phase::Idle | Phase::AwaitingSettings => setup::render(frame, state, inner),
        Phase::InRound(round) => game::render(frame, round, state, inner),
        Phase::RoundComplete(result) => summary::render(frame, result, inner),
    }

    render_status_bar(frame, state, rows[1]);

    if state.show_help {
        let area = centered_rect(70, 80, root);
        frame.render_widget(Clear, area);
        help::render(frame, area);
    }
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut spans = vec![
        Span::styled(format!("{} ", icons.info), Style::default().fg(theme.palette.fg_secondary)),
        Span::styled(
            truncate_str(&state.status, width / 2),
            Style::default().fg(theme.palette.fg_primary),
        ),
    ];

    if let Some(toast) = &state.toast
        && !toast.is_expired()
    {
        let prefix = match toast.kind {
            ToastKind::Success => icons.success,
            ToastKind::Error => icons.error,
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} {}", prefix, truncate_str(&toast.message, width / 2)),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        "   F1 help",
        Style::default().fg(theme.palette.fg_secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// A `percent_x` by `percent_y` rectangle centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub(super) fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}
