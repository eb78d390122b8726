//! Help overlay showing keybindings

use crate::tui::theme::{Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.accent))
        .title(format!(" {} Keybinds ", icons.help))
        .title_style(Style::default().fg(theme.palette.accent));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let left_content = vec![
        section_header("Setup", &theme),
        keybind("Tab / Down", "Next field", &theme),
        keybind("S-Tab / Up", "Previous field", &theme),
        keybind("Enter", "Load playlist / start", &theme),
        keybind("Left/Right", "Change value", &theme),
        keybind("PgUp/PgDn", "Songs ±10", &theme),
        keybind("Space", "Toggle option", &theme),
        keybind("Ctrl+s", "Start game", &theme),
        keybind("Ctrl+u", "Clear input", &theme),
        keybind("Esc", "Cancel / quit", &theme),
        Line::default(),
        section_header("General", &theme),
        keybind("F1", "Toggle this help", &theme),
        keybind("Ctrl+c", "Quit", &theme),
    ];
    frame.render_widget(Paragraph::new(left_content).wrap(Wrap { trim: false }), cols[0]);

    let right_content = vec![
        section_header("Guessing", &theme),
        keybind("Enter", "Accept suggestion / guess", &theme),
        keybind("Up/Down", "Pick suggestion", &theme),
        keybind("Tab / F2", "Reveal next line", &theme),
        keybind("Ctrl+s / F3", "Skip song", &theme),
        keybind("Ctrl+u", "Clear guess", &theme),
        keybind("Esc", "New game", &theme),
        Line::default(),
        section_header("No lyrics / Results", &theme),
        keybind("Enter / r", "Retry selection", &theme),
        keybind("Enter / n", "New game", &theme),
        keybind("q", "Quit", &theme),
    ];
    frame.render_widget(Paragraph::new(right_content).wrap(Wrap { trim: false }), cols[1]);
}

fn section_header(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("━━ {} ━━", title),
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
    )])
}

fn keybind(key: &str, desc: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("{:13}", key),
            Style::default()
                .fg(theme.palette.accent_alt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.palette.fg_primary)),
    ])
}
