//! Setup screen: playlist source plus the round settings form.

use crate::app::state::{AppState, SetupField, SetupForm};
use crate::game::settings::{MAX_SONGS, MIN_SONGS};
use crate::tui::theme::{Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::root::truncate_str;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let form = &state.setup;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Source input
            Constraint::Length(5), // Playlist info
            Constraint::Min(8),    // Settings rows
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_source(frame, form, &theme, rows[0]);
    render_playlist(frame, form, &theme, rows[1]);
    render_settings(frame, form, &theme, rows[2]);

    let hints = Line::from(Span::styled(
        "Tab/↑↓ move · ←→ change · Space toggle · Enter load/start · Esc cancel/quit",
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(hints), rows[3]);
}

fn render_source(frame: &mut Frame, form: &SetupForm, theme: &Theme, area: Rect) {
    let focused = form.focus == SetupField::Source;
    let border_color = if focused { theme.palette.accent } else { theme.palette.border };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} Playlist URL or song list file ", theme.icons.playlist))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);

    let text = if form.source_input.is_empty() && !focused {
        Span::styled(
            "https://music.youtube.com/playlist?list=...",
            Style::default().fg(theme.palette.fg_secondary),
        )
    } else {
        Span::styled(form.source_input.as_str(), Style::default().fg(theme.palette.fg_primary))
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if focused {
        let col = form.source_input.chars().count() as u16;
        let x = inner.x + col.min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

fn render_playlist(frame: &mut Frame, form: &SetupForm, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Playlist ", icons.music))
        .title_style(Style::default().fg(theme.palette.accent));
    let width = block.inner(area).width as usize;
    let dim = Style::default().fg(theme.palette.fg_secondary);

    let lines: Vec<Line> = if let Some(label) = &form.loading {
        vec![Line::from(Span::styled(
            format!(
                "{} Loading {}...",
                icons.loading,
                truncate_str(label, width.saturating_sub(14))
            ),
            dim,
        ))]
    } else if let Some(error) = &form.error {
        vec![Line::from(vec![
            Span::styled(format!("{} ", icons.error), Style::default().fg(theme.palette.error)),
            Span::styled(error.as_str(), Style::default().fg(theme.palette.error)),
        ])]
    } else if let Some(playlist) = &form.playlist {
        let info = &playlist.info;
        let mut lines = vec![Line::from(Span::styled(
            truncate_str(&info.title, width),
            Style::default()
                .fg(theme.palette.fg_primary)
                .add_modifier(Modifier::BOLD),
        ))];
        let by = info
            .owner
            .as_deref()
            .map(|o| format!("by {o} · "))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("{by}{} songs ({} playable)", info.count, playlist.songs.len()),
            dim,
        )));
        if let Some(desc) = info.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(Line::from(Span::styled(truncate_str(desc, width), dim)));
        }
        lines
    } else {
        vec![Line::from(Span::styled("Press Enter on the URL field to load it", dim))]
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_settings(frame: &mut Frame, form: &SetupForm, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Settings ", icons.settings))
        .title_style(Style::default().fg(theme.palette.accent));

    let s = &form.settings;
    let rows = [
        (
            SetupField::NumberOfSongs,
            "Number of songs",
            format!("‹ {} ›  ({}-{})", s.number_of_songs, MIN_SONGS, MAX_SONGS),
        ),
        (SetupField::DisplayMode, "Display mode", s.display_mode.label().to_string()),
        (SetupField::ExcludeSongName, "Exclude song name", checkbox(s.exclude_song_name)),
        (SetupField::RandomizeLines, "Randomize line order", checkbox(s.randomize_line_order)),
        (SetupField::RandomStart, "Start from random line", checkbox(s.start_from_random_line)),
    ];

    let mut lines: Vec<Line> = rows
        .iter()
        .map(|(field, label, value)| setting_row(form.focus == *field, label, value, theme))
        .collect();

    lines.push(Line::default());
    let start_focused = form.focus == SetupField::Start;
    let start_style = if !form.can_start() {
        Style::default().fg(theme.palette.fg_secondary)
    } else if start_focused {
        Style::default()
            .fg(theme.palette.bg_primary)
            .bg(theme.palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![
        Span::raw(if start_focused { format!("{} ", icons.selected) } else { "  ".into() }),
        Span::styled(" Start Game ", start_style),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn setting_row(focused: bool, label: &str, value: &str, theme: &Theme) -> Line<'static> {
    let (label_style, value_style) = if focused {
        (
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
            Style::default()
                .fg(theme.palette.bg_primary)
                .bg(theme.palette.accent),
        )
    } else {
        (
            Style::default().fg(theme.palette.fg_primary),
            Style::default().fg(theme.palette.accent_alt),
        )
    };
    let marker = if focused { format!("{} ", theme.icons.selected) } else { "  ".into() };
    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:24}", label), label_style),
        Span::styled(value.to_string(), value_style),
    ])
}

fn checkbox(on: bool) -> String {
    if on { "[x]".into() } else { "[ ]".into() }
}
