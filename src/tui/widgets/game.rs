//! In-round screen: revealed lyrics, guess box, suggestions.

use crate::app::state::{AppState, GuessInput, ToastKind};
use crate::game::Turn;
use crate::game::controller::{NO_LYRICS_MESSAGE, Round};
use crate::game::reveal::RevealState;
use crate::tui::theme::{Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::root::truncate_str;

pub fn render(frame: &mut Frame, round: &Round, state: &AppState, area: Rect) {
    let theme = get_theme();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(area);

    render_header(frame, round, &theme, rows[0]);

    match round.turn() {
        Turn::Selecting(_) => render_centered(
            frame,
            vec![Line::from(Span::styled(
                format!("{} Finding a song with lyrics...", theme.icons.loading),
                Style::default().fg(theme.palette.fg_secondary),
            ))],
            rows[1],
        ),
        Turn::NoLyrics => render_centered(
            frame,
            vec![
                Line::from(Span::styled(
                    format!("{} {}", theme.icons.error, NO_LYRICS_MESSAGE),
                    Style::default()
                        .fg(theme.palette.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Enter retry · Esc new game · q quit",
                    Style::default().fg(theme.palette.fg_secondary),
                )),
            ],
            rows[1],
        ),
        Turn::Guessing { reveal, .. } => render_guessing(frame, reveal, state, &theme, rows[1]),
    }
}

fn render_header(frame: &mut Frame, round: &Round, theme: &Theme, area: Rect) {
    let settings = round.settings();
    let line = Line::from(vec![
        Span::styled(
            format!(" Song {}/{}", round.round_index(), round.total()),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   Score {}", round.score()),
            Style::default().fg(theme.palette.fg_primary),
        ),
        Span::styled(
            format!("   {} · {} unplayed", settings.display_mode.label(), round.pool().len()),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_guessing(
    frame: &mut Frame,
    reveal: &RevealState,
    state: &AppState,
    theme: &Theme,
    area: Rect,
) {
    let suggestion_rows = state.guess.suggestions.len() as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                  // Lyrics
            Constraint::Length(3),               // Guess input
            Constraint::Length(suggestion_rows), // Suggestions
            Constraint::Length(1),               // Last result
            Constraint::Length(1),               // Hints
        ])
        .split(area);

    render_lyrics(frame, reveal, theme, rows[0]);
    render_guess_box(frame, &state.guess, theme, rows[1]);
    render_suggestions(frame, &state.guess, theme, rows[2]);

    if let Some((message, kind)) = &state.message {
        let icon = match kind {
            ToastKind::Success => theme.icons.success,
            ToastKind::Error => theme.icons.error,
        };
        let line = Line::from(Span::styled(
            format!("{} {}", icon, message),
            Style::default()
                .fg(theme.palette.accent_alt)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), rows[3]);
    }

    let mut hints = String::from("Enter guess · ↑↓ suggestions");
    if reveal.can_advance() {
        hints.push_str(" · Tab next line · Ctrl+S skip");
    }
    hints.push_str(" · Esc new game");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(theme.palette.fg_secondary),
        ))),
        rows[4],
    );
}

fn render_lyrics(frame: &mut Frame, reveal: &RevealState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(
            " {} Lyrics {}/{} ",
            theme.icons.lyrics,
            reveal.visible_indices().len(),
            reveal.len()
        ))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let max_width = inner.width.saturating_sub(2) as usize;
    let last = reveal.last_revealed();
    let mut prev: Option<usize> = None;
    let mut lines: Vec<Line> = Vec::new();

    for (idx, line) in reveal.visible_lines() {
        // Mark gaps left by a random start or shuffled reveal.
        if prev.is_some_and(|p| idx > p + 1) {
            lines.push(Line::from(Span::styled(
                "  ⋮",
                Style::default().fg(theme.palette.fg_secondary),
            )));
        }
        prev = Some(idx);

        let style = if Some(idx) == last && reveal.can_advance() {
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.palette.fg_primary)
        };
        lines.push(Line::from(vec![
            Span::styled("♪ ", Style::default().fg(theme.palette.fg_secondary)),
            Span::styled(truncate_str(&line.text, max_width), style),
        ]));
    }

    // Keep the bottom of the reveal in view.
    let overflow = lines.len().saturating_sub(inner.height as usize) as u16;
    frame.render_widget(Paragraph::new(lines).scroll((overflow, 0)), inner);
}

fn render_guess_box(frame: &mut Frame, guess: &GuessInput, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.accent))
        .title(" Your guess: Title - Artist ")
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);

    let width = inner.width.saturating_sub(1) as usize;
    let chars = guess.text.chars().count();
    // Show the tail when the guess is wider than the box.
    let visible: String = guess.text.chars().skip(chars.saturating_sub(width)).collect();
    let col = visible.chars().count() as u16;

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            visible,
            Style::default().fg(theme.palette.fg_primary),
        )))
        .block(block),
        area,
    );
    frame.set_cursor_position(Position::new(inner.x + col, inner.y));
}

fn render_suggestions(frame: &mut Frame, guess: &GuessInput, theme: &Theme, area: Rect) {
    if guess.suggestions.is_empty() {
        return;
    }
    let items: Vec<ListItem> = guess
        .suggestions
        .iter()
        .map(|song| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("  {} ", song.title),
                    Style::default().fg(theme.palette.fg_primary),
                ),
                Span::styled(
                    format!("- {}", song.artist),
                    Style::default().fg(theme.palette.fg_secondary),
                ),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(guess.highlighted);

    let list = List::new(items).highlight_style(
        Style::default()
            .fg(theme.palette.bg_primary)
            .bg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_centered(frame: &mut Frame, lines: Vec<Line<'static>>, area: Rect) {
    let top_padding = (area.height as usize).saturating_sub(lines.len()) / 2;
    let mut centered: Vec<Line> = vec![Line::default(); top_padding];
    centered.extend(lines);
    frame.render_widget(Paragraph::new(centered).alignment(Alignment::Center), area);
}
