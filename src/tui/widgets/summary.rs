use crate::game::controller::{Outcome, Summary};
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

pub fn render(frame: &mut Frame, result: &Summary, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score
            Constraint::Min(3),    // History
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let score = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(format!(" {} ", icons.star), Style::default().fg(theme.palette.accent)),
            Span::styled(
                format!("Game over! You scored {} out of {}", result.score, result.total),
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(score), rows[0]);

    let items: Vec<ListItem> = result
        .history
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let (icon, label) = match record.outcome {
                Outcome::Correct => (icons.success, "correct"),
                Outcome::Wrong => (icons.error, "wrong"),
                Outcome::Skipped => (icons.next, "skipped"),
            };
            let style = if record.outcome == Outcome::Correct {
                Style::default().fg(theme.palette.fg_primary)
            } else {
                Style::default().fg(theme.palette.fg_secondary)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:>2}. {} ", i + 1, icon), style),
                Span::styled(format!("{} - {}", record.song.title, record.song.artist), style),
                Span::styled(
                    format!("  ({label})"),
                    Style::default().fg(theme.palette.fg_secondary),
                ),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items), rows[1]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Enter new game · q quit",
            Style::default().fg(theme.palette.fg_secondary),
        ))),
        rows[2],
    );
}
