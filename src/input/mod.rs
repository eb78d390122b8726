use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, SetupField};
use crate::game::{Phase, Turn};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) if mouse_enabled => InputEvent::Mouse(m),
                    Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                    Ok(_) | Err(_) => continue,
                };
                if tx.blocking_send(Event::Input(ev)).is_err() {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(phase: &Phase, state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match (phase, m.kind) {
            (Phase::InRound(_), MouseEventKind::ScrollUp) => Some(Action::SuggestionUp),
            (Phase::InRound(_), MouseEventKind::ScrollDown) => Some(Action::SuggestionDown),
            _ => None,
        },
        InputEvent::Key(k) => {
            if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
                return Some(Action::Quit);
            }
            if k.code == KeyCode::F(1) {
                return Some(Action::ToggleHelp);
            }
            if state.show_help {
                return matches!(k.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter)
                    .then_some(Action::ToggleHelp);
            }
            match phase {
                Phase::Idle | Phase::AwaitingSettings => handle_setup(state, k),
                Phase::InRound(round) => match round.turn() {
                    Turn::Guessing { .. } => handle_guessing(k),
                    Turn::Selecting(_) => handle_loading(k),
                    Turn::NoLyrics => handle_no_lyrics(k),
                },
                Phase::RoundComplete(_) => handle_summary(k),
            }
        }
    }
}

fn handle_setup(state: &AppState, k: KeyEvent) -> Option<Action> {
    let focus = state.setup.focus;
    match k.code {
        KeyCode::Esc if focus != SetupField::Source => Some(Action::FocusSource),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab | KeyCode::Down => Some(Action::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPrev),

        KeyCode::Enter => match focus {
            SetupField::Source => Some(Action::LoadPlaylist),
            SetupField::Start => Some(Action::StartGame),
            SetupField::NumberOfSongs => Some(Action::FocusNext),
            _ => Some(Action::Toggle),
        },
        KeyCode::Char('s') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::StartGame)
        }

        // Text entry on the source row
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ClearInput)
        }
        KeyCode::Backspace if focus == SetupField::Source => Some(Action::Backspace),
        KeyCode::Char(c) if focus == SetupField::Source => Some(Action::InputChar(c)),

        // Other rows
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Adjust(-1)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Adjust(1)),
        KeyCode::PageDown => Some(Action::Adjust(-10)),
        KeyCode::PageUp => Some(Action::Adjust(10)),
        KeyCode::Char(' ') => Some(Action::Toggle),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),

        _ => None,
    }
}

fn handle_guessing(k: KeyEvent) -> Option<Action> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    match k.code {
        KeyCode::Esc => Some(Action::NewGame),
        KeyCode::Enter => Some(Action::SubmitGuess),
        KeyCode::Up => Some(Action::SuggestionUp),
        KeyCode::Down => Some(Action::SuggestionDown),
        KeyCode::Tab | KeyCode::F(2) => Some(Action::RevealNextLine),
        KeyCode::F(3) => Some(Action::Skip),
        KeyCode::Char('n') if ctrl => Some(Action::RevealNextLine),
        KeyCode::Char('s') if ctrl => Some(Action::Skip),
        KeyCode::Char('u') if ctrl => Some(Action::ClearInput),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !ctrl => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn handle_loading(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::NewGame),
        _ => None,
    }
}

fn handle_no_lyrics(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Enter | KeyCode::Char('r') => Some(Action::RetrySelection),
        KeyCode::Esc | KeyCode::Char('n') => Some(Action::NewGame),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn handle_summary(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Enter | KeyCode::Char('n') => Some(Action::NewGame),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}
