use crate::game::{DisplaySettings, Song};
use crate::playlist::Playlist;

/// Number of suggestions offered under the guess box.
pub const SUGGESTION_LIMIT: usize = 5;

/// Settings form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupField {
    #[default]
    Source,
    NumberOfSongs,
    DisplayMode,
    ExcludeSongName,
    RandomizeLines,
    RandomStart,
    Start,
}

impl SetupField {
    const ORDER: [SetupField; 7] = [
        SetupField::Source,
        SetupField::NumberOfSongs,
        SetupField::DisplayMode,
        SetupField::ExcludeSongName,
        SetupField::RandomizeLines,
        SetupField::RandomStart,
        SetupField::Start,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    pub source_input: String,
    pub settings: DisplaySettings,
    pub focus: SetupField,
    pub playlist: Option<Playlist>,
    /// Source label of the playlist being fetched.
    pub loading: Option<String>,
    pub error: Option<String>,
}

impl SetupForm {
    pub fn new(settings: DisplaySettings, source: Option<String>) -> Self {
        Self {
            source_input: source.unwrap_or_default(),
            settings: settings.clamped(),
            ..Default::default()
        }
    }

    pub fn can_start(&self) -> bool {
        self.loading.is_none() && self.playlist.as_ref().is_some_and(|p| !p.songs.is_empty())
    }

    pub fn songs(&self) -> &[Song] {
        self.playlist.as_ref().map(|p| p.songs.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuessInput {
    pub text: String,
    pub suggestions: Vec<Song>,
    pub highlighted: Option<usize>,
}

impl GuessInput {
    pub fn clear(&mut self) {
        self.text.clear();
        self.suggestions.clear();
        self.highlighted = None;
    }

    pub fn refresh_suggestions(&mut self, songs: &[Song]) {
        self.suggestions = crate::game::suggest::suggest(songs, &self.text, SUGGESTION_LIMIT)
            .into_iter()
            .cloned()
            .collect();
        self.highlighted = None;
    }

    pub fn highlight_next(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Replace the text with the highlighted (or first) suggestion.
    /// Returns false when there was nothing to accept.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(song) = self
            .suggestions
            .get(self.highlighted.unwrap_or(0))
            .map(Song::canonical)
        else {
            return false;
        };
        self.text = song;
        self.suggestions.clear();
        self.highlighted = None;
        true
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// Presentation state around the game controller.
#[derive(Debug, Default)]
pub struct AppState {
    pub should_quit: bool,
    pub show_help: bool,
    pub setup: SetupForm,
    pub guess: GuessInput,
    /// Result of the last guess/skip, shown until the next one.
    pub message: Option<(String, ToastKind)>,
    pub toast: Option<Toast>,
    pub status: String,
}

impl AppState {
    pub fn new(settings: DisplaySettings, source: Option<String>) -> Self {
        Self {
            setup: SetupForm::new(settings, source),
            status: "Enter a playlist URL or a .toml/.json song list".into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs() -> Vec<Song> {
        vec![
            Song::new("Imagine", "John Lennon"),
            Song::new("Jealous Guy", "John Lennon"),
            Song::new("Yesterday", "The Beatles"),
        ]
    }

    #[test]
    fn test_setup_focus_wraps() {
        assert_eq!(SetupField::Source.prev(), SetupField::Start);
        assert_eq!(SetupField::Start.next(), SetupField::Source);
        assert_eq!(SetupField::Source.next(), SetupField::NumberOfSongs);
    }

    #[test]
    fn test_suggestion_highlight_and_accept() {
        let mut g = GuessInput {
            text: "john".into(),
            ..Default::default()
        };
        g.refresh_suggestions(&songs());
        assert_eq!(g.suggestions.len(), 2);

        g.highlight_next();
        g.highlight_next();
        g.highlight_next();
        assert_eq!(g.highlighted, Some(1));
        g.highlight_prev();
        g.highlight_prev();
        assert_eq!(g.highlighted, None);

        assert!(g.accept_suggestion());
        assert_eq!(g.text, "Imagine - John Lennon");
        assert!(g.suggestions.is_empty());
        assert!(!g.accept_suggestion());
    }

    #[test]
    fn test_setup_can_start() {
        let mut form = SetupForm::new(DisplaySettings::default(), None);
        assert!(!form.can_start());
        form.playlist = Some(Playlist {
            info: Default::default(),
            songs: songs(),
        });
        assert!(form.can_start());
        form.loading = Some("PL1".into());
        assert!(!form.can_start());
    }
}
