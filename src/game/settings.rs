use serde::{Deserialize, Serialize};

pub const MIN_SONGS: u8 = 1;
pub const MAX_SONGS: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    LineByLine,
    AllAtOnce,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::LineByLine => DisplayMode::AllAtOnce,
            DisplayMode::AllAtOnce => DisplayMode::LineByLine,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::LineByLine => "Line by Line",
            DisplayMode::AllAtOnce => "All at Once",
        }
    }
}

/// How a round presents lyrics. Fixed for the lifetime of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub number_of_songs: u8,
    pub display_mode: DisplayMode,
    pub exclude_song_name: bool,
    pub randomize_line_order: bool,
    pub start_from_random_line: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            number_of_songs: 5,
            display_mode: DisplayMode::LineByLine,
            exclude_song_name: true,
            randomize_line_order: false,
            start_from_random_line: true,
        }
    }
}

impl DisplaySettings {
    /// Copy with `number_of_songs` forced into `MIN_SONGS..=MAX_SONGS`.
    pub fn clamped(self) -> Self {
        Self {
            number_of_songs: self.number_of_songs.clamp(MIN_SONGS, MAX_SONGS),
            ..self
        }
    }

    pub fn is_line_by_line(&self) -> bool {
        self.display_mode == DisplayMode::LineByLine
    }

    pub fn more_songs(&mut self, step: u8) {
        self.number_of_songs = self.number_of_songs.saturating_add(step).min(MAX_SONGS);
    }

    pub fn fewer_songs(&mut self, step: u8) {
        self.number_of_songs = self.number_of_songs.saturating_sub(step).max(MIN_SONGS);
    }
}
