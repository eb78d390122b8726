//! Lyric guessing game core.
//!
//! Pure, single-threaded state: selection, sanitizing, redaction, line
//! reveal and judging. Randomness is always passed in. Network access happens
//! outside, through [`source::LyricsSource`].

pub mod controller;
pub mod judge;
pub mod redact;
pub mod reveal;
pub mod sanitize;
pub mod selector;
pub mod settings;
pub mod song;
pub mod source;
pub mod suggest;

pub use controller::{GameAction, GameController, GameEvent, Phase, Turn};
pub use settings::{DisplayMode, DisplaySettings};
pub use song::{LyricLine, Song};
pub use source::LyricsSource;
