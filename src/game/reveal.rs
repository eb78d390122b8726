//! Line-reveal scheduling for the song on screen.
//!
//! Visible indices only ever grow while a song is presented. A fresh
//! `RevealState` is built for every song and dropped on guess or skip.

use super::settings::{DisplayMode, DisplaySettings};
use super::song::LyricLine;
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::BTreeSet;

/// A random start is drawn from the first this-many lines.
pub const RANDOM_START_WINDOW: usize = 8;

#[derive(Debug, Clone)]
pub struct RevealState {
    lines: Vec<LyricLine>,
    visible: BTreeSet<usize>,
    cursor: usize,
    last_revealed: Option<usize>,
    settings: DisplaySettings,
}

impl RevealState {
    pub fn new<R: Rng + ?Sized>(
        lines: Vec<LyricLine>,
        settings: &DisplaySettings,
        rng: &mut R,
    ) -> Self {
        let n = lines.len();
        let mut visible = BTreeSet::new();
        let mut cursor = 0;
        let mut last_revealed = None;

        match settings.display_mode {
            DisplayMode::AllAtOnce => visible.extend(0..n),
            DisplayMode::LineByLine if n > 0 => {
                let start = if settings.start_from_random_line {
                    rng.random_range(0..n.min(RANDOM_START_WINDOW))
                } else {
                    0
                };
                visible.insert(start);
                cursor = start + 1;
                last_revealed = Some(start);
            }
            DisplayMode::LineByLine => {}
        }

        Self {
            lines,
            visible,
            cursor,
            last_revealed,
            settings: *settings,
        }
    }

    /// Reveal one more line. Returns the newly visible index, or `None`
    /// when nothing changed.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if !self.can_advance() {
            return None;
        }

        let next = if self.settings.randomize_line_order {
            self.hidden().choose(rng)?
        } else if let Some(idx) =
            (self.cursor..self.lines.len()).find(|i| !self.visible.contains(i))
        {
            self.cursor = idx + 1;
            idx
        } else if self.settings.start_from_random_line {
            // Wrapped past the end after a random start: fill in from the top.
            let (idx, after) = {
                let mut hidden = self.hidden();
                (hidden.next()?, hidden.next())
            };
            self.cursor = after.unwrap_or(self.lines.len());
            idx
        } else {
            return None;
        };

        self.visible.insert(next);
        self.last_revealed = Some(next);
        Some(next)
    }

    /// Whether a "next line" request would reveal anything.
    pub fn can_advance(&self) -> bool {
        self.settings.is_line_by_line() && !self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.visible.len() == self.lines.len()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn visible_indices(&self) -> &BTreeSet<usize> {
        &self.visible
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The most recent line shown by line-by-line reveal.
    pub fn last_revealed(&self) -> Option<usize> {
        self.last_revealed
    }

    /// Visible lines in source order.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &LyricLine)> + '_ {
        self.visible.iter().map(|&i| (i, &self.lines[i]))
    }

    fn hidden(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.lines.len()).filter(|i| !self.visible.contains(i))
    }
}
