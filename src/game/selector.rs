//! Song selection with lyric availability.
//!
//! The selector draws one candidate at a time and waits for its lyrics
//! before drawing another, so at most one request is in flight. A song whose
//! lyrics turn out unusable leaves the pool for the rest of the round.

use super::reveal::RevealState;
use super::redact::redact;
use super::sanitize::sanitize;
use super::settings::DisplaySettings;
use super::song::{LyricLine, Song};
use rand::Rng;

/// Identifies one lyric retrieval. Never reused, so a late answer for an
/// abandoned request can be told apart from the current one.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsRequest {
    pub id: RequestId,
    pub song: Song,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    /// Fetch lyrics for this song and hand them to [`SongSelector::resolve`].
    Request(LyricsRequest),
    /// The pool was empty and has been refilled; nothing was selected.
    PoolReset,
    /// There is nothing to draw from at all.
    Exhausted,
}

#[derive(Debug)]
pub enum Resolution {
    Ready { song: Song, reveal: RevealState },
    /// The candidate had no usable lyrics; draw again.
    Retry,
    /// The candidate had no usable lyrics and the pool is now empty.
    Exhausted,
    /// Answer to a request that is no longer in flight.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SongSelector {
    active: Vec<Song>,
    pool: Vec<Song>,
    played: Vec<Song>,
    in_flight: Option<LyricsRequest>,
}

impl SongSelector {
    pub fn new(active: Vec<Song>) -> Self {
        Self {
            pool: active.clone(),
            active,
            played: Vec::new(),
            in_flight: None,
        }
    }

    pub fn next_request<R: Rng + ?Sized>(&mut self, id: RequestId, rng: &mut R) -> Draw {
        if self.active.is_empty() {
            return Draw::Exhausted;
        }
        if self.pool.is_empty() {
            self.refill();
            tracing::debug!(pool = self.pool.len(), "song pool refilled");
            return Draw::PoolReset;
        }

        let idx = rng.random_range(0..self.pool.len());
        let request = LyricsRequest {
            id,
            song: self.pool[idx].clone(),
        };
        self.in_flight = Some(request.clone());
        Draw::Request(request)
    }

    /// Settle the in-flight request with whatever the lyric source returned.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        id: RequestId,
        lyrics: Option<Vec<LyricLine>>,
        settings: &DisplaySettings,
        rng: &mut R,
    ) -> Resolution {
        let Some(request) = self.in_flight.take_if(|r| r.id == id) else {
            return Resolution::Stale;
        };
        let song = request.song;
        self.pool.retain(|s| *s != song);

        let lines = sanitize(&lyrics.unwrap_or_default());
        if !lines.is_empty() {
            let lines = redact(&lines, &song.title, settings.exclude_song_name);
            let reveal = RevealState::new(lines, settings, rng);
            self.played.push(song.clone());
            return Resolution::Ready { song, reveal };
        }

        tracing::info!(
            title = %song.title,
            artist = %song.artist,
            "no usable lyrics, dropping song"
        );
        if self.pool.is_empty() {
            Resolution::Exhausted
        } else {
            Resolution::Retry
        }
    }

    /// Forget the in-flight request; its answer will resolve as stale.
    #[cfg(test)]
    pub fn abandon(&mut self) {
        self.in_flight = None;
    }

    pub fn pool(&self) -> &[Song] {
        &self.pool
    }

    pub fn active(&self) -> &[Song] {
        &self.active
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> Option<&LyricsRequest> {
        self.in_flight.as_ref()
    }

    // Songs already played this round stay out unless nothing else is left.
    fn refill(&mut self) {
        self.pool = self
            .active
            .iter()
            .filter(|s| !self.played.contains(s))
            .cloned()
            .collect();
        if self.pool.is_empty() {
            self.pool = self.active.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn songs() -> Vec<Song> {
        vec![
            Song::new("A", "X"),
            Song::new("B", "Y"),
            Song::new("C", "Z"),
        ]
    }

    fn lyrics(n: usize) -> Option<Vec<LyricLine>> {
        Some((0..n).map(|i| LyricLine::new(format!("line {i}"))).collect())
    }

    fn request(draw: Draw) -> LyricsRequest {
        match draw {
            Draw::Request(r) => r,
            other => panic!("expected a request, got {other:?}"),
        }
    }

    #[test]
    fn test_success_removes_song() {
        let mut rng = StdRng::seed_from_u64(5);
        let settings = DisplaySettings::default();
        let mut sel = SongSelector::new(songs());

        let req = request(sel.next_request(1, &mut rng));
        assert_eq!(sel.in_flight(), Some(&req));
        match sel.resolve(1, lyrics(3), &settings, &mut rng) {
            Resolution::Ready { song, reveal } => {
                assert_eq!(song, req.song);
                assert_eq!(reveal.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(sel.pool().len(), 2);
        assert!(!sel.pool().contains(&req.song));
        assert!(sel.in_flight().is_none());
    }

    #[test]
    fn test_failed_song_never_returns() {
        let mut rng = StdRng::seed_from_u64(11);
        let settings = DisplaySettings::default();
        let mut sel = SongSelector::new(songs());

        let failed = request(sel.next_request(1, &mut rng));
        assert!(matches!(sel.resolve(1, None, &settings, &mut rng), Resolution::Retry));

        for id in 2..40 {
            match sel.next_request(id, &mut rng) {
                Draw::Request(r) => {
                    assert_ne!(r.song, failed.song);
                    sel.abandon();
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_annotation_only_lyrics_are_unusable() {
        let mut rng = StdRng::seed_from_u64(2);
        let settings = DisplaySettings::default();
        let mut sel = SongSelector::new(vec![Song::new("A", "X")]);
        request(sel.next_request(1, &mut rng));
        let junk = Some(vec![LyricLine::new("[Instrumental]"), LyricLine::new("  ")]);
        assert!(matches!(sel.resolve(1, junk, &settings, &mut rng), Resolution::Exhausted));
        assert!(sel.pool().is_empty());
    }

    #[test]
    fn test_exhaustion_then_reset_to_active() {
        let mut rng = StdRng::seed_from_u64(8);
        let settings = DisplaySettings::default();
        let mut sel = SongSelector::new(songs());

        let mut outcomes = Vec::new();
        for id in 1..=3 {
            request(sel.next_request(id, &mut rng));
            outcomes.push(sel.resolve(id, None, &settings, &mut rng));
        }
        assert!(matches!(outcomes[0], Resolution::Retry));
        assert!(matches!(outcomes[1], Resolution::Retry));
        assert!(matches!(outcomes[2], Resolution::Exhausted));
        assert!(sel.pool().is_empty());

        assert_eq!(sel.next_request(4, &mut rng), Draw::PoolReset);
        assert_eq!(sel.pool(), sel.active());
    }

    #[test]
    fn test_refill_skips_played_songs() {
        let mut rng = StdRng::seed_from_u64(21);
        let settings = DisplaySettings::default();
        let mut sel = SongSelector::new(songs());

        let played = request(sel.next_request(1, &mut rng));
        assert!(matches!(sel.resolve(1, lyrics(2), &settings, &mut rng), Resolution::Ready { .. }));
        for id in 2..=3 {
            request(sel.next_request(id, &mut rng));
            sel.resolve(id, None, &settings, &mut rng);
        }

        assert_eq!(sel.next_request(4, &mut rng), Draw::PoolReset);
        assert_eq!(sel.pool().len(), 2);
        assert!(!sel.pool().contains(&played.song));
    }

    #[test]
    fn test_stale_answer_is_ignored() {
        let mut rng = StdRng::seed_from_u64(4);
        let settings = DisplaySettings::default();
        let mut sel = SongSelector::new(songs());

        request(sel.next_request(1, &mut rng));
        sel.abandon();
        assert!(matches!(sel.resolve(1, lyrics(3), &settings, &mut rng), Resolution::Stale));
        assert_eq!(sel.pool().len(), 3);

        request(sel.next_request(2, &mut rng));
        assert!(matches!(sel.resolve(1, lyrics(3), &settings, &mut rng), Resolution::Stale));
        assert!(sel.in_flight().is_some());
    }

    #[test]
    fn test_redaction_applied() {
        let mut rng = StdRng::seed_from_u64(0);
        let settings = DisplaySettings {
            exclude_song_name: true,
            ..Default::default()
        };
        let mut sel = SongSelector::new(vec![Song::new("Yesterday", "The Beatles")]);
        request(sel.next_request(1, &mut rng));
        let raw = Some(vec![LyricLine::new("Yesterday, all my troubles")]);
        match sel.resolve(1, raw, &settings, &mut rng) {
            Resolution::Ready { reveal, .. } => {
                assert_eq!(reveal.lines()[0].text, "..., all my troubles");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_active_set() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut sel = SongSelector::new(Vec::new());
        assert_eq!(sel.next_request(1, &mut rng), Draw::Exhausted);
    }
}
