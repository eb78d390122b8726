//! Round lifecycle.
//!
//! All game state sits in one [`Phase`] value and changes only through
//! [`GameController::update`]. Lyric retrieval is not performed here: a
//! transition that needs lyrics returns a [`LyricsRequest`], and the answer
//! comes back as [`GameAction::LyricsArrived`].

use super::judge::{Verdict, judge};
use super::reveal::RevealState;
use super::selector::{Draw, LyricsRequest, RequestId, Resolution, SongSelector};
use super::settings::DisplaySettings;
use super::song::{LyricLine, Song};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::collections::HashSet;

pub const NO_LYRICS_MESSAGE: &str = "Sorry, couldn't find lyrics for any songs in this playlist.";

#[derive(Debug, Clone)]
pub enum GameAction {
    OpenSettings,
    StartRound {
        settings: DisplaySettings,
        songs: Vec<Song>,
    },
    LyricsArrived {
        request: RequestId,
        lyrics: Option<Vec<LyricLine>>,
    },
    RevealNextLine,
    SubmitGuess(String),
    Skip,
    /// Try selecting again after every remaining song came back without lyrics.
    RetrySelection,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Correct(Song),
    Wrong(Song),
    Skipped(Song),
    NoLyricsAvailable,
    RoundComplete { score: u32, total: u32 },
}

impl GameEvent {
    pub fn message(&self) -> String {
        match self {
            GameEvent::Correct(s) => {
                format!("Correct! You guessed \"{}\" by {}", s.title, s.artist)
            }
            GameEvent::Wrong(s) => format!("Wrong guess! It was \"{}\" by {}", s.title, s.artist),
            GameEvent::Skipped(s) => format!("Skipped \"{}\" by {}", s.title, s.artist),
            GameEvent::NoLyricsAvailable => NO_LYRICS_MESSAGE.to_string(),
            GameEvent::RoundComplete { score, total } => {
                format!("Game over! You scored {score} out of {total}")
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GameEvent::Correct(_) | GameEvent::RoundComplete { .. })
    }
}

/// What the caller has to do after a transition.
#[derive(Debug, Default)]
#[must_use]
pub struct Transition {
    /// Lyrics to retrieve before the round can continue.
    pub fetch: Option<LyricsRequest>,
    pub events: Vec<GameEvent>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn fetch(request: LyricsRequest) -> Self {
        Self {
            fetch: Some(request),
            events: Vec::new(),
        }
    }

    fn event(event: GameEvent) -> Self {
        Self {
            fetch: None,
            events: vec![event],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Wrong,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuessRecord {
    pub song: Song,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Turn {
    /// Waiting on lyrics for a candidate.
    Selecting(LyricsRequest),
    Guessing { song: Song, reveal: RevealState },
    /// No remaining song produced lyrics.
    NoLyrics,
}

#[derive(Debug)]
pub struct Round {
    settings: DisplaySettings,
    selector: SongSelector,
    history: Vec<GuessRecord>,
    score: u32,
    round_index: u32,
    turn: Turn,
}

impl Round {
    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// 1-based index of the song being played.
    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    /// Songs in this game: the configured count, or fewer for a short playlist.
    pub fn total(&self) -> u32 {
        self.selector.active().len() as u32
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn pool(&self) -> &[Song] {
        self.selector.pool()
    }

    pub fn current_song(&self) -> Option<&Song> {
        match &self.turn {
            Turn::Guessing { song, .. } => Some(song),
            _ => None,
        }
    }

    pub fn reveal(&self) -> Option<&RevealState> {
        match &self.turn {
            Turn::Guessing { reveal, .. } => Some(reveal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub score: u32,
    pub total: u32,
    pub history: Vec<GuessRecord>,
}

#[derive(Debug)]
pub enum Phase {
    Idle,
    AwaitingSettings,
    InRound(Round),
    RoundComplete(Summary),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingSettings => "awaiting-settings",
            Phase::InRound(_) => "in-round",
            Phase::RoundComplete(_) => "round-complete",
        }
    }
}

pub struct GameController<R> {
    phase: Phase,
    rng: R,
    next_request: RequestId,
}

impl<R: Rng> GameController<R> {
    pub fn new(rng: R) -> Self {
        Self {
            phase: Phase::Idle,
            rng,
            next_request: 1,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::InRound(round) => Some(round),
            _ => None,
        }
    }

    pub fn update(&mut self, action: GameAction) -> Transition {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let (next, transition) = self.transition(phase, action);
        if transition.fetch.is_some() || !transition.events.is_empty() {
            tracing::debug!(
                phase = next.name(),
                events = transition.events.len(),
                "game transition"
            );
        }
        self.phase = next;
        transition
    }

    fn transition(&mut self, phase: Phase, action: GameAction) -> (Phase, Transition) {
        match (phase, action) {
            (Phase::Idle, GameAction::OpenSettings) => {
                (Phase::AwaitingSettings, Transition::none())
            }
            (_, GameAction::Reset) => (Phase::AwaitingSettings, Transition::none()),
            (Phase::AwaitingSettings, GameAction::StartRound { settings, songs }) => {
                self.start_round(settings, songs)
            }
            (Phase::InRound(round), action) => self.in_round(round, action),
            (phase, action) => {
                tracing::debug!(phase = phase.name(), ?action, "action ignored");
                (phase, Transition::none())
            }
        }
    }

    fn start_round(&mut self, settings: DisplaySettings, songs: Vec<Song>) -> (Phase, Transition) {
        let settings = settings.clamped();
        let mut seen = HashSet::new();
        let unique: Vec<Song> = songs.into_iter().filter(|s| seen.insert(s.clone())).collect();
        let count = usize::from(settings.number_of_songs).min(unique.len());
        let active: Vec<Song> = unique.choose_multiple(&mut self.rng, count).cloned().collect();

        tracing::info!(songs = active.len(), candidates = unique.len(), "round started");
        let round = Round {
            settings,
            selector: SongSelector::new(active),
            history: Vec::new(),
            score: 0,
            round_index: 1,
            turn: Turn::NoLyrics,
        };
        self.select_next(round)
    }

    fn in_round(&mut self, mut round: Round, action: GameAction) -> (Phase, Transition) {
        match action {
            GameAction::LyricsArrived { request, lyrics } => {
                if !matches!(&round.turn, Turn::Selecting(r) if r.id == request) {
                    tracing::debug!(request, "discarding lyrics for an abandoned request");
                    return (Phase::InRound(round), Transition::none());
                }
                match round.selector.resolve(request, lyrics, &round.settings, &mut self.rng) {
                    Resolution::Ready { song, reveal } => {
                        tracing::info!(
                            index = round.round_index,
                            lines = reveal.len(),
                            "song ready"
                        );
                        round.turn = Turn::Guessing { song, reveal };
                        (Phase::InRound(round), Transition::none())
                    }
                    Resolution::Retry => self.select_next(round),
                    Resolution::Exhausted => {
                        tracing::warn!("no song in the pool has lyrics");
                        round.turn = Turn::NoLyrics;
                        (Phase::InRound(round), Transition::event(GameEvent::NoLyricsAvailable))
                    }
                    Resolution::Stale => (Phase::InRound(round), Transition::none()),
                }
            }
            GameAction::RevealNextLine => {
                if let Turn::Guessing { reveal, .. } = &mut round.turn {
                    reveal.advance(&mut self.rng);
                }
                (Phase::InRound(round), Transition::none())
            }
            GameAction::SubmitGuess(text) => {
                let verdict = match &round.turn {
                    Turn::Guessing { song, .. } => judge(&text, song),
                    _ => Verdict::Rejected,
                };
                match verdict {
                    Verdict::Rejected => (Phase::InRound(round), Transition::none()),
                    Verdict::Correct => self.finish_song(round, Outcome::Correct),
                    Verdict::Incorrect => self.finish_song(round, Outcome::Wrong),
                }
            }
            GameAction::Skip if round.current_song().is_some() => {
                self.finish_song(round, Outcome::Skipped)
            }
            GameAction::RetrySelection if matches!(round.turn, Turn::NoLyrics) => {
                self.select_next(round)
            }
            other => {
                tracing::debug!(action = ?other, "action ignored in round");
                (Phase::InRound(round), Transition::none())
            }
        }
    }

    fn finish_song(&mut self, mut round: Round, outcome: Outcome) -> (Phase, Transition) {
        let Turn::Guessing { song, .. } = std::mem::replace(&mut round.turn, Turn::NoLyrics) else {
            return (Phase::InRound(round), Transition::none());
        };

        let event = match outcome {
            Outcome::Correct => GameEvent::Correct(song.clone()),
            Outcome::Wrong => GameEvent::Wrong(song.clone()),
            Outcome::Skipped => GameEvent::Skipped(song.clone()),
        };
        if outcome == Outcome::Correct {
            round.score += 1;
        }
        round.history.push(GuessRecord { song, outcome });

        if round.history.len() < round.selector.active().len() {
            round.round_index += 1;
            let (phase, mut transition) = self.select_next(round);
            transition.events.insert(0, event);
            return (phase, transition);
        }

        let summary = Summary {
            score: round.score,
            total: round.total(),
            history: round.history,
        };
        tracing::info!(score = summary.score, total = summary.total, "round complete");
        let done = GameEvent::RoundComplete {
            score: summary.score,
            total: summary.total,
        };
        (
            Phase::RoundComplete(summary),
            Transition {
                fetch: None,
                events: vec![event, done],
            },
        )
    }

    fn select_next(&mut self, mut round: Round) -> (Phase, Transition) {
        // A refill reports no selection, so allow one more draw after it.
        for _ in 0..2 {
            let id = self.next_request;
            self.next_request += 1;
            match round.selector.next_request(id, &mut self.rng) {
                Draw::Request(request) => {
                    tracing::debug!(
                        request = request.id,
                        title = %request.song.title,
                        artist = %request.song.artist,
                        "requesting lyrics"
                    );
                    round.turn = Turn::Selecting(request.clone());
                    return (Phase::InRound(round), Transition::fetch(request));
                }
                Draw::PoolReset => continue,
                Draw::Exhausted => break,
            }
        }
        round.turn = Turn::NoLyrics;
        (Phase::InRound(round), Transition::event(GameEvent::NoLyricsAvailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::settings::DisplayMode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn controller(seed: u64) -> GameController<StdRng> {
        GameController::new(StdRng::seed_from_u64(seed))
    }

    fn songs(n: usize) -> Vec<Song> {
        (0..n).map(|i| Song::new(format!("Song {i}"), format!("Artist {i}"))).collect()
    }

    fn lyrics(n: usize) -> Option<Vec<LyricLine>> {
        Some((0..n).map(|i| LyricLine::new(format!("la la {i}"))).collect())
    }

    fn settings(n: u8) -> DisplaySettings {
        DisplaySettings {
            number_of_songs: n,
            display_mode: DisplayMode::LineByLine,
            exclude_song_name: false,
            randomize_line_order: false,
            start_from_random_line: false,
        }
    }

    fn start(c: &mut GameController<StdRng>, n: u8, pool: Vec<Song>) -> Transition {
        let _ = c.update(GameAction::OpenSettings);
        c.update(GameAction::StartRound {
            settings: settings(n),
            songs: pool,
        })
    }

    /// Answer every request with `lines` lines until a song is on screen.
    fn settle(c: &mut GameController<StdRng>, mut t: Transition, lines: usize) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut t.events);
        while let Some(req) = t.fetch.take() {
            t = c.update(GameAction::LyricsArrived {
                request: req.id,
                lyrics: lyrics(lines),
            });
            events.append(&mut t.events);
        }
        events
    }

    #[test]
    fn test_start_requires_settings_phase() {
        let mut c = controller(1);
        let t = c.update(GameAction::StartRound {
            settings: settings(3),
            songs: songs(5),
        });
        assert!(t.fetch.is_none());
        assert!(matches!(c.phase(), Phase::Idle));
    }

    #[test]
    fn test_start_round_draws_subset() {
        let mut c = controller(2);
        let t = start(&mut c, 3, songs(10));
        let req = t.fetch.expect("lyrics request");
        let round = c.round().unwrap();
        assert_eq!(round.total(), 3);
        assert_eq!(round.round_index(), 1);
        assert_eq!(round.score(), 0);
        assert!(matches!(round.turn(), Turn::Selecting(_)));
        assert!(round.current_song().is_none());
        assert!(round.pool().contains(&req.song));
    }

    #[test]
    fn test_short_playlist_limits_total() {
        let mut c = controller(3);
        let mut pool = songs(2);
        pool.push(Song::new("Song 0", "Artist 0"));
        let t = start(&mut c, 10, pool);
        settle(&mut c, t, 2);
        assert_eq!(c.round().unwrap().total(), 2);
    }

    #[test]
    fn test_correct_guess_scores_and_advances() {
        let mut c = controller(4);
        let t = start(&mut c, 2, songs(4));
        settle(&mut c, t, 3);

        let song = c.round().unwrap().current_song().unwrap().clone();
        let t = c.update(GameAction::SubmitGuess(format!("  {}  ", song.canonical())));
        assert_eq!(t.events, vec![GameEvent::Correct(song.clone())]);
        assert!(t.fetch.is_some());

        let round = c.round().unwrap();
        assert_eq!(round.score(), 1);
        assert_eq!(round.round_index(), 2);
        assert!(round.current_song().is_none());
        assert_eq!(round.history()[0].song, song);
    }

    #[test]
    fn test_empty_guess_changes_nothing() {
        let mut c = controller(5);
        let t = start(&mut c, 2, songs(4));
        settle(&mut c, t, 3);
        let before = c.round().unwrap().current_song().cloned();

        let t = c.update(GameAction::SubmitGuess("   ".into()));
        assert!(t.events.is_empty());
        assert!(t.fetch.is_none());
        let round = c.round().unwrap();
        assert_eq!(round.current_song().cloned(), before);
        assert!(round.history().is_empty());
    }

    #[test]
    fn test_skip_and_wrong_guess() {
        let mut c = controller(6);
        let t = start(&mut c, 2, songs(2));
        settle(&mut c, t, 3);

        let first = c.round().unwrap().current_song().unwrap().clone();
        let t = c.update(GameAction::Skip);
        assert_eq!(t.events[0], GameEvent::Skipped(first));
        settle(&mut c, t, 3);

        let second = c.round().unwrap().current_song().unwrap().clone();
        let t = c.update(GameAction::SubmitGuess(second.canonical().to_lowercase()));
        assert_eq!(
            t.events,
            vec![
                GameEvent::Wrong(second),
                GameEvent::RoundComplete { score: 0, total: 2 }
            ]
        );
        match c.phase() {
            Phase::RoundComplete(summary) => {
                assert_eq!(summary.score, 0);
                assert_eq!(summary.history.len(), 2);
                assert_eq!(summary.history[0].outcome, Outcome::Skipped);
                assert_eq!(summary.history[1].outcome, Outcome::Wrong);
            }
            other => panic!("unexpected phase {}", other.name()),
        }
    }

    #[test]
    fn test_round_completes_after_n_songs() {
        for seed in 0..16 {
            let mut c = controller(seed);
            let n = 1 + (seed % 5) as u8;
            let mut t = start(&mut c, n, songs(8));
            for i in 0..n {
                settle(&mut c, t, 4);
                let song = c.round().unwrap().current_song().unwrap().clone();
                let guess = if i % 2 == 0 { song.canonical() } else { "nope".into() };
                t = c.update(GameAction::SubmitGuess(guess));
            }
            match c.phase() {
                Phase::RoundComplete(summary) => {
                    assert_eq!(summary.history.len(), usize::from(n));
                    assert!(summary.score <= u32::from(n));
                    assert_eq!(summary.score, u32::from(n).div_ceil(2));
                }
                other => panic!("seed {seed}: unexpected phase {}", other.name()),
            }
        }
    }

    #[test]
    fn test_reveal_next_line() {
        let mut c = controller(7);
        let t = start(&mut c, 1, songs(1));
        settle(&mut c, t, 3);

        let visible = |c: &GameController<StdRng>| {
            c.round().unwrap().reveal().unwrap().visible_indices().len()
        };
        assert_eq!(visible(&c), 1);
        let _ = c.update(GameAction::RevealNextLine);
        assert_eq!(visible(&c), 2);
        let _ = c.update(GameAction::RevealNextLine);
        let _ = c.update(GameAction::RevealNextLine);
        assert_eq!(visible(&c), 3);
    }

    #[test]
    fn test_exhaustion_and_retry() {
        let mut c = controller(8);
        let mut t = start(&mut c, 2, songs(2));
        let mut events = Vec::new();
        while let Some(req) = t.fetch.take() {
            t = c.update(GameAction::LyricsArrived {
                request: req.id,
                lyrics: None,
            });
            events.append(&mut t.events);
        }
        assert_eq!(events, vec![GameEvent::NoLyricsAvailable]);
        let round = c.round().unwrap();
        assert!(matches!(round.turn(), Turn::NoLyrics));
        assert!(round.current_song().is_none());
        assert!(round.pool().is_empty());

        // skipping or guessing does nothing without a song
        let t = c.update(GameAction::Skip);
        assert!(t.events.is_empty() && t.fetch.is_none());

        let t = c.update(GameAction::RetrySelection);
        assert!(t.fetch.is_some());
        assert_eq!(c.round().unwrap().pool().len(), 2);
    }

    #[test]
    fn test_reset_discards_in_flight_lyrics() {
        let mut c = controller(9);
        let t = start(&mut c, 2, songs(3));
        let stale = t.fetch.unwrap();

        let _ = c.update(GameAction::Reset);
        assert!(matches!(c.phase(), Phase::AwaitingSettings));
        let t = c.update(GameAction::LyricsArrived {
            request: stale.id,
            lyrics: lyrics(3),
        });
        assert!(t.fetch.is_none() && t.events.is_empty());
        assert!(matches!(c.phase(), Phase::AwaitingSettings));

        // a new round never reuses the old request id
        let t = c.update(GameAction::StartRound {
            settings: settings(2),
            songs: songs(3),
        });
        let fresh = t.fetch.unwrap();
        assert_ne!(fresh.id, stale.id);
        let t = c.update(GameAction::LyricsArrived {
            request: stale.id,
            lyrics: lyrics(3),
        });
        assert!(t.fetch.is_none());
        assert!(matches!(c.round().unwrap().turn(), Turn::Selecting(_)));
    }

    #[test]
    fn test_number_of_songs_is_clamped() {
        let mut c = controller(10);
        let _ = c.update(GameAction::OpenSettings);
        let t = c.update(GameAction::StartRound {
            settings: settings(0),
            songs: songs(5),
        });
        settle(&mut c, t, 2);
        assert_eq!(c.round().unwrap().settings().number_of_songs, 1);
        assert_eq!(c.round().unwrap().total(), 1);
    }

    #[test]
    fn test_empty_playlist_reports_no_lyrics() {
        let mut c = controller(11);
        let t = start(&mut c, 5, Vec::new());
        assert_eq!(t.events, vec![GameEvent::NoLyricsAvailable]);
        assert!(t.fetch.is_none());
    }

    #[test]
    fn test_play_again_from_complete() {
        let mut c = controller(12);
        let t = start(&mut c, 1, songs(1));
        settle(&mut c, t, 1);
        let _ = c.update(GameAction::Skip);
        assert!(matches!(c.phase(), Phase::RoundComplete(_)));
        let _ = c.update(GameAction::Reset);
        assert!(matches!(c.phase(), Phase::AwaitingSettings));
    }

    #[test]
    fn test_messages() {
        let s = Song::new("Imagine", "John Lennon");
        assert_eq!(
            GameEvent::Correct(s.clone()).message(),
            "Correct! You guessed \"Imagine\" by John Lennon"
        );
        assert_eq!(GameEvent::Skipped(s).message(), "Skipped \"Imagine\" by John Lennon");
        assert_eq!(GameEvent::NoLyricsAvailable.message(), NO_LYRICS_MESSAGE);
    }
}
