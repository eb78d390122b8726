pub mod actions;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::game::controller::Transition;
use crate::game::source::fetch_for;
use crate::game::selector::LyricsRequest;
use crate::game::{GameAction, GameController, GameEvent, Phase};
use crate::input;
use crate::lyrics::{LrclibClient, LyricsService};
use crate::playlist::{self, PlaylistSource};
use crate::storage::StorageHandle;
use crate::tui::{self, TuiTerminal};
use crate::ytm::YtmClient;
use actions::Action;
use events::{Event, NetworkEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use state::{AppState, SetupField, Toast, ToastKind};
use tokio::sync::mpsc;

/// Build the cached LRCLIB source from config.
pub fn lyrics_service(cfg: &Config) -> anyhow::Result<LyricsService> {
    let client = LrclibClient::new(&cfg.lyrics.base_url, cfg.lyrics.timeout_secs)?;
    let cache = cfg
        .lyrics
        .cache
        .then(|| StorageHandle::new(&cfg.paths.data_dir));
    Ok(LyricsService::new(client, cache))
}

pub struct App {
    game: GameController<StdRng>,
    state: AppState,
    ytm: YtmClient,
    lyrics: LyricsService,
    mouse: bool,
}

impl App {
    pub fn new(cfg: Config, source: Option<String>) -> anyhow::Result<Self> {
        let rng = match cfg.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            game: GameController::new(rng),
            state: AppState::new(cfg.game.settings, source),
            ytm: YtmClient::new(cfg.lyrics.timeout_secs)?,
            lyrics: lyrics_service(&cfg)?,
            mouse: cfg.input.mouse,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.mouse);
        // No ticker: redraw on input and network events only.

        let opened = self.game.update(GameAction::OpenSettings);
        self.apply(opened, &tx);
        if !self.state.setup.source_input.trim().is_empty() {
            self.load_playlist(&tx);
        }

        tui::draw(terminal, self.game.phase(), &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) =
                        input::map_input_to_action(self.game.phase(), &self.state, input_ev)
                    {
                        self.handle_action(action, &tx);
                    }
                }
                Event::Network(ne) => self.handle_network(ne, &tx),
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, self.game.phase(), &mut self.state)?;
        }

        Ok(())
    }

    fn in_round(&self) -> bool {
        matches!(self.game.phase(), Phase::InRound(_))
    }

    /// Next line and skip are only offered in line-by-line mode while lines remain.
    fn can_reveal(&self) -> bool {
        self.game
            .round()
            .and_then(|r| r.reveal())
            .is_some_and(|r| r.can_advance())
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::ToggleHelp => self.state.show_help = !self.state.show_help,
            Action::Resize => {}

            Action::InputChar(c) => {
                if self.in_round() {
                    self.state.guess.text.push(c);
                    self.refresh_suggestions();
                } else if self.state.setup.focus == SetupField::Source {
                    self.state.setup.source_input.push(c);
                    self.state.setup.error = None;
                }
            }
            Action::Backspace => {
                if self.in_round() {
                    self.state.guess.text.pop();
                    self.refresh_suggestions();
                } else if self.state.setup.focus == SetupField::Source {
                    self.state.setup.source_input.pop();
                }
            }
            Action::ClearInput => {
                if self.in_round() {
                    self.state.guess.clear();
                } else if self.state.setup.focus == SetupField::Source {
                    self.state.setup.source_input.clear();
                }
            }

            Action::FocusNext => self.state.setup.focus = self.state.setup.focus.next(),
            Action::FocusPrev => self.state.setup.focus = self.state.setup.focus.prev(),
            Action::FocusSource => self.state.setup.focus = SetupField::Source,
            Action::Adjust(delta) => match self.state.setup.focus {
                SetupField::NumberOfSongs if delta > 0 => {
                    self.state.setup.settings.more_songs(delta.unsigned_abs())
                }
                SetupField::NumberOfSongs => {
                    self.state.setup.settings.fewer_songs(delta.unsigned_abs())
                }
                _ => self.toggle_focused(),
            },
            Action::Toggle => self.toggle_focused(),
            Action::LoadPlaylist => self.load_playlist(tx),
            Action::StartGame => self.start_game(tx),

            Action::SubmitGuess => {
                if self.state.guess.accept_suggestion() {
                    return;
                }
                let text = self.state.guess.text.trim().to_string();
                if text.is_empty() {
                    return;
                }
                let transition = self.game.update(GameAction::SubmitGuess(text));
                self.state.guess.clear();
                self.apply(transition, tx);
            }
            Action::SuggestionUp => self.state.guess.highlight_prev(),
            Action::SuggestionDown => self.state.guess.highlight_next(),
            Action::RevealNextLine => {
                if self.can_reveal() {
                    let transition = self.game.update(GameAction::RevealNextLine);
                    self.apply(transition, tx);
                }
            }
            Action::Skip => {
                if self.can_reveal() {
                    let transition = self.game.update(GameAction::Skip);
                    self.state.guess.clear();
                    self.apply(transition, tx);
                }
            }
            Action::RetrySelection => {
                self.state.message = None;
                let transition = self.game.update(GameAction::RetrySelection);
                self.apply(transition, tx);
            }
            Action::NewGame => {
                let transition = self.game.update(GameAction::Reset);
                self.state.guess.clear();
                self.state.message = None;
                self.state.setup.focus = SetupField::Start;
                self.state.status = "Adjust the settings and start again".into();
                self.apply(transition, tx);
            }
        }
    }

    fn toggle_focused(&mut self) {
        let settings = &mut self.state.setup.settings;
        match self.state.setup.focus {
            SetupField::DisplayMode => settings.display_mode = settings.display_mode.toggle(),
            SetupField::ExcludeSongName => settings.exclude_song_name = !settings.exclude_song_name,
            SetupField::RandomizeLines => {
                settings.randomize_line_order = !settings.randomize_line_order
            }
            SetupField::RandomStart => {
                settings.start_from_random_line = !settings.start_from_random_line
            }
            SetupField::Source | SetupField::NumberOfSongs | SetupField::Start => {}
        }
    }

    fn refresh_suggestions(&mut self) {
        let songs = self.state.setup.songs().to_vec();
        self.state.guess.refresh_suggestions(&songs);
    }

    fn start_game(&mut self, tx: &mpsc::Sender<Event>) {
        if !self.state.setup.can_start() {
            self.state.toast = Some(Toast::error("Load a playlist first"));
            return;
        }
        if matches!(self.game.phase(), Phase::Idle) {
            let opened = self.game.update(GameAction::OpenSettings);
            self.apply(opened, tx);
        }

        let settings = self.state.setup.settings.clamped();
        let songs = self.state.setup.songs().to_vec();
        self.state.guess.clear();
        self.state.message = None;
        self.state.show_help = false;
        let transition = self.game.update(GameAction::StartRound { settings, songs });
        if let Some(round) = self.game.round() {
            self.state.status = format!("Round of {} songs", round.total());
        }
        self.apply(transition, tx);
    }

    /// Surface events and kick off any requested lyric fetch.
    fn apply(&mut self, transition: Transition, tx: &mpsc::Sender<Event>) {
        for event in &transition.events {
            let kind = if event.is_success() {
                ToastKind::Success
            } else {
                ToastKind::Error
            };
            match event {
                GameEvent::RoundComplete { .. } => self.state.status = event.message(),
                _ => self.state.message = Some((event.message(), kind)),
            }
        }

        if let Some(request) = transition.fetch {
            self.spawn_lyrics_fetch(request, tx.clone());
        }
    }

    fn load_playlist(&mut self, tx: &mpsc::Sender<Event>) {
        let setup = &mut self.state.setup;
        let source = match PlaylistSource::parse(&setup.source_input) {
            Ok(source) => source,
            Err(e) => {
                setup.error = Some(e.to_string());
                return;
            }
        };

        let label = source.label();
        setup.error = None;
        setup.playlist = None;
        setup.loading = Some(label.clone());
        self.state.status = format!("Loading {label}...");

        let ytm = self.ytm.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = match playlist::load(&source, &ytm).await {
                Ok(playlist) => NetworkEvent::PlaylistLoaded {
                    source: label,
                    playlist,
                },
                Err(e) => {
                    tracing::warn!(
                        source = %label,
                        error = %format!("{e:#}"),
                        "playlist load failed"
                    );
                    NetworkEvent::PlaylistFailed {
                        source: label,
                        error: format!("{e:#}"),
                    }
                }
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn spawn_lyrics_fetch(&mut self, request: LyricsRequest, tx: mpsc::Sender<Event>) {
        let service = self.lyrics.clone();
        tokio::spawn(async move {
            let lyrics = fetch_for(&service, &request.song).await;
            let _ = tx
                .send(Event::Network(NetworkEvent::LyricsArrived {
                    request: request.id,
                    lyrics,
                }))
                .await;
        });
    }

    fn handle_network(&mut self, ne: NetworkEvent, tx: &mpsc::Sender<Event>) {
        match ne {
            NetworkEvent::PlaylistLoaded { source, playlist } => {
                let setup = &mut self.state.setup;
                if setup.loading.as_deref() != Some(source.as_str()) {
                    return;
                }
                setup.loading = None;
                setup.focus = SetupField::Start;
                self.state.status = format!("Loaded {} songs", playlist.songs.len());
                self.state.toast =
                    Some(Toast::success(format!("Loaded \"{}\"", playlist.info.title)));
                setup.playlist = Some(playlist);
            }
            NetworkEvent::PlaylistFailed { source, error } => {
                let setup = &mut self.state.setup;
                if setup.loading.as_deref() != Some(source.as_str()) {
                    return;
                }
                setup.loading = None;
                setup.error = Some(format!("Failed to fetch playlist data: {error}"));
                self.state.status = "Playlist failed to load".into();
            }
            NetworkEvent::LyricsArrived { request, lyrics } => {
                let transition = self.game.update(GameAction::LyricsArrived { request, lyrics });
                self.apply(transition, tx);
            }
        }
    }
}
