use crate::game::LyricLine;
use crate::game::selector::RequestId;
use crate::playlist::Playlist;

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Network(NetworkEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    PlaylistLoaded { source: String, playlist: Playlist },
    PlaylistFailed { source: String, error: String },
    LyricsArrived {
        request: RequestId,
        lyrics: Option<Vec<LyricLine>>,
    },
}
