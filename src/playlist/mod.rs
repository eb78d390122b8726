//! Playlist retrieval: YouTube Music playlists or local song lists.
//!
//! A local file is TOML or JSON:
//!
//! ```toml
//! title = "Road Trip"
//! owner = "me"
//!
//! [[songs]]
//! title = "Imagine"
//! artist = "John Lennon"
//! duration = "3:03"
//! ```

use crate::game::Song;
use crate::ytm::models::YtmPlaylist;
use crate::ytm::url::{INVALID_PLAYLIST_URL, playlist_id};
use crate::ytm::YtmClient;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSource {
    YouTube(String),
    File(PathBuf),
}

impl PlaylistSource {
    /// A `.toml`/`.json` path or an existing file is local; anything else must be
    /// a YouTube Music playlist URL or id.
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let path = Path::new(input);
        let has_list_ext = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("toml" | "json")
        );
        if has_list_ext || path.is_file() {
            return Ok(Self::File(path.to_path_buf()));
        }
        match playlist_id(input) {
            Some(id) => Ok(Self::YouTube(id)),
            None => anyhow::bail!(INVALID_PLAYLIST_URL),
        }
    }

    pub fn label(&self) -> String {
        match self {
            PlaylistSource::YouTube(id) => id.clone(),
            PlaylistSource::File(p) => p.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistInfo {
    pub title: String,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct Playlist {
    pub info: PlaylistInfo,
    pub songs: Vec<Song>,
}

impl Playlist {
    fn from_ytm(p: YtmPlaylist) -> Self {
        let songs: Vec<Song> = p
            .tracks
            .into_iter()
            .zip(1u32..)
            .map(|(t, pos)| t.into_song(pos))
            .collect();
        let info = PlaylistInfo {
            title: p.header.title.unwrap_or(p.id),
            owner: p.header.owner,
            description: p.header.description,
            count: p.header.count.map(|c| c as usize).unwrap_or(songs.len()),
        };
        Self { info, songs }
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistFile {
    title: Option<String>,
    owner: Option<String>,
    description: Option<String>,
    #[serde(default)]
    songs: Vec<FileSong>,
}

#[derive(Debug, Deserialize)]
struct FileSong {
    title: String,
    artist: String,
    album: Option<String>,
    /// "m:ss" or plain seconds
    duration: Option<DurationField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationField {
    Seconds(u32),
    Text(String),
}

impl DurationField {
    fn seconds(&self) -> Option<u32> {
        match self {
            DurationField::Seconds(s) => Some(*s),
            DurationField::Text(t) => {
                let (m, s) = t.trim().split_once(':')?;
                m.parse::<u32>()
                    .ok()?
                    .checked_mul(60)?
                    .checked_add(s.parse().ok()?)
            }
        }
    }
}

pub fn parse_file(raw: &str, path: &Path) -> anyhow::Result<Playlist> {
    let file: PlaylistFile = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(raw)
            .with_context(|| format!("parse playlist json {}", path.display()))?,
        _ => toml::from_str(raw).with_context(|| format!("parse playlist {}", path.display()))?,
    };

    let songs: Vec<Song> = file
        .songs
        .into_iter()
        .zip(1u32..)
        .filter(|(s, _)| !s.title.trim().is_empty() && !s.artist.trim().is_empty())
        .map(|(s, pos)| Song {
            duration_secs: s.duration.as_ref().and_then(DurationField::seconds),
            title: s.title.trim().to_string(),
            artist: s.artist.trim().to_string(),
            album: s.album,
            id: None,
            position: Some(pos),
        })
        .collect();

    let title = file.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Playlist".to_string())
    });

    Ok(Playlist {
        info: PlaylistInfo {
            title,
            owner: file.owner,
            description: file.description,
            count: songs.len(),
        },
        songs,
    })
}

pub fn load_file(path: &Path) -> anyhow::Result<Playlist> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_file(&raw, path)
}

/// Resolve a source into its full song list.
pub async fn load(source: &PlaylistSource, ytm: &YtmClient) -> anyhow::Result<Playlist> {
    let playlist = match source {
        PlaylistSource::File(path) => load_file(path)?,
        PlaylistSource::YouTube(id) => Playlist::from_ytm(ytm.browse_playlist(id).await?),
    };
    if playlist.songs.is_empty() {
        anyhow::bail!("playlist {} has no songs", source.label());
    }
    tracing::info!(
        title = %playlist.info.title,
        songs = playlist.songs.len(),
        "playlist loaded"
    );
    Ok(playlist)
}
