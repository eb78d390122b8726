use crate::game::Song;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub video_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<u32>,
}

impl Track {
    pub fn artist_line(&self) -> String {
        if self.artists.is_empty() {
            "Unknown artist".to_string()
        } else {
            self.artists.join(", ")
        }
    }

    /// `position` is 1-based.
    pub fn into_song(self, position: u32) -> Song {
        let artist = self.artist_line();
        Song {
            title: self.title,
            artist,
            album: self.album,
            id: Some(self.video_id),
            position: Some(position),
            duration_secs: self.duration_seconds,
        }
    }
}

/// Header fields shown above a playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistHeader {
    pub title: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub count: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct YtmPlaylist {
    pub id: String,
    pub header: PlaylistHeader,
    pub tracks: Vec<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_song() {
        let t = Track {
            video_id: "abc".into(),
            title: "Imagine".into(),
            artists: vec!["John Lennon".into(), "Plastic Ono Band".into()],
            album: Some("Imagine".into()),
            duration_seconds: Some(183),
        };
        let s = t.into_song(3);
        assert_eq!(s.canonical(), "Imagine - John Lennon, Plastic Ono Band");
        assert_eq!(s.position, Some(3));
        assert_eq!(s.id.as_deref(), Some("abc"));

        let t = Track {
            video_id: "x".into(),
            title: "Untitled".into(),
            artists: vec![],
            album: None,
            duration_seconds: None,
        };
        assert_eq!(t.into_song(1).artist, "Unknown artist");
    }
}
