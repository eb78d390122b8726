use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A candidate track.
///
/// Two songs are the same song when title and artist match; the optional
/// metadata never takes part in pool membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// 1-based position inside the source playlist.
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: None,
            id: None,
            position: None,
            duration_secs: None,
        }
    }

    /// The exact string a guess has to match.
    pub fn canonical(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }

    /// Duration formatted as `m:ss`.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_secs
            .map(|secs| format!("{}:{:02}", secs / 60, secs % 60))
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.artist == other.artist
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.artist.hash(state);
    }
}

/// One revealable unit of lyric text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub text: String,
    /// Offset from the start of the track, when the source was synced.
    #[serde(default)]
    pub time_ms: Option<u64>,
}

impl LyricLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time_ms: None,
        }
    }

    pub fn timed(time_ms: u64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time_ms: Some(time_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_metadata() {
        let mut a = Song::new("Imagine", "John Lennon");
        a.album = Some("Imagine".into());
        a.position = Some(3);
        let b = Song::new("Imagine", "John Lennon");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert_ne!(b, Song::new("Imagine", "A Perfect Circle"));
    }

    #[test]
    fn test_canonical_and_duration() {
        let mut s = Song::new("Imagine", "John Lennon");
        assert_eq!(s.canonical(), "Imagine - John Lennon");
        assert_eq!(s.duration_label(), None);
        s.duration_secs = Some(183);
        assert_eq!(s.duration_label().as_deref(), Some("3:03"));
    }
}
