//! Lyric retrieval for the game
//!
//! This module provides:
//! - LRCLIB API client for fetching lyrics
//! - LRC / plain text parser
//! - `LyricsService`, the cached `LyricsSource` used by the app and CLI

pub mod lrclib;
pub mod parser;

pub use lrclib::LrclibClient;
pub use parser::ParsedLyrics;

use crate::game::{LyricLine, LyricsSource, Song};
use crate::storage::{self, StorageHandle};

/// Get lyrics for a track
///
/// Plain lyrics keep the `[Chorus]`-style directives the sanitizer drops, so
/// they are preferred; synced lyrics are the fallback.
pub async fn fetch_lyrics(
    client: &LrclibClient,
    title: &str,
    artist: &str,
    album: Option<&str>,
    duration_secs: Option<u32>,
) -> anyhow::Result<Option<ParsedLyrics>> {
    let result = client.get_lyrics(title, artist, album, duration_secs).await?;

    if let Some(lyrics) = result {
        if lyrics.instrumental {
            return Ok(None);
        }
        if let Some(plain) = &lyrics.plain_lyrics
            && !plain.trim().is_empty()
        {
            return Ok(Some(ParsedLyrics::parse(plain, false)));
        }
        if let Some(synced) = &lyrics.synced_lyrics
            && !synced.trim().is_empty()
        {
            return Ok(Some(ParsedLyrics::parse(synced, true)));
        }
    }

    Ok(None)
}

/// LRCLIB backed by the SQLite cache.
#[derive(Debug, Clone)]
pub struct LyricsService {
    lrclib: LrclibClient,
    cache: Option<StorageHandle>,
}

impl LyricsService {
    pub fn new(lrclib: LrclibClient, cache: Option<StorageHandle>) -> Self {
        Self { lrclib, cache }
    }

    async fn cached(&self, title: &str, artist: &str) -> Option<ParsedLyrics> {
        let storage = self.cache.clone()?;
        let (t, a) = (title.to_string(), artist.to_string());
        match tokio::task::spawn_blocking(move || storage.get_lyrics(&t, &a)).await {
            Ok(Ok(Some(hit))) => Some(ParsedLyrics::parse(&hit.content, hit.synced)),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                tracing::warn!(error = %format!("{e:#}"), "lyrics cache read failed");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "lyrics cache task failed");
                None
            }
        }
    }

    async fn store(&self, title: &str, artist: &str, lyrics: &ParsedLyrics) {
        let Some(storage) = self.cache.clone() else {
            return;
        };
        let (t, a) = (title.to_string(), artist.to_string());
        let content = lyrics.to_lrc();
        let synced = lyrics.synced;
        let now = storage::now_unix();
        let outcome = tokio::task::spawn_blocking(move || {
            storage.cache_lyrics(&t, &a, &content, synced, now)
        })
        .await;
        cache_write_landed(outcome);
    }

    /// Cache first, then LRCLIB. Album and duration only narrow the exact
    /// match; the cache key stays title and artist.
    async fn lookup(
        &self,
        title: &str,
        artist: &str,
        album: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<Vec<LyricLine>>> {
        if let Some(hit) = self.cached(title, artist).await {
            tracing::debug!(title, artist, "lyrics cache hit");
            return Ok(Some(hit.lines));
        }

        let Some(parsed) = fetch_lyrics(&self.lrclib, title, artist, album, duration_secs).await?
        else {
            tracing::debug!(title, artist, "no lyrics on lrclib");
            return Ok(None);
        };

        self.store(title, artist, &parsed).await;
        Ok(Some(parsed.lines))
    }
}

/// Logs a failed background cache write. Returns whether the row was written.
fn cache_write_landed(outcome: Result<anyhow::Result<()>, tokio::task::JoinError>) -> bool {
    match outcome {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %format!("{e:#}"), "lyrics cache write failed");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "lyrics cache task failed");
            false
        }
    }
}

impl LyricsSource for LyricsService {
    async fn retrieve_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> anyhow::Result<Option<Vec<LyricLine>>> {
        self.lookup(title, artist, None, None).await
    }

    async fn retrieve_for(&self, song: &Song) -> anyhow::Result<Option<Vec<LyricLine>>> {
        self.lookup(&song.title, &song.artist, song.album.as_deref(), song.duration_secs)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CACHE_FILE;

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let dir = std::env::temp_dir().join(format!(
            "lyriguess-lyrics-{}-{}",
            std::process::id(),
            storage::now_unix()
        ));
        let handle = StorageHandle::new(&dir);
        handle
            .cache_lyrics("Imagine", "John Lennon", "[Verse]\nImagine\nno heaven", false, 1)
            .unwrap();
        assert!(dir.join(CACHE_FILE).exists());

        // Unroutable base url: any network access would fail the call.
        let client = LrclibClient::new("http://127.0.0.1:9", 1).unwrap();
        let service = LyricsService::new(client, Some(handle));

        let lines = service
            .retrieve_lyrics("imagine", "john lennon")
            .await
            .unwrap()
            .unwrap();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["[Verse]", "Imagine", "no heaven"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_cache_write_failures_are_reported() {
        assert!(cache_write_landed(Ok(Ok(()))));
        assert!(!cache_write_landed(Ok(Err(anyhow::anyhow!("disk full")))));

        let panicked = tokio::task::spawn_blocking(|| -> anyhow::Result<()> {
            panic!("cache writer died")
        })
        .await;
        assert!(panicked.is_err());
        assert!(!cache_write_landed(panicked));
    }

    #[tokio::test]
    async fn test_network_failure_is_an_error() {
        let client = LrclibClient::new("http://127.0.0.1:9", 1).unwrap();
        let service = LyricsService::new(client, None);
        assert!(service.retrieve_lyrics("A", "B").await.is_err());
    }
}
