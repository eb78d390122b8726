use anyhow::Context;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

pub const CACHE_FILE: &str = "cache.sqlite3";

/// Cached lyrics keyed on the song's lowercased title and artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLyrics {
    pub content: String,
    pub synced: bool,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS lyrics_cache (
  title_key TEXT NOT NULL,
  artist_key TEXT NOT NULL,
  lrc_content TEXT,
  synced INTEGER DEFAULT 0,
  fetched_at INTEGER NOT NULL,
  PRIMARY KEY (title_key, artist_key)
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    fn key(title: &str, artist: &str) -> (String, String) {
        (title.trim().to_lowercase(), artist.trim().to_lowercase())
    }

    /// Cache lyrics for a song
    pub fn cache_lyrics(
        &self,
        title: &str,
        artist: &str,
        lrc_content: &str,
        synced: bool,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        let (t, a) = Self::key(title, artist);
        self.conn
            .execute(
                r#"
INSERT INTO lyrics_cache(title_key, artist_key, lrc_content, synced, fetched_at)
VALUES(?1, ?2, ?3, ?4, ?5)
ON CONFLICT(title_key, artist_key) DO UPDATE SET
  lrc_content=excluded.lrc_content,
  synced=excluded.synced,
  fetched_at=excluded.fetched_at
"#,
                params![t, a, lrc_content, synced as i32, now_unix],
            )
            .context("cache lyrics")?;
        Ok(())
    }

    /// Get cached lyrics
    pub fn get_lyrics(&self, title: &str, artist: &str) -> anyhow::Result<Option<CachedLyrics>> {
        let (t, a) = Self::key(title, artist);
        let mut stmt = self
            .conn
            .prepare(
                "SELECT lrc_content, synced FROM lyrics_cache \
                 WHERE title_key=?1 AND artist_key=?2",
            )
            .context("prepare lyrics cache")?;
        let mut rows = stmt.query(params![t, a]).context("query lyrics cache")?;
        if let Some(row) = rows.next().context("read lyrics cache row")? {
            let content: Option<String> = row.get(0)?;
            let synced: i32 = row.get(1)?;
            Ok(content.map(|content| CachedLyrics {
                content,
                synced: synced != 0,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn count(&self) -> anyhow::Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lyrics_cache", [], |row| row.get(0))
            .context("count lyrics cache")?;
        Ok(n as u64)
    }

    pub fn clear(&self) -> anyhow::Result<u64> {
        let n = self
            .conn
            .execute("DELETE FROM lyrics_cache", [])
            .context("clear lyrics cache")?;
        Ok(n as u64)
    }
}

// rusqlite from async tasks: open per operation inside spawn_blocking.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    path: PathBuf,
}

impl StorageHandle {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CACHE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }

    pub fn get_lyrics(&self, title: &str, artist: &str) -> anyhow::Result<Option<CachedLyrics>> {
        self.open()?.get_lyrics(title, artist)
    }

    pub fn cache_lyrics(
        &self,
        title: &str,
        artist: &str,
        lrc_content: &str,
        synced: bool,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.open()?
            .cache_lyrics(title, artist, lrc_content, synced, now_unix)
    }

    pub fn count(&self) -> anyhow::Result<u64> {
        self.open()?.count()
    }

    pub fn clear(&self) -> anyhow::Result<u64> {
        self.open()?.clear()
    }
}

pub fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lyriguess-test-{}-{}-{}",
            name,
            std::process::id(),
            now_unix()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = temp_dir("cache");
        let storage = Storage::open(&dir.join(CACHE_FILE)).unwrap();

        assert_eq!(storage.get_lyrics("Song", "Artist").unwrap(), None);
        storage
            .cache_lyrics("Song", "Artist", "[00:01.00]hello", true, 100)
            .unwrap();

        let cached = storage.get_lyrics(" song ", "ARTIST").unwrap().unwrap();
        assert_eq!(cached.content, "[00:01.00]hello");
        assert!(cached.synced);

        storage.cache_lyrics("Song", "Artist", "hello", false, 200).unwrap();
        assert_eq!(storage.count().unwrap(), 1);
        assert!(!storage.get_lyrics("Song", "Artist").unwrap().unwrap().synced);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_handle_clear() {
        let dir = temp_dir("clear");
        let handle = StorageHandle::new(&dir);
        handle.cache_lyrics("A", "X", "a", false, 1).unwrap();
        handle.cache_lyrics("B", "Y", "b", false, 1).unwrap();
        assert_eq!(handle.count().unwrap(), 2);

        assert_eq!(handle.clear().unwrap(), 2);
        assert_eq!(handle.count().unwrap(), 0);
        assert!(handle.path().exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
