//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API serving plain and synchronized (LRC) lyrics.
//! API Documentation: https://lrclib.net/docs

use anyhow::Context;
use serde::Deserialize;

/// LRCLIB API response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LrclibResponse {
    pub track_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

impl LrclibResponse {
    fn has_text(&self) -> bool {
        !self.instrumental
            && (self.plain_lyrics.as_deref().is_some_and(|s| !s.trim().is_empty())
                || self.synced_lyrics.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str = concat!("lyriguess/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("build lrclib http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Exact match first, then search.
    pub async fn get_lyrics(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        if let Some(lyrics) = self
            .get_exact(track_name, artist_name, album_name, duration_secs)
            .await?
            && lyrics.has_text()
        {
            return Ok(Some(lyrics));
        }

        self.search(track_name, artist_name).await
    }

    async fn get_exact(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: Option<&str>,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let url = self.exact_url(track_name, artist_name, album_name, duration_secs);
        let response = self.client.get(&url).send().await.context("send lrclib get")?;

        if response.status().is_success() {
            let lyrics: LrclibResponse = response.json().await.context("parse lrclib get json")?;
            Ok(Some(lyrics))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB API error: {}", response.status());
        }
    }

    fn exact_url(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: Option<&str>,
        duration_secs: Option<u32>,
    ) -> String {
        let mut url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        );

        if let Some(album) = album_name {
            url.push_str(&format!("&album_name={}", urlencoding::encode(album)));
        }

        if let Some(duration) = duration_secs {
            url.push_str(&format!("&duration={}", duration));
        }

        url
    }

    async fn search(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let url = format!(
            "{}/search?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        );

        let response = self.client.get(&url).send().await.context("send lrclib search")?;

        if response.status().is_success() {
            let results: Vec<LrclibResponse> =
                response.json().await.context("parse lrclib search json")?;
            Ok(pick_best(results, track_name))
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB search error: {}", response.status());
        }
    }
}

/// Prefer an exact title match with plain lyrics, then any result with text.
fn pick_best(results: Vec<LrclibResponse>, track_name: &str) -> Option<LrclibResponse> {
    let usable: Vec<LrclibResponse> = results.into_iter().filter(|r| r.has_text()).collect();
    let exact = |r: &&LrclibResponse| r.track_name.eq_ignore_ascii_case(track_name);

    usable
        .iter()
        .filter(exact)
        .find(|r| r.plain_lyrics.is_some())
        .or_else(|| usable.iter().find(exact))
        .or_else(|| usable.first())
        .cloned()
}
