use crate::ytm::models::{PlaylistHeader, Track, YtmPlaylist};
use crate::ytm::url::browse_id;
use anyhow::Context;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Upper bound on continuation requests per playlist.
const MAX_PAGES: usize = 20;

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    bootstrap: OnceCell<Bootstrap>,
}

/// Anonymous YouTube Music InnerTube client (playlist browsing only).
#[derive(Debug, Clone)]
pub struct YtmClient {
    inner: Arc<Inner>,
}

#[derive(Debug, Clone)]
struct Bootstrap {
    api_key: String,
    client_version: String,
    visitor_data: Option<String>,
}

impl YtmClient {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static("https://music.youtube.com"));
        headers.insert(REFERER, HeaderValue::from_static("https://music.youtube.com/"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                bootstrap: OnceCell::new(),
            }),
        })
    }

    /// Fetch a playlist's header and every track, following continuations.
    pub async fn browse_playlist(&self, playlist_id: &str) -> anyhow::Result<YtmPlaylist> {
        let b = self.bootstrap().await?;

        let body = json!({
            "context": {
                "client": {
                    "clientName": "WEB_REMIX",
                    "clientVersion": b.client_version,
                }
            },
            "browseId": browse_id(playlist_id)
        });

        let v = self
            .post_json("browse", &b, &body)
            .await
            .context("browse playlist")?;

        let header = extract_header(&v);
        let mut tracks = extract_tracks(&v);
        let mut continuation = extract_continuation_token(&v);
        let mut pages = 1;

        while let Some(token) = continuation.take() {
            if pages >= MAX_PAGES {
                tracing::warn!(playlist_id, pages, "playlist truncated");
                break;
            }
            let body = json!({
                "context": {
                    "client": {
                        "clientName": "WEB_REMIX",
                        "clientVersion": b.client_version,
                    }
                },
                "continuation": token
            });
            let v = self
                .post_json("browse", &b, &body)
                .await
                .context("browse playlist continuation")?;
            let more = extract_tracks(&v);
            if more.is_empty() {
                break;
            }
            tracks.extend(more);
            continuation = extract_continuation_token(&v);
            pages += 1;
        }

        let tracks = dedupe(tracks);
        tracing::info!(playlist_id, tracks = tracks.len(), pages, "playlist fetched");

        Ok(YtmPlaylist {
            id: playlist_id.to_string(),
            header,
            tracks,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        b: &Bootstrap,
        body: &serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let v: serde_json::Value = self
            .innertube_post(path, b)
            .json(body)
            .send()
            .await
            .with_context(|| format!("send {path} request"))?
            .error_for_status()
            .with_context(|| format!("{path} http status"))?
            .json()
            .await
            .with_context(|| format!("parse {path} json"))?;
        Ok(v)
    }

    async fn bootstrap(&self) -> anyhow::Result<Bootstrap> {
        self.inner
            .bootstrap
            .get_or_try_init(|| async {
                let html = self
                    .inner
                    .http
                    .get("https://music.youtube.com/")
                    .send()
                    .await
                    .context("fetch music.youtube.com for bootstrap")?
                    .error_for_status()
                    .context("bootstrap http status")?
                    .text()
                    .await
                    .context("read bootstrap html")?;

                let api_key = parse_ytcfg_value(&html, "INNERTUBE_API_KEY")
                    .context("parse INNERTUBE_API_KEY")?;
                let client_version = parse_ytcfg_value(&html, "INNERTUBE_CLIENT_VERSION")
                    .context("parse INNERTUBE_CLIENT_VERSION")?;
                let visitor_data = parse_ytcfg_value(&html, "VISITOR_DATA");

                Ok(Bootstrap {
                    api_key,
                    client_version,
                    visitor_data,
                })
            })
            .await
            .cloned()
    }

    fn innertube_post(&self, path: &str, b: &Bootstrap) -> reqwest::RequestBuilder {
        let url = format!(
            "https://music.youtube.com/youtubei/v1/{path}?key={}&prettyPrint=false",
            b.api_key
        );

        let mut rb = self
            .inner
            .http
            .post(url)
            .header("X-Youtube-Client-Name", "67")
            .header("X-Youtube-Client-Version", b.client_version.as_str())
            .header("X-Youtube-Bootstrap-Logged-In", "false");

        if let Some(v) = b.visitor_data.as_deref() {
            rb = rb.header("X-Goog-Visitor-Id", v);
        }

        rb
    }
}

fn runs_text(v: Option<&serde_json::Value>) -> Option<String> {
    let text: String = v?
        .as_array()?
        .iter()
        .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
        .collect();
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Leading integer of texts like "1,234 songs" or "57 tracks".
fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn extract_header(v: &serde_json::Value) -> PlaylistHeader {
    let mut header = PlaylistHeader::default();
    scan_first(v, &mut |node| {
        let r = node
            .get("musicResponsiveHeaderRenderer")
            .or_else(|| node.get("musicDetailHeaderRenderer"))
            .or_else(|| node.get("musicEditablePlaylistDetailHeaderRenderer").and_then(|e| {
                e.pointer("/header/musicDetailHeaderRenderer")
            }))?;

        header.title = runs_text(r.pointer("/title/runs"));
        header.owner = runs_text(r.pointer("/straplineTextOne/runs"))
            .or_else(|| {
                r.pointer("/subtitle/runs")
                    .and_then(|x| x.as_array())
                    .and_then(|runs| {
                        // "Playlist • Owner • 2024": the owner is the middle run.
                        runs.iter()
                            .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
                            .filter(|t| t.trim() != "•")
                            .nth(1)
                            .map(|t| t.to_string())
                    })
            });
        header.description = runs_text(
            r.pointer("/description/musicDescriptionShelfRenderer/description/runs"),
        )
        .or_else(|| runs_text(r.pointer("/description/runs")));
        header.count = r
            .pointer("/secondSubtitle/runs")
            .and_then(|x| x.as_array())
            .and_then(|runs| {
                runs.iter()
                    .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
                    .find_map(parse_count)
            });
        Some(())
    });
    header
}

fn extract_tracks(v: &serde_json::Value) -> Vec<Track> {
    // Best-effort extraction; YouTube's structure changes often.
    // We scan for `musicResponsiveListItemRenderer` nodes that contain a `watchEndpoint.videoId`.
    let mut out = Vec::new();
    scan_value(v, &mut |node| {
        let r = node.get("musicResponsiveListItemRenderer")?;
        let video_id = extract_video_id_from_item(r)?;

        let title = r
            .pointer("/flexColumns/0/musicResponsiveListItemFlexColumnRenderer/text/runs/0/text")
            .and_then(|x| x.as_str())
            .unwrap_or("Unknown title")
            .to_string();

        let artists = r
            .pointer("/flexColumns/1/musicResponsiveListItemFlexColumnRenderer/text/runs")
            .and_then(|x| x.as_array())
            .map(|runs| {
                runs.iter()
                    .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
                    .map(str::trim)
                    .filter(|t| !matches!(*t, "" | "•" | "&" | ","))
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let album = r
            .pointer("/flexColumns/2/musicResponsiveListItemFlexColumnRenderer/text/runs/0/text")
            .and_then(|x| x.as_str())
            .map(|s| s.to_string());

        let duration_seconds = r
            .pointer("/fixedColumns/0/musicResponsiveListItemFixedColumnRenderer/text/runs/0/text")
            .and_then(|x| x.as_str())
            .and_then(parse_duration_text);

        Some(Track {
            video_id,
            title,
            artists,
            album,
            duration_seconds,
        })
    }, &mut out);
    out
}

fn dedupe(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| seen.insert(t.video_id.clone()))
        .collect()
}

/// Parse duration text like "3:45" or "1:23:45" into seconds
fn parse_duration_text(text: &str) -> Option<u32> {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.len() {
        2 => {
            let mins: u32 = parts[0].parse().ok()?;
            let secs: u32 = parts[1].parse().ok()?;
            mins.checked_mul(60)?.checked_add(secs)
        }
        3 => {
            let hours: u32 = parts[0].parse().ok()?;
            let mins: u32 = parts[1].parse().ok()?;
            let secs: u32 = parts[2].parse().ok()?;
            hours
                .checked_mul(3600)?
                .checked_add(mins.checked_mul(60)?)?
                .checked_add(secs)
        }
        _ => None,
    }
}

fn extract_video_id_from_item(r: &serde_json::Value) -> Option<String> {
    // Seen variants:
    // - musicResponsiveListItemRenderer.playlistItemData.videoId
    // - musicResponsiveListItemRenderer.navigationEndpoint.watchEndpoint.videoId
    // - musicResponsiveListItemRenderer.flexColumns[0]...runs[0].navigationEndpoint.watchEndpoint.videoId
    r.pointer("/playlistItemData/videoId")
        .or_else(|| r.pointer("/navigationEndpoint/watchEndpoint/videoId"))
        .or_else(|| {
            r.pointer(
                "/flexColumns/0/musicResponsiveListItemFlexColumnRenderer/text/runs/0/navigationEndpoint/watchEndpoint/videoId",
            )
        })
        .and_then(|x| x.as_str())
        .map(|s| s.to_string())
}

fn parse_ytcfg_value(html: &str, key: &str) -> Option<String> {
    // We look for `"KEY":"value"` occurrences in the initial HTML ytcfg payload.
    let needle = format!("{key}\":\"");
    let idx = html.find(&needle)?;
    let start = idx + needle.len();
    let rest = &html[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn scan_value<F>(v: &serde_json::Value, f: &mut F, out: &mut Vec<Track>)
where
    F: FnMut(&serde_json::Value) -> Option<Track>,
{
    if let Some(t) = f(v) {
        out.push(t);
    }
    match v {
        serde_json::Value::Array(a) => {
            for x in a {
                scan_value(x, f, out);
            }
        }
        serde_json::Value::Object(o) => {
            for (_, x) in o {
                scan_value(x, f, out);
            }
        }
        _ => {}
    }
}

/// Depth-first search stopping at the first node `f` accepts.
fn scan_first<F>(v: &serde_json::Value, f: &mut F) -> bool
where
    F: FnMut(&serde_json::Value) -> Option<()>,
{
    if f(v).is_some() {
        return true;
    }
    match v {
        serde_json::Value::Array(a) => a.iter().any(|x| scan_first(x, f)),
        serde_json::Value::Object(o) => o.values().any(|x| scan_first(x, f)),
        _ => false,
    }
}

fn extract_continuation_token(v: &serde_json::Value) -> Option<String> {
    // Playlist pages carry either
    // - ...continuations[0].nextContinuationData.continuation, or
    // - a trailing continuationItemRenderer.continuationEndpoint.continuationCommand.token
    let mut token: Option<String> = None;

    scan_first(v, &mut |node| {
        let found = node
            .get("nextContinuationData")
            .and_then(|c| c.get("continuation"))
            .or_else(|| {
                node.get("continuationEndpoint")
                    .and_then(|c| c.get("continuationCommand"))
                    .and_then(|c| c.get("token"))
            })
            .and_then(|c| c.as_str())?;
        token = Some(found.to_string());
        Some(())
    });

    token
}
