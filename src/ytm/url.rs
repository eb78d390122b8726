//! Playlist URL validation and id extraction.

pub const INVALID_PLAYLIST_URL: &str = "Please enter a valid playlist URL";

const HOSTS: &[&str] = &[
    "music.youtube.com",
    "www.youtube.com",
    "youtube.com",
    "m.youtube.com",
];

const ID_PREFIXES: &[&str] = &["PL", "OLAK5uy_", "VL", "RD"];

/// Extract a playlist id from a YouTube Music / YouTube playlist URL or a bare id.
///
/// Accepts `https://music.youtube.com/playlist?list=ID` style URLs (the `watch`
/// page with a `list` parameter too) and bare ids with a known prefix.
pub fn playlist_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let Some(rest) = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
    else {
        return bare_id(input);
    };

    let (host, path_and_query) = rest.split_once('/')?;
    if !HOSTS.contains(&host.to_ascii_lowercase().as_str()) {
        return None;
    }

    let (path, query) = path_and_query.split_once('?')?;
    if path != "playlist" && path != "watch" {
        return None;
    }

    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "list")
        .map(|(_, v)| v)
        .filter(|v| is_id_chars(v))
        .map(|v| v.to_string())
}

fn bare_id(input: &str) -> Option<String> {
    (ID_PREFIXES.iter().any(|p| input.starts_with(p)) && is_id_chars(input) && input.len() > 2)
        .then(|| input.to_string())
}

fn is_id_chars(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Browse ids carry a `VL` prefix.
pub fn browse_id(playlist_id: &str) -> String {
    if playlist_id.starts_with("VL") {
        playlist_id.to_string()
    } else {
        format!("VL{playlist_id}")
    }
}
