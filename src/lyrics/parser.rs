//! LRC / plain text lyric parser
//!
//! Synced lyrics carry `[mm:ss.xx]` stamps:
//! [00:12.34] Hello world
//! [00:15.00] Another line
//!
//! Plain lyrics are split line by line and kept verbatim, blank lines and
//! `[Chorus]` directives included; the game's sanitizer decides what is shown.

use crate::game::LyricLine;

/// Parsed lyrics with metadata
#[derive(Debug, Clone)]
pub struct ParsedLyrics {
    pub lines: Vec<LyricLine>,
    /// Whether the lines carry timestamps
    pub synced: bool,
}

impl ParsedLyrics {
    pub fn parse(content: &str, synced: bool) -> Self {
        if !synced {
            let lines = content.lines().map(|l| LyricLine::new(l.trim_end())).collect();
            return Self { lines, synced };
        }

        // Sort key per line; an untimed line rides on the stamp before it.
        let mut keyed: Vec<(u64, LyricLine)> = Vec::new();
        let mut last_ms = 0;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Skip metadata tags like [ti:Title]
            if Self::parse_metadata(line).is_some() {
                continue;
            }

            if let Some(parsed) = Self::parse_timed_line(line) {
                if let Some(first) = parsed.first().and_then(|l| l.time_ms) {
                    last_ms = first;
                }
                keyed.extend(parsed.into_iter().map(|l| (l.time_ms.unwrap_or(last_ms), l)));
                continue;
            }

            keyed.push((last_ms, LyricLine::new(line)));
        }

        keyed.sort_by_key(|(ms, _)| *ms);
        let lines = keyed.into_iter().map(|(_, l)| l).collect();

        Self { lines, synced }
    }

    /// Serialize back to LRC (or plain text) for the cache.
    pub fn to_lrc(&self) -> String {
        self.lines
            .iter()
            .map(|l| match (self.synced, l.time_ms) {
                (true, Some(ms)) => {
                    let min = ms / 60000;
                    let sec = (ms % 60000) / 1000;
                    let cs = (ms % 1000) / 10;
                    format!("[{:02}:{:02}.{:02}]{}", min, sec, cs, l.text)
                }
                _ => l.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse metadata tag like [ti:Title]
    fn parse_metadata(line: &str) -> Option<(String, String)> {
        if !line.starts_with('[') || !line.contains(':') {
            return None;
        }

        let end = line.find(']')?;
        let tag_content = &line[1..end];

        let colon_pos = tag_content.find(':')?;
        let tag = &tag_content[..colon_pos];

        // Metadata tags are typically 2-3 chars
        if tag.len() <= 3 && tag.chars().all(|c| c.is_ascii_alphabetic()) {
            let value = tag_content[colon_pos + 1..].trim().to_string();
            return Some((tag.to_string(), value));
        }

        None
    }

    /// Parse a timed line like [00:12.34]Lyrics or [00:12.34][00:15.00]Lyrics
    fn parse_timed_line(line: &str) -> Option<Vec<LyricLine>> {
        let mut timestamps = Vec::new();
        let mut pos = 0;

        while pos < line.len() && line[pos..].starts_with('[') {
            let Some(end) = line[pos..].find(']') else {
                break;
            };
            match Self::parse_timestamp(&line[pos + 1..pos + end]) {
                Some(ms) => {
                    timestamps.push(ms);
                    pos += end + 1;
                }
                None => break,
            }
        }

        if timestamps.is_empty() {
            return None;
        }

        let text = line[pos..].trim();
        Some(
            timestamps
                .into_iter()
                .map(|ts| LyricLine::timed(ts, text))
                .collect(),
        )
    }

    /// Parse timestamp string like "00:12.34" or "00:12:34" to milliseconds
    fn parse_timestamp(s: &str) -> Option<u64> {
        let parts: Vec<&str> = s.split([':', '.']).collect();

        match parts.len() {
            2 => {
                let min: u64 = parts[0].parse().ok()?;
                let sec: u64 = parts[1].parse().ok()?;
                Some(min * 60 * 1000 + sec * 1000)
            }
            3 => {
                let min: u64 = parts[0].parse().ok()?;
                let sec: u64 = parts[1].parse().ok()?;
                let ms_str = parts[2];
                // Handle both "34" (centiseconds) and "340" (milliseconds)
                let ms: u64 = match ms_str.len() {
                    1 => ms_str.parse::<u64>().ok()? * 100,
                    2 => ms_str.parse::<u64>().ok()? * 10,
                    3 => ms_str.parse().ok()?,
                    _ => return None,
                };
                Some(min * 60 * 1000 + sec * 1000 + ms)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::sanitize::sanitize;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(ParsedLyrics::parse_timestamp("00:12"), Some(12000));
        assert_eq!(ParsedLyrics::parse_timestamp("01:30"), Some(90000));
        assert_eq!(ParsedLyrics::parse_timestamp("00:12.34"), Some(12340));
        assert_eq!(ParsedLyrics::parse_timestamp("00:12.340"), Some(12340));
        assert_eq!(ParsedLyrics::parse_timestamp("00:12:34"), Some(12340));
        assert_eq!(ParsedLyrics::parse_timestamp("Chorus"), None);
    }

    #[test]
    fn test_parse_lrc() {
        let lrc = r#"
[ti:Test Song]
[ar:Test Artist]
[00:15.00]Second line
[00:12.34]First line
[00:20.00][00:40.00]Repeated
"#;
        let parsed = ParsedLyrics::parse(lrc, true);
        assert_eq!(parsed.lines.len(), 4);
        assert_eq!(parsed.lines[0], LyricLine::timed(12340, "First line"));
        assert_eq!(parsed.lines[1].text, "Second line");
        assert_eq!(parsed.lines[3], LyricLine::timed(40000, "Repeated"));
    }

    #[test]
    fn test_untimed_line_stays_after_its_neighbour() {
        let parsed = ParsedLyrics::parse("[00:10.00]first\nspoken aside\n[00:20.00]second", true);
        let order: Vec<&str> = parsed.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(order, vec!["first", "spoken aside", "second"]);
        assert_eq!(parsed.lines[1].time_ms, None);

        let parsed = ParsedLyrics::parse("intro\n[00:15.00]b\nafter b\n[00:12.00]a", true);
        let order: Vec<&str> = parsed.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(order, vec!["intro", "a", "b", "after b"]);

        let cached = ParsedLyrics::parse(&parsed.to_lrc(), true);
        assert_eq!(cached.lines, parsed.lines);
    }

    #[test]
    fn test_plain_keeps_everything_for_the_sanitizer() {
        let plain = "[Verse 1]\nFirst\n\nSecond  \n[Chorus]";
        let parsed = ParsedLyrics::parse(plain, false);
        assert_eq!(parsed.lines.len(), 5);
        assert_eq!(parsed.lines[3].text, "Second");

        let shown: Vec<String> = sanitize(&parsed.lines).into_iter().map(|l| l.text).collect();
        assert_eq!(shown, vec!["First", "Second"]);
    }

    #[test]
    fn test_to_lrc_round_trip() {
        let lrc = "[00:01.50]one\n[01:02.03]two";
        let parsed = ParsedLyrics::parse(lrc, true);
        assert_eq!(parsed.to_lrc(), lrc);

        let plain = ParsedLyrics::parse("a\nb", false);
        assert_eq!(plain.to_lrc(), "a\nb");
    }
}
