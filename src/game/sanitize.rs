//! Lyric transcript cleanup.
//!
//! Drops blank lines and lines that are nothing but a bracketed directive
//! (`[Chorus]`, `[Verse 2: Artist]`). Brackets inside a sung line are kept.

use super::song::LyricLine;

/// Keep the displayable lines, in source order.
pub fn sanitize(lines: &[LyricLine]) -> Vec<LyricLine> {
    lines.iter().filter(|l| is_displayable(&l.text)).cloned().collect()
}

fn is_displayable(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !is_annotation(trimmed)
}

/// One `[...]` pair spanning the whole trimmed line.
fn is_annotation(trimmed: &str) -> bool {
    trimmed.starts_with('[') && trimmed.find(']') == Some(trimmed.len() - 1)
}
