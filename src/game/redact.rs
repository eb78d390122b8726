use super::song::LyricLine;
use regex::RegexBuilder;

pub const PLACEHOLDER: &str = "...";

/// Replace every case-insensitive occurrence of `title` with [`PLACEHOLDER`].
///
/// The title is matched literally. With `enabled == false` or an empty title
/// the lines come back unchanged.
pub fn redact(lines: &[LyricLine], title: &str, enabled: bool) -> Vec<LyricLine> {
    let title = title.trim();
    if !enabled || title.is_empty() {
        return lines.to_vec();
    }

    let Ok(re) = RegexBuilder::new(&regex::escape(title))
        .case_insensitive(true)
        .build()
    else {
        tracing::warn!(title, "title pattern rejected, lyrics left unredacted");
        return lines.to_vec();
    };

    lines
        .iter()
        .map(|l| LyricLine {
            text: re.replace_all(&l.text, PLACEHOLDER).into_owned(),
            time_ms: l.time_ms,
        })
        .collect()
}
