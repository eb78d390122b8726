use super::song::Song;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing but whitespace was submitted.
    Rejected,
    Correct,
    Incorrect,
}

/// Strict comparison against `"{title} - {artist}"` after trimming the input.
/// Case matters; suggestions are expected to fill in the exact string.
pub fn judge(input: &str, song: &Song) -> Verdict {
    let guess = input.trim();
    if guess.is_empty() {
        Verdict::Rejected
    } else if guess == song.canonical() {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
