use super::song::Song;

/// Songs whose title or artist contains `input`, ignoring case, in playlist order.
pub fn suggest<'a>(songs: &'a [Song], input: &str, limit: usize) -> Vec<&'a Song> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    songs
        .iter()
        .filter(|s| {
            s.title.to_lowercase().contains(&needle) || s.artist.to_lowercase().contains(&needle)
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest() {
        let songs = vec![
            Song::new("Imagine", "John Lennon"),
            Song::new("Jealous Guy", "John Lennon"),
            Song::new("Yesterday", "The Beatles"),
        ];
        let titles = |v: Vec<&Song>| v.into_iter().map(|s| s.title.clone()).collect::<Vec<_>>();

        assert_eq!(titles(suggest(&songs, "john", 10)), vec!["Imagine", "Jealous Guy"]);
        assert_eq!(titles(suggest(&songs, "YEST", 10)), vec!["Yesterday"]);
        assert_eq!(titles(suggest(&songs, "john", 1)), vec!["Imagine"]);
        assert!(suggest(&songs, "   ", 10).is_empty());
        assert!(suggest(&songs, "zeppelin", 10).is_empty());
    }
}
