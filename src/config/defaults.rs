use super::{Config, GameConfig, InputConfig, LogConfig, LyricsConfig, PathsConfig};
use crate::game::DisplaySettings;

/// The config written on first run.
pub fn defaults() -> Config {
    Config {
        paths: PathsConfig::default(),
        game: GameConfig {
            settings: DisplaySettings::default(),
            seed: None,
        },
        lyrics: LyricsConfig::default(),
        log: LogConfig::default(),
        input: InputConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_serialize_and_parse_back() {
        let raw = toml::to_string_pretty(&defaults()).unwrap();
        assert!(raw.contains("[game]"));
        assert!(raw.contains("number_of_songs = 5"));

        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.game.settings, DisplaySettings::default());
        assert_eq!(parsed.lyrics.timeout_secs, 10);
    }
}
