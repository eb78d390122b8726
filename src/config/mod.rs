use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::game::DisplaySettings;

pub mod defaults;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "lyriguess";
const APPLICATION: &str = "lyriguess";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub game: GameConfig,
    pub lyrics: LyricsConfig,
    pub log: LogConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Starting values of the settings form.
    #[serde(flatten)]
    pub settings: DisplaySettings,
    /// Fixed RNG seed for reproducible rounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Keep fetched lyrics in `<data_dir>/cache.sqlite3`.
    pub cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Log file name inside `data_dir` for the interactive mode.
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let data_dir = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join(APPLICATION));
        Self { data_dir }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: crate::lyrics::LrclibClient::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            cache: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "lyriguess.log".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: false }
    }
}

impl Config {
    /// Clamp user-editable values into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.game.settings = self.game.settings.clamped();
        if self.lyrics.timeout_secs == 0 {
            self.lyrics.timeout_secs = LyricsConfig::default().timeout_secs;
        }
        self
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log.level.parse().unwrap_or(tracing::Level::INFO)
    }

    pub fn log_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.log.file)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

fn write_private(path: &Path, raw: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = defaults::defaults();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        write_private(&path, &raw)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg.normalized())
}
