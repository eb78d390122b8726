mod app;
mod config;
mod game;
mod input;
mod lyrics;
mod playlist;
mod storage;
mod tui;
mod ytm;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lyriguess", version, about = "Guess the song from its lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Log at debug level regardless of config.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive game (default).
    Play {
        /// YouTube Music playlist URL/id or a .toml/.json song list.
        source: Option<String>,
    },
    /// Print a playlist's songs to stdout (headless).
    Songs { source: String },
    /// Print the lyric lines the game would use for a song (headless).
    Lyrics {
        title: String,
        artist: String,
        /// Print the unsanitized lines.
        #[arg(long)]
        raw: bool,
    },
    /// Lyrics cache management.
    Cache {
        #[command(subcommand)]
        cmd: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Show the cache location and entry count.
    Info,
    /// Remove every cached lyric.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let command = cli.command.unwrap_or(Command::Play { source: None });
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        cfg.log_level()
    };

    match command {
        Command::Play { source } => {
            init_file_logging(&cfg, level)?;
            let mut terminal = tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
            let mut app = app::App::new(cfg, source)?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Songs { source } => {
            init_stderr_logging(level);
            let source = playlist::PlaylistSource::parse(&source)?;
            let ytm = ytm::YtmClient::new(cfg.lyrics.timeout_secs)?;
            let playlist = playlist::load(&source, &ytm).await?;
            print_playlist(&playlist);
        }
        Command::Lyrics { title, artist, raw } => {
            init_stderr_logging(level);
            let service = app::lyrics_service(&cfg)?;
            match game::source::fetch_for(&service, &game::Song::new(&title, &artist)).await {
                Some(lines) => {
                    let lines = if raw { lines } else { game::sanitize::sanitize(&lines) };
                    for line in &lines {
                        println!("{}", line.text);
                    }
                }
                None => println!("No lyrics found for \"{title}\" by {artist}."),
            }
        }
        Command::Cache { cmd } => {
            init_stderr_logging(level);
            let handle = storage::StorageHandle::new(&cfg.paths.data_dir);
            match cmd {
                CacheCommand::Info => {
                    println!("{}", handle.path().display());
                    println!("{} cached lyrics", handle.count()?);
                }
                CacheCommand::Clear => {
                    let n = handle.clear()?;
                    println!("Removed {n} cached lyrics.");
                }
            }
        }
    }

    Ok(())
}

fn init_stderr_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// The TUI owns stdout.
fn init_file_logging(cfg: &config::Config, level: tracing::Level) -> anyhow::Result<()> {
    let path = cfg.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn print_playlist(playlist: &playlist::Playlist) {
    let info = &playlist.info;
    match &info.owner {
        Some(owner) => println!("{} (by {}, {} songs)", info.title, owner, info.count),
        None => println!("{} ({} songs)", info.title, info.count),
    }
    for (i, s) in playlist.songs.iter().enumerate() {
        let duration = s
            .duration_label()
            .map(|d| format!("  [{d}]"))
            .unwrap_or_default();
        println!("{:02}. {} - {}{}", i + 1, s.title, s.artist, duration);
    }
}
