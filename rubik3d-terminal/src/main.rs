/// rubik3d - an interactive 3x3 cube in the terminal
///
/// Controls:
///   - Arrow keys / mouse drag: rotate the view
///   - f b l r u d: turn a face clockwise (uppercase for counter-clockwise)
///   - +/-: zoom, C: reset, X: scramble
///   - Q/ESC: quit
use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use rubik3d_core::Config;
use rubik3d_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML configuration file; defaults are used for anything it omits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where log output goes (the screen belongs to the cube)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for reproducible scrambles
    #[arg(long)]
    seed: Option<u64>,

    /// Scramble with this many moves before starting
    #[arg(long)]
    scramble: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = args
        .log_file
        .unwrap_or_else(|| std::env::temp_dir().join("rubik3d.log"));
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting rubik3d...");

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let mut app = TerminalApp::new(config, args.seed).context("Failed to query terminal size")?;
    if let Some(moves) = args.scramble {
        app.scramble(moves);
    }

    app.run().context("Terminal session failed")?;

    info!("rubik3d exited cleanly");
    Ok(())
}
