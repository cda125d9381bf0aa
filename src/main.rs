use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tunesync::metadata::{FileNameExtractor, LoftyExtractor, MetadataExtractor};
use tunesync::player::SimulatedDevice;
use tunesync::shell::Shell;
use tunesync::{AppConfig, MediaCenter};

#[derive(Parser, Debug)]
#[command(name = "tunesync")]
#[command(about = "Music library with self-maintaining playlists", long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Music directory to import at startup (can be specified multiple times)
    #[arg(short = 'm', long = "music-dir")]
    music_dirs: Vec<String>,

    /// End every simulated track after this many seconds
    #[arg(short = 't', long)]
    track_seconds: Option<u64>,

    /// Derive metadata from file names instead of reading tags
    #[arg(long)]
    no_tags: bool,

    /// Read commands from this file instead of standard input
    #[arg(short = 's', long)]
    script: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // File values first, flags on top
    let mut config = match &args.config {
        Some(path) => AppConfig::load(&PathBuf::from(shellexpand::tilde(path).as_ref()))?,
        None => AppConfig::new(),
    };
    config = config.with_music_dirs(
        args.music_dirs
            .iter()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref())),
    );
    if let Some(seconds) = args.track_seconds {
        config = config.with_track_length(Duration::from_secs(seconds));
    }

    let mut device = SimulatedDevice::new();
    if let Some(length) = config.track_length {
        log::info!("Simulated tracks last {:?}", length);
        device = device.with_track_length(length);
    }

    let extractor: Box<dyn MetadataExtractor> = if args.no_tags {
        Box::new(FileNameExtractor::new())
    } else {
        Box::new(LoftyExtractor::new())
    };
    let center = MediaCenter::new(Arc::new(device.clone()), extractor);

    for dir in &config.music_dirs {
        center
            .import_dir(dir, &config)
            .with_context(|| format!("Failed to import {:?}", dir))?;
    }
    log::info!(
        "Library ready: {} songs, {} playlists",
        center.number_of_songs(),
        center.number_of_playlists()
    );

    let shell = Shell::new(&center, &device, &config);
    let mut stdout = io::stdout().lock();
    match &args.script {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open script: {:?}", path))?;
            shell.run(BufReader::new(file), &mut stdout)?;
        }
        None => shell.run(io::stdin().lock(), &mut stdout)?,
    }

    Ok(())
}
