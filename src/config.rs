//! Application configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extensions imported when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "m4a", "wav"];

/// Configuration of a tunesync session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directories imported into the library at startup
    pub music_dirs: Vec<PathBuf>,

    /// Lowercase file extensions considered songs
    pub extensions: Vec<String>,

    /// Whether imports descend into subdirectories
    pub recursive: bool,

    /// Length of every track on the simulated device (None = tracks only
    /// end through the `end` command)
    pub track_length: Option<Duration>,
}

/// On-disk layout of the configuration file, every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    music_dirs: Vec<String>,
    extensions: Option<Vec<String>>,
    recursive: Option<bool>,
    track_seconds: Option<u64>,
}

impl AppConfig {
    /// Create a configuration with no music directories
    pub fn new() -> Self {
        Self {
            music_dirs: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: true,
            track_length: None,
        }
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a TOML configuration, expanding `~` in directories
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::new();

        config.music_dirs = file
            .music_dirs
            .iter()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
            .collect();
        if let Some(extensions) = file.extensions {
            config = config.with_extensions(extensions);
        }
        if let Some(recursive) = file.recursive {
            config.recursive = recursive;
        }
        if let Some(seconds) = file.track_seconds {
            config.track_length = Some(Duration::from_secs(seconds));
        }
        Ok(config)
    }

    /// Add directories to import
    pub fn with_music_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.music_dirs.extend(dirs);
        self
    }

    /// Replace the accepted extensions (case-insensitive, leading dot optional)
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Set the simulated track length
    pub fn with_track_length(mut self, length: Duration) -> Self {
        self.track_length = Some(length);
        self
    }

    /// Whether `path` has one of the accepted extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            })
            .unwrap_or(false)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
