//! Line-oriented command shell over a [`MediaCenter`]

use crate::center::MediaCenter;
use crate::config::AppConfig;
use crate::model::PlaybackOwner;
use crate::player::SimulatedDevice;
use anyhow::{bail, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "\
Library:
  add <file>          add a song file
  import <dir>        add every song file under a directory
  select <n>          select library song n
  remove              remove the selected song everywhere
  play | stop         play the selected song / stop library playback
  rate+ | rate-       change the selected song's rating
  find <regex>        search song metadata
  list                show the library
Playlists:
  pl-create <name>    create a playlist and select it
  pl-select <n>       select playlist n
  pl-remove           remove the selected playlist
  pl-add              add the selected library song to the selected playlist
  pl-song <n>         select song n of the selected playlist
  pl-drop             remove the selected song from the selected playlist
  pl-next | pl-prev   move the playlist's song selection
  pl-up <n>           move the selected song up to position n
  pl-play | pl-stop   play / stop the selected playlist
  playlists           show every playlist
Device:
  end                 let the current track end
  interrupt           stop the device from its side
  status              show what is playing
help, quit";

/// Parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(PathBuf),
    Import(PathBuf),
    Select(usize),
    Remove,
    Play,
    Stop,
    RateUp,
    RateDown,
    Find(String),
    List,
    PlaylistCreate(String),
    PlaylistSelect(usize),
    PlaylistRemove,
    PlaylistAdd,
    PlaylistSong(usize),
    PlaylistDrop,
    PlaylistNext,
    PlaylistPrevious,
    PlaylistUp(usize),
    PlaylistPlay,
    PlaylistStop,
    Playlists,
    End,
    Interrupt,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' expects an argument")]
    MissingArgument(String),

    #[error("'{command}' expects an index, got '{value}'")]
    InvalidIndex { command: String, value: String },
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let argument = || {
            if rest.is_empty() {
                Err(ParseError::MissingArgument(name.to_string()))
            } else {
                Ok(rest.to_string())
            }
        };
        let index = || {
            let value = argument()?;
            value.parse::<usize>().map_err(|_| ParseError::InvalidIndex {
                command: name.to_string(),
                value,
            })
        };

        let command = match name {
            "" => return Err(ParseError::Empty),
            "add" => Command::Add(PathBuf::from(argument()?)),
            "import" => Command::Import(PathBuf::from(argument()?)),
            "select" => Command::Select(index()?),
            "remove" => Command::Remove,
            "play" => Command::Play,
            "stop" => Command::Stop,
            "rate+" => Command::RateUp,
            "rate-" => Command::RateDown,
            "find" => Command::Find(argument()?),
            "list" => Command::List,
            "pl-create" => Command::PlaylistCreate(argument()?),
            "pl-select" => Command::PlaylistSelect(index()?),
            "pl-remove" => Command::PlaylistRemove,
            "pl-add" => Command::PlaylistAdd,
            "pl-song" => Command::PlaylistSong(index()?),
            "pl-drop" => Command::PlaylistDrop,
            "pl-next" => Command::PlaylistNext,
            "pl-prev" => Command::PlaylistPrevious,
            "pl-up" => Command::PlaylistUp(index()?),
            "pl-play" => Command::PlaylistPlay,
            "pl-stop" => Command::PlaylistStop,
            "playlists" => Command::Playlists,
            "end" => Command::End,
            "interrupt" => Command::Interrupt,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// What the shell does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs commands against a media center driving a simulated device
pub struct Shell<'a> {
    center: &'a MediaCenter,
    device: &'a SimulatedDevice,
    config: &'a AppConfig,
}

impl<'a> Shell<'a> {
    pub fn new(center: &'a MediaCenter, device: &'a SimulatedDevice, config: &'a AppConfig) -> Self {
        Self {
            center,
            device,
            config,
        }
    }

    /// Execute commands line by line until `quit` or end of input.
    ///
    /// Blank lines and `#` comments are skipped; a failing command is
    /// reported on `out` and the shell goes on.
    pub fn run(&self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            log::debug!("> {}", line);

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    continue;
                }
            };
            match self.execute(command, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {:#}", e)?,
            }
        }
        Ok(())
    }

    pub fn execute(&self, command: Command, out: &mut impl Write) -> Result<Flow> {
        let center = self.center;
        match command {
            Command::Add(path) => {
                let song = center.add_song(&path)?;
                writeln!(out, "added {}", song)?;
            }
            Command::Import(dir) => {
                let added = center.import_dir(&dir, self.config)?;
                writeln!(out, "imported {} song(s)", added)?;
            }
            Command::Select(index) => center.select_song(index)?,
            Command::Remove => match center.remove_selected_song() {
                Some(song) => writeln!(out, "removed {}", song)?,
                None => bail!("no song selected"),
            },
            Command::Play => {
                if !center.play_song() {
                    bail!("no song selected");
                }
            }
            Command::Stop => center.stop_song(),
            Command::RateUp => match center.inc_rate_selected() {
                Some(rating) => writeln!(out, "rating {}", rating)?,
                None => bail!("no song selected"),
            },
            Command::RateDown => match center.dec_rate_selected() {
                Some(rating) => writeln!(out, "rating {}", rating)?,
                None => bail!("no song selected"),
            },
            Command::Find(pattern) => {
                for song in center.find_songs(&pattern)? {
                    writeln!(out, "{}", song)?;
                }
            }
            Command::List => write!(out, "{}", center.render_library())?,
            Command::PlaylistCreate(name) => {
                center.create_playlist(&name);
            }
            Command::PlaylistSelect(index) => center.select_playlist(index)?,
            Command::PlaylistRemove => {
                if !center.remove_playlist() {
                    bail!("no playlist selected");
                }
            }
            Command::PlaylistAdd => {
                if !center.add_selected_song_to_playlist()? {
                    writeln!(out, "song not added")?;
                }
            }
            Command::PlaylistSong(index) => center.select_playlist_song(index)?,
            Command::PlaylistDrop => {
                if !center.remove_selected_playlist_song()? {
                    writeln!(out, "nothing removed")?;
                }
            }
            Command::PlaylistNext => center.next_playlist_song()?,
            Command::PlaylistPrevious => center.previous_playlist_song()?,
            Command::PlaylistUp(target) => {
                if !center.move_up_selected(target)? {
                    writeln!(out, "song not moved")?;
                }
            }
            Command::PlaylistPlay => {
                if !center.play_playlist()? {
                    bail!("no playlist song selected");
                }
            }
            Command::PlaylistStop => center.stop_playlist()?,
            Command::Playlists => write!(out, "{}", center.render_playlists())?,
            Command::End => {
                if !self.device.finish() {
                    writeln!(out, "nothing is playing")?;
                }
            }
            Command::Interrupt => {
                if !self.device.interrupt() {
                    writeln!(out, "nothing is playing")?;
                }
            }
            Command::Status => match center.now_playing() {
                Some((PlaybackOwner::Library, song)) => {
                    writeln!(out, "library playing {}", song)?
                }
                Some((PlaybackOwner::Playlist(_), song)) => {
                    writeln!(out, "playlist playing {}", song)?
                }
                None => writeln!(out, "stopped")?,
            },
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
