//! Media center: the library, its playlists and the device wired together
//!
//! Caller operations and device notifications all go through one mutex, so
//! a track ending on the device thread never interleaves with a mutation
//! coming from the shell. Playlists are only reachable through the center:
//! readers get snapshots, never the playlists themselves.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::metadata::{LoftyExtractor, MetadataExtractor};
use crate::model::{Library, PlaybackOwner, Rating, Song, SongRef};
use crate::player::{DeviceEvent, PlaybackDevice};
use crate::playlist::PlaylistCollection;
use parking_lot::Mutex;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

struct CenterState {
    library: Library,
    playlists: PlaylistCollection,
}

impl CenterState {
    fn dispatch(&mut self, event: DeviceEvent) {
        let CenterState { library, playlists } = self;
        playlists.dispatch_device_event(event, library);
    }
}

/// Entry point of the system: one library, its playlists, one device
pub struct MediaCenter {
    state: Arc<Mutex<CenterState>>,
    extractor: Box<dyn MetadataExtractor>,
}

impl MediaCenter {
    /// Wire a library and its playlist collection to `device`.
    ///
    /// The center becomes the device's listener; notifications arriving
    /// after the center is dropped are ignored.
    pub fn new(device: Arc<dyn PlaybackDevice>, extractor: Box<dyn MetadataExtractor>) -> Self {
        let mut library = Library::new(device.clone());
        let playlists = PlaylistCollection::new(&mut library);
        let state = Arc::new(Mutex::new(CenterState { library, playlists }));

        let listener_state = Arc::downgrade(&state);
        device.set_listener(Box::new(move |event| {
            if let Some(state) = listener_state.upgrade() {
                state.lock().dispatch(event);
            }
        }));

        Self { state, extractor }
    }

    /// Media center reading tags with lofty
    pub fn with_lofty(device: Arc<dyn PlaybackDevice>) -> Self {
        Self::new(device, Box::new(LoftyExtractor::new()))
    }

    /// Handle a device transition as if the device had reported it
    pub fn on_device_event(&self, event: DeviceEvent) {
        self.state.lock().dispatch(event);
    }

    // ---- Library ----

    /// Read the file's metadata and add it to the library.
    ///
    /// The library is only touched once extraction succeeded.
    pub fn add_song(&self, path: &Path) -> Result<SongRef> {
        let info = self.extractor.extract(path)?;
        let song = Song::new(info, path);
        Ok(self.state.lock().library.add(song))
    }

    /// Import every accepted file under `dir`, returning how many were added.
    ///
    /// Files whose metadata cannot be read are skipped with a warning.
    pub fn import_dir(&self, dir: &Path, config: &AppConfig) -> Result<usize> {
        log::info!("Importing songs from {:?}", dir);
        let mut walker = WalkDir::new(dir).sort_by_file_name();
        if !config.recursive {
            walker = walker.max_depth(1);
        }

        let mut added = 0;
        for entry in walker {
            let entry = entry.map_err(|source| Error::Scan {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() || !config.accepts(entry.path()) {
                continue;
            }
            match self.add_song(entry.path()) {
                Ok(_) => added += 1,
                Err(e) => log::warn!("Skipping {:?}: {}", entry.path(), e),
            }
        }

        log::info!("Imported {} song(s) from {:?}", added, dir);
        Ok(added)
    }

    pub fn number_of_songs(&self) -> usize {
        self.state.lock().library.len()
    }

    pub fn songs(&self) -> Vec<SongRef> {
        self.state.lock().library.songs()
    }

    pub fn select_song(&self, index: usize) -> Result<()> {
        Ok(self.state.lock().library.select(index)?)
    }

    pub fn selected_song(&self) -> Option<SongRef> {
        self.state.lock().library.selected().ok().cloned()
    }

    /// Remove the selected library song everywhere
    pub fn remove_selected_song(&self) -> Option<SongRef> {
        self.state.lock().library.remove()
    }

    /// Play the selected library song; false when nothing is selected
    pub fn play_song(&self) -> bool {
        self.state.lock().library.play().is_ok()
    }

    /// Stop library playback, if the library is the one playing
    pub fn stop_song(&self) {
        let mut state = self.state.lock();
        if state.library.is_playing() {
            state.library.stop();
        }
    }

    pub fn inc_rate_selected(&self) -> Option<Rating> {
        self.state.lock().library.inc_rate_selected().ok()
    }

    pub fn dec_rate_selected(&self) -> Option<Rating> {
        self.state.lock().library.dec_rate_selected().ok()
    }

    /// Songs whose metadata matches the regular expression `pattern`
    pub fn find_songs(&self, pattern: &str) -> Result<Vec<SongRef>> {
        let pattern = Regex::new(pattern)?;
        Ok(self.state.lock().library.matches(&pattern))
    }

    /// Who drives the device and which song it plays
    pub fn now_playing(&self) -> Option<(PlaybackOwner, SongRef)> {
        let state = self.state.lock();
        let owner = state.library.playback_owner()?;
        let song = state.library.playing()?.clone();
        Some((owner, song))
    }

    // ---- Playlists ----

    /// Create a manual playlist and select it, returning its index
    pub fn create_playlist(&self, name: &str) -> usize {
        let mut state = self.state.lock();
        let CenterState { library, playlists } = &mut *state;
        playlists.create_manual(name, library);
        playlists.len() - 1
    }

    pub fn number_of_playlists(&self) -> usize {
        self.state.lock().playlists.len()
    }

    /// Songs of playlist `index`, in playlist order
    pub fn playlist_songs(&self, index: usize) -> Result<Vec<SongRef>> {
        let state = self.state.lock();
        let songs = state.playlists.get(index)?.lock().iter().cloned().collect();
        Ok(songs)
    }

    pub fn playlist_names(&self) -> Vec<String> {
        self.state
            .lock()
            .playlists
            .iter()
            .map(|playlist| playlist.lock().name().to_string())
            .collect()
    }

    pub fn select_playlist(&self, index: usize) -> Result<()> {
        Ok(self.state.lock().playlists.select(index)?)
    }

    pub fn some_playlist_selected(&self) -> bool {
        self.state.lock().playlists.some_selected()
    }

    pub fn selected_playlist_index(&self) -> Option<usize> {
        self.state.lock().playlists.index_selected().ok()
    }

    /// Remove the selected playlist; false when none is selected
    pub fn remove_playlist(&self) -> bool {
        let mut state = self.state.lock();
        let CenterState { library, playlists } = &mut *state;
        playlists.remove(library).is_some()
    }

    /// Number of songs of the selected playlist
    pub fn playlist_song_count(&self) -> Result<usize> {
        let state = self.state.lock();
        let count = state.playlists.selected()?.lock().len();
        Ok(count)
    }

    /// Add the selected library song to the selected playlist.
    ///
    /// `Ok(false)` when no library song is selected or the playlist refuses
    /// it (duplicate, smart playlist).
    pub fn add_selected_song_to_playlist(&self) -> Result<bool> {
        let state = self.state.lock();
        let playlist = state.playlists.selected()?;
        let Ok(song) = state.library.selected() else {
            return Ok(false);
        };
        let added = playlist.lock().add(song.clone());
        Ok(added)
    }

    /// Select a song of the selected playlist
    pub fn select_playlist_song(&self, index: usize) -> Result<()> {
        let state = self.state.lock();
        state.playlists.selected()?.lock().select(index)?;
        Ok(())
    }

    /// Whether a playlist is selected and has a song selected
    pub fn some_playlist_song_selected(&self) -> bool {
        let state = self.state.lock();
        state
            .playlists
            .selected()
            .map(|playlist| playlist.lock().some_selected())
            .unwrap_or(false)
    }

    pub fn remove_selected_playlist_song(&self) -> Result<bool> {
        let state = self.state.lock();
        let removed = state.playlists.selected()?.lock().remove();
        Ok(removed)
    }

    pub fn next_playlist_song(&self) -> Result<()> {
        let state = self.state.lock();
        state.playlists.selected()?.lock().next();
        Ok(())
    }

    pub fn previous_playlist_song(&self) -> Result<()> {
        let state = self.state.lock();
        state.playlists.selected()?.lock().previous();
        Ok(())
    }

    /// Move the selected song of the selected playlist up to `target`
    pub fn move_up_selected(&self, target: usize) -> Result<bool> {
        let state = self.state.lock();
        let moved = state.playlists.selected()?.lock().move_up_selected(target);
        Ok(moved)
    }

    /// Play the selected song of the selected playlist, chaining through
    /// the rest of the playlist as songs end
    pub fn play_playlist(&self) -> Result<bool> {
        let mut state = self.state.lock();
        let CenterState { library, playlists } = &mut *state;
        Ok(playlists.play(library)?)
    }

    /// Stop the selected playlist if it is playing
    pub fn stop_playlist(&self) -> Result<()> {
        let mut state = self.state.lock();
        let CenterState { library, playlists } = &mut *state;
        let mut playlist = playlists.selected()?.lock();
        if playlist.is_playing(library) {
            playlist.stop(library);
        }
        Ok(())
    }

    /// Whether any playlist is playing
    pub fn is_playlist_playing(&self) -> bool {
        let state = self.state.lock();
        state.playlists.is_playing(&state.library)
    }

    // ---- Rendering ----

    pub fn render_library(&self) -> String {
        format!("*****MUSIC LIBRARY*****\n{}", self.state.lock().library)
    }

    pub fn render_playlists(&self) -> String {
        format!("***** PLAYLISTS *****\n{}", self.state.lock().playlists)
    }
}

impl std::fmt::Debug for MediaCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MediaCenter")
            .field("library", &state.library)
            .field("playlists", &state.playlists.len())
            .finish()
    }
}
