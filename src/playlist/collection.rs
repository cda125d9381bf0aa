//! Selectable collection of playlists

use super::list::{Playlist, PlaylistHandle, PlaylistId};
use crate::error::SelectionError;
use crate::model::Library;
use crate::player::DeviceEvent;
use crate::util::SelectionList;
use std::fmt;

/// All playlists of a library, smart ones first.
///
/// The collection arbitrates playback between playlists: starting one
/// always stops the device first.
#[derive(Debug)]
pub struct PlaylistCollection {
    playlists: SelectionList<PlaylistHandle>,
}

impl PlaylistCollection {
    /// Create the collection with its two smart playlists subscribed to `library`
    pub fn new(library: &mut Library) -> Self {
        let mut playlists = SelectionList::new();
        playlists.add(Playlist::most_liked().register(library));
        playlists.add(Playlist::most_recently_added().register(library));
        Self { playlists }
    }

    /// Create a manual playlist, append it and select it
    pub fn create_manual(&mut self, name: &str, library: &mut Library) -> PlaylistHandle {
        let handle = Playlist::manual(name).register(library);
        self.playlists.add(handle.clone());
        log::info!("Created playlist '{}'", name);
        handle
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&PlaylistHandle, SelectionError> {
        self.playlists.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistHandle> {
        self.playlists.iter()
    }

    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        self.playlists.select(index)
    }

    pub fn deselect(&mut self) {
        self.playlists.deselect();
    }

    pub fn some_selected(&self) -> bool {
        self.playlists.some_selected()
    }

    pub fn index_selected(&self) -> Result<usize, SelectionError> {
        self.playlists.index_selected()
    }

    pub fn selected(&self) -> Result<&PlaylistHandle, SelectionError> {
        self.playlists.selected()
    }

    pub fn next(&mut self) {
        self.playlists.next();
    }

    pub fn previous(&mut self) {
        self.playlists.previous();
    }

    /// Remove the selected playlist, stopping it first if it is playing
    pub fn remove(&mut self, library: &mut Library) -> Option<PlaylistHandle> {
        {
            let mut playlist = self.playlists.selected().ok()?.lock();
            if playlist.is_playing(library) {
                playlist.stop(library);
            }
        }
        let removed = self.playlists.remove()?;
        log::info!("Removed playlist '{}'", removed.lock().name());
        Some(removed)
    }

    /// Playlist with the given id
    pub fn find(&self, id: PlaylistId) -> Option<PlaylistHandle> {
        self.playlists
            .iter()
            .find(|playlist| playlist.lock().id() == id)
            .cloned()
    }

    /// Play the selected song of the selected playlist.
    ///
    /// Returns `Ok(false)` when the selected playlist has no song selected.
    pub fn play(&self, library: &mut Library) -> Result<bool, SelectionError> {
        let mut playlist = self.playlists.selected()?.lock();
        if !playlist.some_selected() {
            return Ok(false);
        }
        if playlist.is_playing(library) {
            playlist.stop(library);
        }
        playlist.play(library)?;
        Ok(true)
    }

    /// Whether any playlist is playing
    pub fn is_playing(&self, library: &Library) -> bool {
        self.playlists
            .iter()
            .any(|playlist| playlist.lock().is_playing(library))
    }

    /// Stop every playing playlist
    pub fn stop(&self, library: &mut Library) {
        for playlist in self.playlists.iter() {
            let mut playlist = playlist.lock();
            if playlist.is_playing(library) {
                playlist.stop(library);
            }
        }
    }

    /// Feed a device transition through the library, handing it to the
    /// owning playlist when the library is not the owner
    pub fn dispatch_device_event(&self, event: DeviceEvent, library: &mut Library) {
        let Some(id) = library.on_device_event(event) else {
            return;
        };
        match self.find(id) {
            Some(playlist) => playlist.lock().on_device_event(event, library),
            None => {
                log::warn!("Playback owner {:?} is gone, stopping device", id);
                library.stop();
            }
        }
    }
}

impl fmt::Display for PlaylistCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for playlist in self.playlists.iter() {
            writeln!(f, "{}", playlist.lock())?;
        }
        Ok(())
    }
}
