use super::event::LibraryEvent;
use super::song::{Rating, Song, SongRef};
use crate::error::SelectionError;
use crate::player::{DeviceEvent, PlaybackDevice, PlaybackSession};
use crate::playlist::PlaylistId;
use crate::util::{Observer, SelectionList, Subject};
use parking_lot::Mutex;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Who currently drives the shared playback device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOwner {
    /// The library itself, playing its selected song
    Library,

    /// A playlist, through the library's playback primitives
    Playlist(PlaylistId),
}

/// Music library: the canonical, selectable collection of songs.
///
/// The library is the only component talking to the playback device. It
/// notifies its subscribed playlists of every addition, removal and rating
/// change.
pub struct Library {
    /// All songs, in insertion order
    songs: SelectionList<SongRef>,

    /// Song loaded on the device, if any
    playing: Option<SongRef>,

    /// Current owner of the device
    owner: Option<PlaybackOwner>,

    /// Device session of the current playback
    session: Option<PlaybackSession>,

    device: Arc<dyn PlaybackDevice>,

    subject: Subject<LibraryEvent>,
}

impl Library {
    /// Create an empty library driving `device`
    pub fn new(device: Arc<dyn PlaybackDevice>) -> Self {
        Self {
            songs: SelectionList::new(),
            playing: None,
            owner: None,
            session: None,
            device,
            subject: Subject::new(),
        }
    }

    /// Subscribe `observer` to library events
    pub fn register_listener<O>(&mut self, observer: &Arc<Mutex<O>>)
    where
        O: Observer<LibraryEvent> + 'static,
    {
        self.subject.register(observer);
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Song at position `index`
    pub fn get(&self, index: usize) -> Result<&SongRef, SelectionError> {
        self.songs.get(index)
    }

    /// Iterate over the songs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SongRef> {
        self.songs.iter()
    }

    /// Append `song`, select it and announce it
    pub fn add(&mut self, song: Song) -> SongRef {
        let song: SongRef = Arc::new(song);
        self.songs.add(song.clone());
        log::info!("Added to library: {}", song);
        self.emit(LibraryEvent::Added(song.clone()));
        song
    }

    /// Remove the selected song and announce it.
    ///
    /// Does nothing when no song is selected.
    pub fn remove(&mut self) -> Option<SongRef> {
        let removed = self.songs.remove()?;
        log::info!("Removed from library: {}", removed);
        self.emit(LibraryEvent::Removed(removed.clone()));
        Some(removed)
    }

    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        self.songs.select(index)
    }

    pub fn deselect(&mut self) {
        self.songs.deselect();
    }

    pub fn some_selected(&self) -> bool {
        self.songs.some_selected()
    }

    pub fn index_selected(&self) -> Result<usize, SelectionError> {
        self.songs.index_selected()
    }

    pub fn selected(&self) -> Result<&SongRef, SelectionError> {
        self.songs.selected()
    }

    pub fn next(&mut self) {
        self.songs.next();
    }

    pub fn previous(&mut self) {
        self.songs.previous();
    }

    /// Raise the rating of the selected song
    pub fn inc_rate_selected(&mut self) -> Result<Rating, SelectionError> {
        let song = self.songs.selected()?.clone();
        let rating = song.inc_rating();
        self.emit(LibraryEvent::Rated(song));
        Ok(rating)
    }

    /// Lower the rating of the selected song
    pub fn dec_rate_selected(&mut self) -> Result<Rating, SelectionError> {
        let song = self.songs.selected()?.clone();
        let rating = song.dec_rating();
        self.emit(LibraryEvent::Rated(song));
        Ok(rating)
    }

    /// Songs whose rendered metadata matches `pattern`
    pub fn matches(&self, pattern: &Regex) -> Vec<SongRef> {
        self.songs
            .iter()
            .filter(|song| song.matches(pattern))
            .cloned()
            .collect()
    }

    /// Snapshot of every song handle
    pub fn songs(&self) -> Vec<SongRef> {
        self.songs.iter().cloned().collect()
    }

    /// Whether both libraries hold equal songs (full equality) in the same order
    pub fn equals_library(&self, other: &Library) -> bool {
        self.len() == other.len()
            && self
                .songs
                .iter()
                .zip(other.songs.iter())
                .all(|(a, b)| **a == **b)
    }

    /// Play the selected song, stopping whatever the device was playing
    pub fn play(&mut self) -> Result<(), SelectionError> {
        let song = self.songs.selected()?.clone();
        self.start_playback(PlaybackOwner::Library, song);
        Ok(())
    }

    /// Whether the library itself is playing a song
    pub fn is_playing(&self) -> bool {
        self.owner == Some(PlaybackOwner::Library) && self.playing.is_some()
    }

    /// Stop the device and release ownership, whoever held it
    pub fn stop(&mut self) {
        if let Some(owner) = self.owner.take() {
            log::debug!("Playback stopped (owner: {:?})", owner);
        }
        self.playing = None;
        self.session = None;
        self.device.stop();
    }

    /// Song currently loaded on the device
    pub fn playing(&self) -> Option<&SongRef> {
        self.playing.as_ref()
    }

    pub fn playback_owner(&self) -> Option<PlaybackOwner> {
        self.owner
    }

    /// Device session of the current playback
    pub fn playback_session(&self) -> Option<PlaybackSession> {
        self.session
    }

    /// Load and play `song` on behalf of `owner`.
    ///
    /// Any ongoing playback is stopped first, so the device never has two
    /// owners.
    pub fn start_playback(&mut self, owner: PlaybackOwner, song: SongRef) {
        if self.owner.is_some() {
            self.stop();
        }
        log::info!("Playing {} ({:?})", song, owner);
        self.device.load(song.filename());
        self.session = Some(self.device.play());
        self.playing = Some(song);
        self.owner = Some(owner);
    }

    /// React to a device transition.
    ///
    /// Events of any session but the current one are dropped: they were
    /// queued behind a caller that has since stopped or replaced playback.
    ///
    /// Handles the event when the library owns playback. `Ended` counts the
    /// playing song and releases the device without sending it `stop`; the
    /// playing song is cleared at once rather than at the next play/stop.
    /// When a playlist owns playback, nothing changes here and the
    /// playlist's id is returned so the caller can hand the event over.
    pub fn on_device_event(&mut self, event: DeviceEvent) -> Option<PlaylistId> {
        if self.session != Some(event.session()) {
            log::debug!("Ignoring {:?}: current session is {:?}", event, self.session);
            return None;
        }
        match self.owner {
            None => {
                log::debug!("Ignoring {:?}: nothing is playing", event);
                None
            }
            Some(PlaybackOwner::Playlist(id)) => Some(id),
            Some(PlaybackOwner::Library) => {
                match event {
                    DeviceEvent::Ended(_) => {
                        if let Some(song) = self.playing.take() {
                            song.inc_times_played();
                            log::debug!("Finished {}", song);
                        }
                        self.owner = None;
                        self.session = None;
                    }
                    DeviceEvent::Stopped(_) => self.stop(),
                }
                None
            }
        }
    }

    fn emit(&mut self, event: LibraryEvent) {
        log::debug!(
            "Dispatching {:?} to {} listener(s)",
            event,
            self.subject.observer_count()
        );
        self.subject.emit(&event);
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("songs", &self.songs.len())
            .field("selected", &self.songs.selection())
            .field("owner", &self.owner)
            .field("session", &self.session)
            .field("subject", &self.subject)
            .finish()
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.songs)
    }
}
