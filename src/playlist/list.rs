//! Playlists over library songs
//!
//! One type covers manual and smart playlists. A smart playlist is bounded
//! and maintains its own membership through an [`EvictionPolicy`]; it
//! rejects manual additions, removals and reordering.

use crate::error::SelectionError;
use crate::model::{same_song, Library, LibraryEvent, PlaybackOwner, Rating, SongRef};
use crate::player::DeviceEvent;
use crate::util::{Observer, SelectionList};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Number of songs kept by each smart playlist
pub const SMART_PLAYLIST_CAPACITY: usize = 5;

/// Shared handle to a playlist subscribed to a library
pub type PlaylistHandle = Arc<Mutex<Playlist>>;

/// Process-wide unique playlist identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaylistId(u64);

impl PlaylistId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Rule deciding which songs a playlist admits and evicts on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Membership is edited by hand
    None,

    /// Admit every rated song; when full, evict the lowest rated
    LowestRated,

    /// Admit every added song; when full, evict the oldest admitted
    OldestAdded,
}

impl EvictionPolicy {
    /// Song to admit in reaction to `event`, if the policy cares about it
    fn admitted<'a>(&self, event: &'a LibraryEvent) -> Option<&'a SongRef> {
        match (self, event) {
            (EvictionPolicy::LowestRated, LibraryEvent::Rated(song))
            | (EvictionPolicy::OldestAdded, LibraryEvent::Added(song)) => Some(song),
            _ => None,
        }
    }

    /// Position of the entry to evict to make room
    fn victim(&self, songs: &SelectionList<SongRef>) -> Option<usize> {
        match self {
            EvictionPolicy::None => None,
            EvictionPolicy::OldestAdded => (!songs.is_empty()).then_some(0),
            EvictionPolicy::LowestRated => {
                // First minimum in scan order wins ties
                let mut lowest: Option<(usize, Rating)> = None;
                for (index, song) in songs.iter().enumerate() {
                    let rating = song.rating();
                    match lowest {
                        Some((_, current)) if rating >= current => {}
                        _ => lowest = Some((index, rating)),
                    }
                }
                lowest.map(|(index, _)| index)
            }
        }
    }
}

/// Named, selectable list of references to library songs
#[derive(Debug)]
pub struct Playlist {
    id: PlaylistId,
    name: String,
    policy: EvictionPolicy,
    reorderable: bool,
    capacity: Option<usize>,
    songs: SelectionList<SongRef>,
    playing: Option<SongRef>,
}

impl Playlist {
    /// Create an empty playlist edited by hand
    pub fn manual(name: impl Into<String>) -> Self {
        Self::with_policy(name.into(), EvictionPolicy::None, true, None)
    }

    /// Smart playlist of the best rated songs
    pub fn most_liked() -> Self {
        Self::with_policy(
            "Most Liked".to_string(),
            EvictionPolicy::LowestRated,
            false,
            Some(SMART_PLAYLIST_CAPACITY),
        )
    }

    /// Smart playlist of the latest songs added to the library
    pub fn most_recently_added() -> Self {
        Self::with_policy(
            "Most Recently Added".to_string(),
            EvictionPolicy::OldestAdded,
            false,
            Some(SMART_PLAYLIST_CAPACITY),
        )
    }

    fn with_policy(
        name: String,
        policy: EvictionPolicy,
        reorderable: bool,
        capacity: Option<usize>,
    ) -> Self {
        Self {
            id: PlaylistId::next(),
            name,
            policy,
            reorderable,
            capacity,
            songs: SelectionList::new(),
            playing: None,
        }
    }

    /// Share the playlist and subscribe it to `library`'s events
    pub fn register(self, library: &mut Library) -> PlaylistHandle {
        let handle = Arc::new(Mutex::new(self));
        library.register_listener(&handle);
        handle
    }

    pub fn id(&self) -> PlaylistId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Whether membership is maintained by a policy rather than by hand
    pub fn is_smart(&self) -> bool {
        self.policy != EvictionPolicy::None
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&SongRef, SelectionError> {
        self.songs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SongRef> {
        self.songs.iter()
    }

    /// Whether this exact library song is in the playlist
    pub fn contains(&self, song: &SongRef) -> bool {
        self.position_of(song).is_some()
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

    /// Append `song` and select it.
    ///
    /// Returns false, leaving the playlist untouched, when the song is
    /// already present or the playlist is smart.
    pub fn add(&mut self, song: SongRef) -> bool {
        if self.is_smart() {
            log::warn!("Playlist '{}' is smart, refusing manual add", self.name);
            return false;
        }
        if self.contains(&song) {
            log::debug!("'{}' already contains {}", self.name, song);
            return false;
        }
        self.songs.add(song);
        true
    }

    /// Remove the selected song, leaving nothing selected.
    ///
    /// Returns false when nothing is selected or the playlist is smart.
    pub fn remove(&mut self) -> bool {
        if self.is_smart() {
            log::warn!("Playlist '{}' is smart, refusing manual remove", self.name);
            return false;
        }
        self.songs.remove().is_some() && !self.songs.some_selected()
    }

    /// Move the selected song up to `target`, shifting the songs in between
    /// down by one.
    ///
    /// Requires a selection and `target` strictly before it. Smart
    /// playlists never reorder.
    pub fn move_up_selected(&mut self, target: usize) -> bool {
        if !self.reorderable {
            log::warn!("Playlist '{}' cannot be reordered", self.name);
            return false;
        }
        let Ok(current) = self.songs.index_selected() else {
            return false;
        };
        if target >= current {
            return false;
        }
        let moved = self.songs.selected().ok().cloned();
        if self.songs.move_selected(target).is_err() {
            return false;
        }
        self.songs.index_selected() == Ok(target)
            && match (self.songs.selected(), moved) {
                (Ok(now), Some(moved)) => same_song(now, &moved),
                _ => false,
            }
    }

    /// Start playing the selected song through the library's device
    pub fn play(&mut self, library: &mut Library) -> Result<(), SelectionError> {
        let song = self.songs.selected()?.clone();
        if self.is_playing(library) {
            self.stop(library);
        }
        library.start_playback(PlaybackOwner::Playlist(self.id), song.clone());
        self.playing = Some(song);
        Ok(())
    }

    /// Stop playback at the library level
    pub fn stop(&mut self, library: &mut Library) {
        self.playing = None;
        library.stop();
    }

    /// Whether this playlist currently owns the device
    pub fn is_playing(&self, library: &Library) -> bool {
        self.playing.is_some() && library.playback_owner() == Some(PlaybackOwner::Playlist(self.id))
    }

    /// Song this playlist last started
    pub fn playing(&self) -> Option<&SongRef> {
        self.playing.as_ref()
    }

    /// React to a device transition while this playlist owns playback.
    ///
    /// A finished song counts as played and playback moves on to the next
    /// song of the playlist, stopping after the last one. Events of an
    /// earlier session are ignored.
    pub fn on_device_event(&mut self, event: DeviceEvent, library: &mut Library) {
        if !self.is_playing(library) || library.playback_session() != Some(event.session()) {
            return;
        }
        match event {
            DeviceEvent::Ended(_) => {
                if let Some(song) = &self.playing {
                    song.inc_times_played();
                }
                self.songs.next();
                if self.songs.some_selected() {
                    if let Err(e) = self.play(library) {
                        log::warn!("Playlist '{}' could not continue: {}", self.name, e);
                    }
                } else {
                    log::debug!("Playlist '{}' reached its end", self.name);
                    self.stop(library);
                }
            }
            DeviceEvent::Stopped(_) => self.stop(library),
        }
    }

    fn position_of(&self, song: &SongRef) -> Option<usize> {
        self.songs.position(|entry| same_song(entry, song))
    }

    /// Remove the entry at `index`, keeping the selected index when another
    /// entry was selected (cleared if that index no longer exists)
    fn remove_entry(&mut self, index: usize) {
        let previous = self.songs.selection();
        if self.songs.select(index).is_err() {
            return;
        }
        self.songs.remove();
        if let Some(previous) = previous.filter(|previous| *previous != index) {
            if self.songs.select(previous).is_err() {
                log::debug!("'{}' lost its selection at {}", self.name, previous);
            }
        }
    }

    /// Drop a song that left the library
    fn purge(&mut self, song: &SongRef) {
        if let Some(index) = self.position_of(song) {
            self.remove_entry(index);
            log::debug!("'{}' dropped removed song {}", self.name, song);
        }
    }

    /// Admit `song` through the policy, evicting to stay within capacity.
    ///
    /// Eviction runs first and may pick `song` itself; a resident copy that
    /// survives is taken out so the song comes back at the tail.
    fn admit(&mut self, song: SongRef) {
        if let Some(capacity) = self.capacity {
            while self.songs.len() >= capacity {
                let Some(victim) = self.policy.victim(&self.songs) else {
                    break;
                };
                if let Ok(evicted) = self.songs.get(victim) {
                    log::debug!("'{}' evicts {}", self.name, evicted);
                }
                self.remove_entry(victim);
            }
        }
        if let Some(index) = self.position_of(&song) {
            self.remove_entry(index);
        }
        self.songs.add(song);
    }
}

impl Observer<LibraryEvent> for Playlist {
    fn on_event(&mut self, event: &LibraryEvent) {
        if let LibraryEvent::Removed(song) = event {
            self.purge(song);
        } else if let Some(song) = self.policy.admitted(event) {
            self.admit(song.clone());
        }
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*-- Playlist {} --*", self.name)?;
        write!(f, "{}", self.songs)
    }
}
