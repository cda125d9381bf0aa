use super::song::SongRef;

/// Change notifications emitted by the library to its playlists
#[derive(Debug, Clone)]
pub enum LibraryEvent {
    /// A song was appended to the library
    Added(SongRef),

    /// A song left the library; playlists must drop their reference
    Removed(SongRef),

    /// The rating of a song changed (or was confirmed at a bound)
    Rated(SongRef),
}

impl LibraryEvent {
    /// The song the event is about
    pub fn song(&self) -> &SongRef {
        match self {
            LibraryEvent::Added(song) | LibraryEvent::Removed(song) | LibraryEvent::Rated(song) => {
                song
            }
        }
    }
}
