//! Songs, library events and the library itself
//!
//! The library owns every song. Playlists only hold shared handles to
//! library songs and learn about changes through [`LibraryEvent`]s.

mod event;
mod library;
mod song;

pub use event::LibraryEvent;
pub use library::{Library, PlaybackOwner};
pub use song::{same_song, Rating, Song, SongMetaInfo, SongRef};
