//! Playlists and the collection arbitrating their playback
//!
//! Every playlist subscribes to the library it was created for and keeps
//! itself consistent with it: songs removed from the library disappear
//! from every playlist, and the smart playlists admit songs as they are
//! added or rated.

mod collection;
mod list;

pub use collection::PlaylistCollection;
pub use list::{EvictionPolicy, Playlist, PlaylistHandle, PlaylistId, SMART_PLAYLIST_CAPACITY};
