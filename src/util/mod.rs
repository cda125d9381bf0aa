//! Generic building blocks shared by the library and its playlists

mod observer;
mod selection;

pub use observer::{Observer, Subject};
pub use selection::SelectionList;
