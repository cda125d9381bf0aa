//! Song metadata extraction
//!
//! The library only consumes [`SongMetaInfo`](crate::model::SongMetaInfo)
//! values; where they come from is hidden behind [`MetadataExtractor`].

mod lofty_reader;
mod stub;
mod traits;

pub use lofty_reader::LoftyExtractor;
pub use stub::FileNameExtractor;
pub use traits::MetadataExtractor;
