//! Metadata extractor trait definition

use crate::error::Result;
use crate::model::SongMetaInfo;
use std::path::Path;

/// Metadata extractor trait - allows swapping the tag reader, e.g. in tests
pub trait MetadataExtractor: Send + Sync {
    /// Read title, genre, artists and album from the file at `path`
    fn extract(&self, path: &Path) -> Result<SongMetaInfo>;
}
