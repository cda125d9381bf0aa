//! Stub extractor deriving metadata from file names
//!
//! Used when files carry no tags worth reading, and by the tests. A name
//! like `Artist - Title.mp3` yields both fields; otherwise the stem is the
//! title.

use super::traits::MetadataExtractor;
use crate::error::{Error, Result};
use crate::model::SongMetaInfo;
use std::path::Path;

/// Extractor that never opens the file's contents
pub struct FileNameExtractor;

impl FileNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor for FileNameExtractor {
    fn extract(&self, path: &Path) -> Result<SongMetaInfo> {
        log::debug!("Stub metadata for: {:?}", path);

        std::fs::metadata(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::trim)
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| Error::MissingTag(path.to_path_buf()))?;

        let (artists, title) = match stem.split_once(" - ") {
            Some((artist, title)) => (vec![artist.trim().to_string()], title.trim()),
            None => (Vec::new(), stem),
        };

        Ok(SongMetaInfo {
            title: Some(title.to_string()),
            artists,
            ..SongMetaInfo::default()
        })
    }
}
