//! Tag reading with lofty

use super::traits::MetadataExtractor;
use crate::error::{Error, Result};
use crate::model::SongMetaInfo;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;

/// Reads ID3, Vorbis comments, MP4 atoms... through lofty.
///
/// The file's primary tag is preferred; any other tag present is used as a
/// fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyExtractor;

impl LoftyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> Result<SongMetaInfo> {
        log::debug!("Reading tags: {:?}", path);

        let tagged_file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|source| Error::Metadata {
                path: path.to_path_buf(),
                source,
            })?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or_else(|| Error::MissingTag(path.to_path_buf()))?;

        let artists = tag
            .artist()
            .map(|artist| split_artists(&artist))
            .unwrap_or_default();

        Ok(SongMetaInfo {
            title: non_empty(tag.title().map(|v| v.into_owned())),
            genre: non_empty(tag.genre().map(|v| v.into_owned())),
            artists,
            album: non_empty(tag.album().map(|v| v.into_owned())),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a multi-artist field ("A; B", "A/B") into its names
fn split_artists(field: &str) -> Vec<String> {
    field
        .split([';', '/'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
