use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

/// Shared handle to a library-owned song.
///
/// Playlists hold clones of the handle; membership is tested by identity
/// (see [`same_song`]), never by value.
pub type SongRef = Arc<Song>;

/// Whether two handles point at the same library song
pub fn same_song(a: &SongRef, b: &SongRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// Song rating, from 0 (unrated) to 5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    /// Rating of a song nobody rated yet
    pub const UNRATED: Rating = Rating(0);

    /// Highest possible rating
    pub const MAX: Rating = Rating(5);

    /// Create a rating, clamping `value` to the valid range
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One step up, staying at the maximum
    pub fn increment(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step down, staying at zero
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive metadata extracted from a song file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongMetaInfo {
    /// Song title
    pub title: Option<String>,

    /// Genre description
    pub genre: Option<String>,

    /// Performing artists, in tag order
    pub artists: Vec<String>,

    /// Album name
    pub album: Option<String>,
}

impl SongMetaInfo {
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        artists: Vec<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            genre: Some(genre.into()),
            artists,
            album: Some(album.into()),
        }
    }

    /// Check the rendered metadata against `pattern` (unanchored search)
    pub fn matches(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.to_string())
    }
}

impl fmt::Display for SongMetaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNKNOWN: &str = "unknown";
        write!(
            f,
            "[{}, {}, {}, [{}]]",
            self.title.as_deref().unwrap_or(UNKNOWN),
            self.album.as_deref().unwrap_or(UNKNOWN),
            self.genre.as_deref().unwrap_or(UNKNOWN),
            self.artists.join("; ")
        )
    }
}

/// A song of the library.
///
/// Metadata and filename never change once the song exists; the rating and
/// play count are updated in place through shared handles.
#[derive(Debug)]
pub struct Song {
    filename: PathBuf,
    info: SongMetaInfo,
    times_played: AtomicU32,
    rating: AtomicU8,
}

impl Song {
    /// Create an unrated, never played song
    pub fn new(info: SongMetaInfo, filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            info,
            times_played: AtomicU32::new(0),
            rating: AtomicU8::new(Rating::UNRATED.value()),
        }
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn info(&self) -> &SongMetaInfo {
        &self.info
    }

    pub fn title(&self) -> Option<&str> {
        self.info.title.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.info.genre.as_deref()
    }

    pub fn artists(&self) -> &[String] {
        &self.info.artists
    }

    pub fn album(&self) -> Option<&str> {
        self.info.album.as_deref()
    }

    pub fn times_played(&self) -> u32 {
        self.times_played.load(Ordering::Relaxed)
    }

    /// Count one more complete playback
    pub fn inc_times_played(&self) {
        self.times_played.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rating(&self) -> Rating {
        Rating::new(self.rating.load(Ordering::Relaxed))
    }

    /// Raise the rating by one step, returning the new rating
    pub fn inc_rating(&self) -> Rating {
        self.update_rating(Rating::increment)
    }

    /// Lower the rating by one step, returning the new rating
    pub fn dec_rating(&self) -> Rating {
        self.update_rating(Rating::decrement)
    }

    fn update_rating(&self, step: fn(Rating) -> Rating) -> Rating {
        let previous = self
            .rating
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |raw| {
                Some(step(Rating::new(raw)).value())
            })
            .unwrap_or_else(|raw| raw);
        step(Rating::new(previous))
    }

    pub fn matches(&self, pattern: &Regex) -> bool {
        self.info.matches(pattern)
    }
}

/// Full equality: filename, metadata, rating and play count must all match
impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
            && self.info == other.info
            && self.rating() == other.rating()
            && self.times_played() == other.times_played()
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --- {} -- {}", self.info, self.rating(), self.times_played())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_song() -> Song {
        Song::new(
            SongMetaInfo::new(
                "Blue in Green",
                "Jazz",
                vec!["Miles Davis".to_string(), "Bill Evans".to_string()],
                "Kind of Blue",
            ),
            "/music/blue_in_green.mp3",
        )
    }

    #[test]
    fn test_rating_clamps_and_saturates() {
        assert_eq!(Rating::new(9), Rating::MAX);
        assert_eq!(Rating::MAX.increment(), Rating::MAX);
        assert_eq!(Rating::UNRATED.decrement(), Rating::UNRATED);
        assert_eq!(Rating::new(2).increment(), Rating::new(3));
        assert!(Rating::new(1) < Rating::new(4));
        assert!(!Rating::UNRATED.is_rated());
    }

    #[test]
    fn test_rating_round_trip_away_from_bounds() {
        for value in 0..=5u8 {
            let rating = Rating::new(value);
            let round_trip = rating.increment().decrement();
            if rating == Rating::MAX {
                assert_eq!(round_trip, Rating::new(4));
            } else {
                assert_eq!(round_trip, rating);
            }
        }
    }

    #[test]
    fn test_song_rating_updates_in_place() {
        let song = sample_song();
        assert_eq!(song.rating(), Rating::UNRATED);
        for _ in 0..7 {
            song.inc_rating();
        }
        assert_eq!(song.rating(), Rating::MAX);
        assert_eq!(song.inc_rating(), Rating::MAX);
        assert_eq!(song.dec_rating(), Rating::new(4));
    }

    #[test]
    fn test_times_played() {
        let song = sample_song();
        song.inc_times_played();
        song.inc_times_played();
        assert_eq!(song.times_played(), 2);
    }

    #[test]
    fn test_full_equality_includes_mutable_fields() {
        let a = sample_song();
        let b = sample_song();
        assert_eq!(a, b);

        b.inc_rating();
        assert_ne!(a, b);
        a.inc_rating();
        assert_eq!(a, b);

        a.inc_times_played();
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_differs_from_equality() {
        let a: SongRef = Arc::new(sample_song());
        let b: SongRef = Arc::new(sample_song());
        assert_eq!(*a, *b);
        assert!(!same_song(&a, &b));
        assert!(same_song(&a, &a.clone()));
    }

    #[test]
    fn test_display() {
        let song = sample_song();
        song.inc_rating();
        assert_eq!(
            song.to_string(),
            "[Blue in Green, Kind of Blue, Jazz, [Miles Davis; Bill Evans]] --- 1 -- 0"
        );

        let unknown = SongMetaInfo::default();
        assert_eq!(unknown.to_string(), "[unknown, unknown, unknown, []]");
    }

    #[test]
    fn test_matches_searches_rendered_metadata() {
        let song = sample_song();
        assert!(song.matches(&Regex::new("Miles").unwrap()));
        assert!(song.matches(&Regex::new("(?i)kind of blue").unwrap()));
        assert!(!song.matches(&Regex::new("^Miles").unwrap()));
    }
}
