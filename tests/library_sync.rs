use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tunesync::metadata::{FileNameExtractor, LoftyExtractor};
use tunesync::model::{same_song, Library, PlaybackOwner, Song, SongMetaInfo, SongRef};
use tunesync::player::{DeviceCommand, SimulatedDevice};
use tunesync::playlist::{PlaylistCollection, PlaylistHandle};
use tunesync::{Error, MediaCenter};

/// Create a song with fixed metadata under /music
fn song(title: &str) -> Song {
    Song::new(
        SongMetaInfo::new(title, "Jazz", vec!["Test Artist".to_string()], "Test Album"),
        format!("/music/{title}.mp3"),
    )
}

/// Library on a simulated device, with the two smart playlists subscribed
fn setup() -> (Library, PlaylistCollection, SimulatedDevice) {
    let device = SimulatedDevice::new();
    let mut library = Library::new(Arc::new(device.clone()));
    let playlists = PlaylistCollection::new(&mut library);
    (library, playlists, device)
}

fn most_liked(playlists: &PlaylistCollection) -> PlaylistHandle {
    playlists.get(0).expect("Most Liked playlist").clone()
}

fn most_recent(playlists: &PlaylistCollection) -> PlaylistHandle {
    playlists.get(1).expect("Most Recently Added playlist").clone()
}

fn titles(playlist: &PlaylistHandle) -> Vec<String> {
    playlist
        .lock()
        .iter()
        .map(|s| s.title().unwrap_or_default().to_string())
        .collect()
}

fn rate(library: &mut Library, index: usize, times: usize) {
    library.select(index).expect("song index");
    for _ in 0..times {
        library.inc_rate_selected().expect("selected song");
    }
}

#[test]
fn test_first_add_only_reaches_recent_playlist() {
    let (mut lib, playlists, _) = setup();
    let a = lib.add(song("a"));

    let recent = most_recent(&playlists);
    assert_eq!(titles(&recent), vec!["a"]);
    assert!(same_song(recent.lock().selected().unwrap(), &a));
    assert!(most_liked(&playlists).lock().is_empty());
}

#[test]
fn test_recent_playlist_keeps_last_five() {
    let (mut lib, playlists, _) = setup();
    for title in ["a", "b", "c", "d", "e", "f"] {
        lib.add(song(title));
    }

    assert_eq!(lib.len(), 6);
    assert_eq!(titles(&most_recent(&playlists)), vec!["b", "c", "d", "e", "f"]);
}

#[test]
fn test_most_liked_evicts_lowest_rated() {
    let (mut lib, playlists, _) = setup();
    for title in ["a", "b", "c", "d", "e", "f"] {
        lib.add(song(title));
    }

    rate(&mut lib, 0, 5);
    for index in 1..6 {
        rate(&mut lib, index, 1);
    }

    // b is the first of the songs rated 1 when f arrives
    assert_eq!(titles(&most_liked(&playlists)), vec!["a", "c", "d", "e", "f"]);
    assert_eq!(lib.get(0).unwrap().rating().value(), 5);
}

#[test]
fn test_removal_reaches_every_playlist() {
    let (mut lib, mut playlists, _) = setup();
    let a = lib.add(song("a"));
    let b = lib.add(song("b"));
    rate(&mut lib, 0, 2);

    let manual = playlists.create_manual("mix", &mut lib);
    {
        let mut manual = manual.lock();
        manual.add(a.clone());
        manual.add(b.clone());
    }

    lib.select(0).unwrap();
    let removed = lib.remove().expect("removed song");
    assert!(same_song(&removed, &a));

    for playlist in [&manual, &most_liked(&playlists), &most_recent(&playlists)] {
        let playlist = playlist.lock();
        assert!(!playlist.contains(&a), "{} still holds a", playlist.name());
        if let Ok(index) = playlist.index_selected() {
            assert!(index < playlist.len());
        }
    }
    assert_eq!(titles(&manual), vec!["b"]);
    assert_eq!(titles(&most_recent(&playlists)), vec!["b"]);
    assert!(most_liked(&playlists).lock().is_empty());
}

#[test]
fn test_library_play_takes_over_playlist() {
    let (mut lib, mut playlists, device) = setup();
    lib.add(song("a"));
    let b = lib.add(song("b"));
    let manual = playlists.create_manual("mix", &mut lib);
    manual.lock().add(b);

    playlists.play(&mut lib).expect("selected playlist");
    assert!(manual.lock().is_playing(&lib));
    device.clear_commands();

    lib.select(0).unwrap();
    lib.play().unwrap();

    assert!(!manual.lock().is_playing(&lib));
    assert!(lib.is_playing());
    assert_eq!(lib.playback_owner(), Some(PlaybackOwner::Library));
    assert_eq!(
        device.commands(),
        vec![
            DeviceCommand::Stop,
            DeviceCommand::Load(PathBuf::from("/music/a.mp3")),
            DeviceCommand::Play,
        ]
    );
}

/// Media center over real files in a temp dir, tags derived from file names
fn center_with_files(device: &SimulatedDevice, names: &[&str]) -> (MediaCenter, TempDir, Vec<SongRef>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let center = MediaCenter::new(
        Arc::new(device.clone()),
        Box::new(FileNameExtractor::new()),
    );
    let songs = names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"dummy audio data").expect("Failed to write song file");
            center.add_song(&path).expect("Failed to add song")
        })
        .collect();
    (center, dir, songs)
}

#[test]
fn test_playlist_chains_through_songs() {
    let device = SimulatedDevice::new();
    let (center, _dir, songs) = center_with_files(&device, &["a.mp3", "b.mp3", "c.mp3"]);

    center.create_playlist("all");
    for index in 0..songs.len() {
        center.select_song(index).unwrap();
        assert!(center.add_selected_song_to_playlist().unwrap());
    }
    center.select_playlist_song(0).unwrap();
    assert!(center.play_playlist().unwrap());

    for (played, song) in songs.iter().enumerate() {
        let (owner, playing) = center.now_playing().expect("playlist should be playing");
        assert!(matches!(owner, PlaybackOwner::Playlist(_)));
        assert!(same_song(&playing, song), "song {} not playing", played);
        assert!(device.finish());
    }

    assert!(songs.iter().all(|s| s.times_played() == 1));
    assert!(center.now_playing().is_none());
    assert!(!center.is_playlist_playing());
}

#[test]
fn test_device_interrupt_stops_playlist() {
    let device = SimulatedDevice::new();
    let (center, _dir, songs) = center_with_files(&device, &["a.mp3", "b.mp3"]);

    center.select_playlist(1).unwrap();
    center.select_playlist_song(0).unwrap();
    center.play_playlist().unwrap();

    assert!(device.interrupt());
    assert!(!center.is_playlist_playing());
    assert!(songs.iter().all(|s| s.times_played() == 0));
}

#[test]
fn test_timed_tracks_end_on_their_own() {
    let device = SimulatedDevice::new().with_track_length(Duration::from_millis(20));
    let (center, _dir, songs) = center_with_files(&device, &["a.mp3"]);
    assert!(center.play_song());

    let deadline = Instant::now() + Duration::from_secs(5);
    while center.now_playing().is_some() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    assert!(center.now_playing().is_none());
    assert_eq!(songs[0].times_played(), 1);
}

#[test]
fn test_failed_add_is_atomic() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let garbage = dir.path().join("garbage.mp3");
    std::fs::write(&garbage, b"this is not audio").expect("Failed to write file");

    let center = MediaCenter::with_lofty(Arc::new(SimulatedDevice::new()));
    let result = center.add_song(&garbage);

    assert!(matches!(
        result,
        Err(Error::Metadata { .. }) | Err(Error::MissingTag(_))
    ));
    assert_eq!(center.number_of_songs(), 0);
    assert!(center.playlist_songs(1).unwrap().is_empty());
}

#[test]
fn test_lofty_rejects_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let center = MediaCenter::new(
        Arc::new(SimulatedDevice::new()),
        Box::new(LoftyExtractor::new()),
    );
    assert!(center.add_song(&dir.path().join("absent.flac")).is_err());
    assert_eq!(center.number_of_songs(), 0);
}
