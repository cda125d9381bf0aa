//! Playback device trait definitions

use std::path::Path;

/// One `play()` of the device; events name the session they end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackSession(u64);

impl PlaybackSession {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// State transitions reported by a playback device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The session's track played through to its end
    Ended(PlaybackSession),

    /// The session stopped without an explicit `stop()` from the caller
    Stopped(PlaybackSession),
}

impl DeviceEvent {
    /// Session the event belongs to
    pub fn session(&self) -> PlaybackSession {
        match self {
            DeviceEvent::Ended(session) | DeviceEvent::Stopped(session) => *session,
        }
    }
}

/// Callback receiving device notifications
pub type DeviceListener = Box<dyn Fn(DeviceEvent) + Send + Sync>;

/// Playback device trait - the one shared audio output of the process.
///
/// Implementations report transitions asynchronously to the single
/// registered listener. They must never call the listener from inside
/// `load`, `play` or `stop`: callers drive the device while holding the
/// lock the listener needs. An event may therefore arrive after the caller
/// already started another session; receivers compare sessions.
pub trait PlaybackDevice: Send + Sync {
    /// Load the file at `path`, replacing whatever was loaded
    fn load(&self, path: &Path);

    /// Start playing the loaded file, opening a new session
    fn play(&self) -> PlaybackSession;

    /// Stop playback
    fn stop(&self);

    /// Install the listener for state transitions, replacing any previous one
    fn set_listener(&self, listener: DeviceListener);
}
