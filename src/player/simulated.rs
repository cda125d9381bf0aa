//! Simulated playback device
//!
//! No audio is decoded. The device records the commands it receives and
//! reports `Ended`/`Stopped` when told to, or on a timer thread when a
//! track length is configured.

use super::traits::{DeviceEvent, DeviceListener, PlaybackDevice, PlaybackSession};
use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

/// Command received by the simulated device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    Load(PathBuf),
    Play,
    Stop,
}

/// Coarse state of the simulated device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Nothing loaded
    Idle,

    /// A track is loaded but not playing
    Loaded,

    /// The loaded track is playing
    Playing,
}

struct Shared {
    state: DeviceState,
    loaded: Option<PathBuf>,
    /// Bumped on every command so stale timers can tell they are outdated
    session: u64,
    commands: Vec<DeviceCommand>,
    listener: Option<Arc<dyn Fn(DeviceEvent) + Send + Sync>>,
}

/// Playback device that only pretends to play
#[derive(Clone)]
pub struct SimulatedDevice {
    shared: Arc<Mutex<Shared>>,
    track_length: Option<Duration>,
}

impl SimulatedDevice {
    /// Create a device whose tracks only end through [`SimulatedDevice::finish`]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: DeviceState::Idle,
                loaded: None,
                session: 0,
                commands: Vec::new(),
                listener: None,
            })),
            track_length: None,
        }
    }

    /// End every track automatically after `length`
    pub fn with_track_length(mut self, length: Duration) -> Self {
        self.track_length = Some(length);
        self
    }

    pub fn state(&self) -> DeviceState {
        self.shared.lock().state
    }

    /// Path of the loaded track
    pub fn loaded(&self) -> Option<PathBuf> {
        self.shared.lock().loaded.clone()
    }

    /// Every command received so far, oldest first
    pub fn commands(&self) -> Vec<DeviceCommand> {
        self.shared.lock().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.shared.lock().commands.clear();
    }

    /// Let the playing track reach its end; returns false if nothing was playing
    pub fn finish(&self) -> bool {
        end_playback(&self.shared, None, DeviceEvent::Ended)
    }

    /// Stop playback from the device side (output lost, track unreadable...)
    pub fn interrupt(&self) -> bool {
        end_playback(&self.shared, None, DeviceEvent::Stopped)
    }

    fn spawn_timer(&self, session: u64, length: Duration) {
        let shared: Weak<Mutex<Shared>> = Arc::downgrade(&self.shared);
        thread::spawn(move || {
            thread::sleep(length);
            if let Some(shared) = shared.upgrade() {
                end_playback(&shared, Some(session), DeviceEvent::Ended);
            }
        });
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("SimulatedDevice")
            .field("state", &shared.state)
            .field("loaded", &shared.loaded)
            .field("track_length", &self.track_length)
            .finish()
    }
}

/// Leave the playing state and notify the listener outside the lock.
///
/// With `session` set, only ends playback if no command arrived since.
/// The event names the session that was playing.
fn end_playback(
    shared: &Mutex<Shared>,
    session: Option<u64>,
    event: fn(PlaybackSession) -> DeviceEvent,
) -> bool {
    let (listener, event) = {
        let mut shared = shared.lock();
        if shared.state != DeviceState::Playing {
            return false;
        }
        if session.is_some_and(|session| session != shared.session) {
            return false;
        }
        let ended = PlaybackSession::new(shared.session);
        shared.state = DeviceState::Loaded;
        shared.session += 1;
        (shared.listener.clone(), event(ended))
    };

    log::debug!("Simulated device reports {:?}", event);
    if let Some(listener) = listener {
        listener(event);
    }
    true
}

impl PlaybackDevice for SimulatedDevice {
    fn load(&self, path: &Path) {
        log::debug!("Device load: {:?}", path);
        let mut shared = self.shared.lock();
        shared.commands.push(DeviceCommand::Load(path.to_path_buf()));
        shared.loaded = Some(path.to_path_buf());
        shared.state = DeviceState::Loaded;
        shared.session += 1;
    }

    fn play(&self) -> PlaybackSession {
        let (session, playing) = {
            let mut shared = self.shared.lock();
            shared.commands.push(DeviceCommand::Play);
            shared.session += 1;
            let playing = shared.loaded.is_some();
            if playing {
                shared.state = DeviceState::Playing;
            }
            (shared.session, playing)
        };

        if !playing {
            log::warn!("Device asked to play with nothing loaded");
        } else {
            log::debug!("Device play (session {})", session);
            if let Some(length) = self.track_length {
                self.spawn_timer(session, length);
            }
        }
        PlaybackSession::new(session)
    }

    fn stop(&self) {
        log::debug!("Device stop");
        let mut shared = self.shared.lock();
        shared.commands.push(DeviceCommand::Stop);
        shared.state = if shared.loaded.is_some() {
            DeviceState::Loaded
        } else {
            DeviceState::Idle
        };
        shared.session += 1;
    }

    fn set_listener(&self, listener: DeviceListener) {
        self.shared.lock().listener = Some(Arc::from(listener));
    }
}
