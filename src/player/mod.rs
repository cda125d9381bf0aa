//! Shared playback device
//!
//! The core only drives the device through the [`PlaybackDevice`] trait.
//! [`SimulatedDevice`] stands in for real audio output: it keeps track of
//! what it was told to do and reports track ends either on demand or after
//! a fixed track length.

mod simulated;
mod traits;

pub use simulated::{DeviceCommand, DeviceState, SimulatedDevice};
pub use traits::{DeviceEvent, DeviceListener, PlaybackDevice, PlaybackSession};
