//! tunesync - music library and playlist synchronization
//!
//! A library of songs keeps its playlists up to date by broadcasting every
//! change: manual playlists drop removed songs, while the "Most Liked" and
//! "Most Recently Added" playlists fill and evict themselves. Library and
//! playlists share one playback device, and starting playback anywhere
//! stops whatever was playing before.

pub mod center;
pub mod config;
pub mod error;
pub mod metadata;
pub mod model;
pub mod player;
pub mod playlist;
pub mod shell;
pub mod util;

pub use center::MediaCenter;
pub use config::AppConfig;
pub use error::{Error, Result};
