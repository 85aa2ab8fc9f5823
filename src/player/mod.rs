// src/player/mod.rs
//! Player module - the dual-channel player and its two channels.

pub mod channel;
pub mod error;
pub mod mixer;

// Re-export commonly used types
pub use channel::{Channel, PlaybackState, DEFAULT_VOLUME, MAX_VOLUME};
pub use error::{ErrorCategory, PlayerError};
pub use mixer::Player;
