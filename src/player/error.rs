// src/player/error.rs
//! Errors surfaced by the player and its channels.

use thiserror::Error;

use crate::audio::MediaError;
use crate::catalog::{CatalogError, ChannelKind};

/// Broad families of failures, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Selection,
    Playback,
    /// An argument outside its accepted range or set.
    Input,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Failed to load audio tracks. Restart to try again.")]
    Catalog(#[source] CatalogError),

    #[error("Please select at least one audio track")]
    NoSelection,

    #[error("No {0} track selected")]
    NotSelected(ChannelKind),

    #[error("Failed to load {kind} track: {source}")]
    Playback {
        kind: ChannelKind,
        #[source]
        source: MediaError,
    },

    #[error("Failed to play audio. Please try again.")]
    SyncPlayback {
        kind: ChannelKind,
        #[source]
        source: MediaError,
    },

    #[error("Could not seek the {kind} track: {source}")]
    Seek {
        kind: ChannelKind,
        #[source]
        source: MediaError,
    },

    #[error("Volume {0} is outside 0..=100")]
    VolumeOutOfRange(u8),

    #[error("Unknown {kind} track `{id}`")]
    UnknownTrack { kind: ChannelKind, id: String },

    #[error("The {0} track's length is not known yet")]
    DurationUnknown(ChannelKind),
}

impl PlayerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlayerError::Catalog(_) => ErrorCategory::Catalog,
            PlayerError::NoSelection | PlayerError::NotSelected(_) => ErrorCategory::Selection,
            PlayerError::Playback { .. }
            | PlayerError::SyncPlayback { .. }
            | PlayerError::Seek { .. } => ErrorCategory::Playback,
            PlayerError::VolumeOutOfRange(_)
            | PlayerError::UnknownTrack { .. }
            | PlayerError::DurationUnknown(_) => ErrorCategory::Input,
        }
    }
}
