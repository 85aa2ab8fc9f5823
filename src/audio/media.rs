// src/audio/media.rs
//! The seam between a channel and whatever actually decodes and plays a track.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::Duration,
};

use thiserror::Error;

use crate::catalog::{ChannelKind, Track};

/// Notifications pushed by a media resource to its owning channel.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved (progress or seek).
    Position(Duration),
    /// Total length became known.
    DurationKnown(Duration),
    /// The stream ran out. A looping resource has already rewound to 0.
    Ended,
    /// A seek request could not be carried out; playback is unaffected.
    SeekFailed(String),
    /// The resource can no longer play.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("no audio output device is available")]
    NoOutput,

    #[error("cannot resolve `{0}` inside the audio library")]
    Locator(String),

    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("the audio engine has stopped")]
    Disconnected,
}

/// A start request that has been issued but not yet confirmed.
///
/// Several of these can be outstanding at once; waiting on one does not hold
/// up the others.
#[must_use = "a play request does nothing until it is waited on"]
pub struct PendingPlay {
    rx: Receiver<Result<(), MediaError>>,
}

impl PendingPlay {
    /// A request plus the sender the backend uses to answer it.
    pub fn channel() -> (Sender<Result<(), MediaError>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// A request that is already answered.
    pub fn ready(result: Result<(), MediaError>) -> Self {
        let (tx, pending) = Self::channel();
        let _ = tx.send(result);
        pending
    }

    /// Block until the backend confirms or rejects the start.
    ///
    /// The wait covers only the engine's own queue: a start queued behind an
    /// attach waits for that track's header decode, never for network or
    /// playback progress.
    pub fn wait(self) -> Result<(), MediaError> {
        self.rx.recv().unwrap_or(Err(MediaError::Disconnected))
    }
}

/// A live, attached player bound to one track. Released on drop.
pub trait MediaResource: Send {
    /// Ask the resource to start from its current position.
    fn play(&mut self) -> PendingPlay;

    /// Stop output, keeping the position.
    fn pause(&mut self);

    /// Request a move of the read cursor without waiting for it.
    ///
    /// Success arrives as a `Position` event, failure as `SeekFailed`. An
    /// error here means the request could not even be queued.
    fn seek(&mut self, position: Duration) -> Result<(), MediaError>;

    /// Linear gain in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);

    fn set_looping(&mut self, looping: bool);
}

/// Creates media resources for tracks.
pub trait MediaBackend: Send + Sync {
    /// Attach a new resource for `track`; it reports through `events`.
    fn open(
        &self,
        kind: ChannelKind,
        track: &Track,
        events: Sender<MediaEvent>,
    ) -> Result<Box<dyn MediaResource>, MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_play_reports_answer() {
        assert_eq!(PendingPlay::ready(Ok(())).wait(), Ok(()));

        let (tx, pending) = PendingPlay::channel();
        tx.send(Err(MediaError::NoOutput)).unwrap();
        assert_eq!(pending.wait(), Err(MediaError::NoOutput));
    }

    #[test]
    fn dropped_backend_reads_as_disconnected() {
        let (tx, pending) = PendingPlay::channel();
        drop(tx);
        assert_eq!(pending.wait(), Err(MediaError::Disconnected));
    }
}
