// src/player/channel.rs
//! One audio slot: its track list, selection, volume and playback telemetry.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::error::PlayerError;
use crate::audio::{MediaBackend, MediaError, MediaEvent, MediaResource, PendingPlay};
use crate::catalog::{ChannelKind, Track};

/// Volume a channel starts with.
pub const DEFAULT_VOLUME: u8 = 50;
/// Upper bound of the volume scale.
pub const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// The attached media resource and the events it pushes back.
struct Attached {
    resource: Box<dyn MediaResource>,
    events: Receiver<MediaEvent>,
}

pub struct Channel {
    kind: ChannelKind,
    backend: Arc<dyn MediaBackend>,
    tracks: Vec<Track>,
    selected: Option<String>,
    volume: u8,
    state: PlaybackState,
    current_time: f64,
    duration: Option<f64>,
    looping: bool,
    /// A non-looping resource reached its end and has nothing left to play.
    finished: bool,
    media: Option<Attached>,
}

impl Channel {
    pub fn new(kind: ChannelKind, backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            kind,
            backend,
            tracks: Vec::new(),
            selected: None,
            volume: DEFAULT_VOLUME,
            state: PlaybackState::Stopped,
            current_time: 0.0,
            duration: None,
            looping: true,
            finished: false,
            media: None,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// A channel with no tracks has its selector disabled.
    pub fn is_enabled(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        let id = self.selected.as_deref()?;
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Seconds from the start of the track.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Track length in seconds, once the resource has reported it.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// `0..=100`; 0 while the duration is unknown or zero.
    pub fn progress_percent(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (100.0 * self.current_time / d).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_attached(&self) -> bool {
        self.media.is_some()
    }

    /// Replace the track list and select its first entry, if any.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) -> Result<(), PlayerError> {
        self.detach();
        self.selected = None;
        self.tracks = tracks;
        match self.tracks.first().map(|t| t.id.clone()) {
            Some(first) => self.select_track(&first),
            None => Ok(()),
        }
    }

    /// Select `id`, or deselect with an empty id.
    ///
    /// The previous resource is released and a new one attached; position
    /// and duration start over. Playback does not resume on its own.
    pub fn select_track(&mut self, id: &str) -> Result<(), PlayerError> {
        if id.is_empty() {
            self.detach();
            self.selected = None;
            return Ok(());
        }

        let track = self
            .tracks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| PlayerError::UnknownTrack {
                kind: self.kind,
                id: id.to_string(),
            })?;

        if self.selected.as_deref() == Some(id) && self.media.is_some() && !self.finished {
            return Ok(());
        }

        self.detach();
        self.selected = Some(track.id.clone());
        self.attach(&track)
    }

    /// Step through the track list with wrap-around; `None` when empty.
    pub fn adjacent_track_id(&self, step: isize) -> Option<&str> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len() as isize;
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.tracks.iter().position(|t| t.id == id));

        let next = match current {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            // Nothing selected yet: start from the first or last track.
            None if step >= 0 => 0,
            None => len - 1,
        };
        Some(self.tracks[next as usize].id.as_str())
    }

    pub fn set_volume(&mut self, volume: u8) -> Result<(), PlayerError> {
        if volume > MAX_VOLUME {
            return Err(PlayerError::VolumeOutOfRange(volume));
        }
        self.volume = volume;
        if let Some(media) = self.media.as_mut() {
            media.resource.set_volume(gain(volume));
        }
        Ok(())
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if let Some(media) = self.media.as_mut() {
            media.resource.set_looping(looping);
        }
    }

    /// Issue a start request without waiting for it.
    ///
    /// A channel without a live resource (never attached, failed, or played
    /// to the end without looping) attaches a fresh one first.
    pub fn begin_play(&mut self) -> Result<PendingPlay, PlayerError> {
        if self.media.is_none() || self.finished {
            let track = self
                .selected_track()
                .cloned()
                .ok_or(PlayerError::NotSelected(self.kind))?;
            self.detach();
            self.attach(&track)?;
        }
        match self.media.as_mut() {
            Some(media) => Ok(media.resource.play()),
            None => Err(PlayerError::NotSelected(self.kind)),
        }
    }

    /// Record the answer to a start request.
    pub fn finish_play(&mut self, result: Result<(), MediaError>) -> Result<(), PlayerError> {
        match result {
            Ok(()) => {
                self.state = PlaybackState::Playing;
                Ok(())
            }
            Err(source) => {
                self.state = PlaybackState::Stopped;
                Err(PlayerError::Playback {
                    kind: self.kind,
                    source,
                })
            }
        }
    }

    /// Start playback from the current position and wait for confirmation.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        let pending = self.begin_play()?;
        self.finish_play(pending.wait())
    }

    /// Stop output, keeping the position.
    pub fn pause(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.resource.pause();
        }
        self.state = PlaybackState::Stopped;
    }

    /// Reposition to `target` seconds, clamped to `[0, duration]`.
    pub fn seek(&mut self, target: f64) -> Result<(), PlayerError> {
        if self.selected.is_none() {
            return Err(PlayerError::NotSelected(self.kind));
        }
        let duration = self
            .duration
            .ok_or(PlayerError::DurationUnknown(self.kind))?;
        let target = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, duration)
        };

        if let Some(media) = self.media.as_mut() {
            media
                .resource
                .seek(Duration::from_secs_f64(target))
                .map_err(|source| PlayerError::Seek {
                    kind: self.kind,
                    source,
                })?;
        }
        self.current_time = target;
        Ok(())
    }

    /// Apply every event the resource has pushed since the last call.
    /// Returns the last failure the resource reported, if any.
    pub fn pump(&mut self) -> Option<PlayerError> {
        let events: Vec<MediaEvent> = match &self.media {
            Some(media) => media.events.try_iter().collect(),
            None => return None,
        };

        let mut failure = None;
        for event in events {
            if let Some(err) = self.apply(event) {
                failure = Some(err);
            }
            // Anything queued behind a failure came from the released resource.
            if self.media.is_none() {
                break;
            }
        }
        failure
    }

    /// Release the resource and reset telemetry. The selection is kept.
    pub fn detach(&mut self) {
        if self.media.take().is_some() {
            debug!(kind = %self.kind, "detached media resource");
        }
        self.state = PlaybackState::Stopped;
        self.finished = false;
        self.current_time = 0.0;
        self.duration = None;
    }

    fn attach(&mut self, track: &Track) -> Result<(), PlayerError> {
        let (tx, rx) = mpsc::channel();
        let mut resource =
            self.backend
                .open(self.kind, track, tx)
                .map_err(|source| PlayerError::Playback {
                    kind: self.kind,
                    source,
                })?;
        resource.set_volume(gain(self.volume));
        resource.set_looping(self.looping);
        self.media = Some(Attached {
            resource,
            events: rx,
        });
        debug!(kind = %self.kind, track = %track.id, "attached media resource");
        Ok(())
    }

    fn apply(&mut self, event: MediaEvent) -> Option<PlayerError> {
        match event {
            MediaEvent::Position(position) => {
                self.current_time = self.clamp_time(position.as_secs_f64());
            }
            MediaEvent::DurationKnown(duration) => {
                self.duration = Some(duration.as_secs_f64());
                self.current_time = self.clamp_time(self.current_time);
            }
            MediaEvent::Ended => {
                if self.looping {
                    self.current_time = 0.0;
                } else {
                    self.state = PlaybackState::Stopped;
                    self.finished = true;
                    self.current_time = self.duration.unwrap_or(self.current_time);
                }
            }
            MediaEvent::SeekFailed(reason) => {
                return Some(PlayerError::Seek {
                    kind: self.kind,
                    source: MediaError::Seek(reason),
                });
            }
            MediaEvent::Failed(reason) => {
                let path = self
                    .selected_track()
                    .map(|t| t.url.clone())
                    .unwrap_or_default();
                // The resource is dead; the selection stays so play or reselect attaches anew.
                self.detach();
                return Some(PlayerError::Playback {
                    kind: self.kind,
                    source: MediaError::Decode { path, reason },
                });
            }
        }
        None
    }

    fn clamp_time(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        match self.duration {
            Some(d) => seconds.min(d),
            None => seconds,
        }
    }
}

/// Map the 0..=100 volume scale onto linear gain.
fn gain(volume: u8) -> f32 {
    f32::from(volume) / f32::from(MAX_VOLUME)
}
