// src/player/mixer.rs
//! Coordinates the music and binaural channels as one playback transaction.

use std::sync::Arc;

use tracing::{info, warn};

use super::channel::Channel;
use super::error::PlayerError;
use crate::audio::{MediaBackend, PendingPlay};
use crate::catalog::{Catalog, CatalogError, CatalogProvider, ChannelKind};

/// Two channels, one play/pause state and at most one user-visible error.
pub struct Player {
    music: Channel,
    binaural: Channel,
    /// Whether playback was last commanded to start and succeeded.
    is_playing: bool,
    is_loading: bool,
    /// Most recent failure, cleared by the next successful operation.
    error: Option<String>,
}

impl Player {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            music: Channel::new(ChannelKind::Music, backend.clone()),
            binaural: Channel::new(ChannelKind::Binaural, backend),
            is_playing: false,
            is_loading: false,
            error: None,
        }
    }

    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::Music => &self.music,
            ChannelKind::Binaural => &self.binaural,
        }
    }

    fn channel_mut(&mut self, kind: ChannelKind) -> &mut Channel {
        match kind {
            ChannelKind::Music => &mut self.music,
            ChannelKind::Binaural => &mut self.binaural,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when at least one channel has a track to play.
    pub fn has_selection(&self) -> bool {
        ChannelKind::ALL
            .iter()
            .any(|k| self.channel(*k).selected_track_id().is_some())
    }

    /// True once a catalog has arrived and both lists are empty.
    pub fn library_is_empty(&self) -> bool {
        !self.is_loading && !self.music.is_enabled() && !self.binaural.is_enabled()
    }

    /// Mark the catalog fetch as in flight.
    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Fetch the catalog from `provider` and populate both channels.
    pub fn load_catalog(&mut self, provider: &dyn CatalogProvider) -> Result<(), PlayerError> {
        self.begin_loading();
        let fetched = provider.load();
        self.apply_catalog(fetched)
    }

    /// Populate both channels from a fetched catalog, auto-selecting the
    /// first track of each. On failure both channels are left empty.
    pub fn apply_catalog(&mut self, fetched: Result<Catalog, CatalogError>) -> Result<(), PlayerError> {
        self.is_loading = false;
        self.is_playing = false;

        let catalog = match fetched {
            Ok(catalog) => catalog,
            Err(err) => {
                for kind in ChannelKind::ALL {
                    let _ = self.channel_mut(kind).set_tracks(Vec::new());
                }
                return Err(self.fail(PlayerError::Catalog(err)));
            }
        };

        info!(
            music = catalog.music.len(),
            binaural = catalog.binaural.len(),
            "catalog loaded"
        );
        for kind in ChannelKind::ALL {
            let tracks = catalog.tracks(kind).to_vec();
            if let Err(err) = self.channel_mut(kind).set_tracks(tracks) {
                // The selection stands; pressing play retries the attach.
                self.fail(err);
            }
        }
        Ok(())
    }

    /// Start both channels together, or pause both.
    ///
    /// Start requests go out to every channel with a selection before any
    /// answer is awaited. If any start fails, every channel is paused again
    /// and the player stays not-playing.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        let eligible: Vec<ChannelKind> = ChannelKind::ALL
            .into_iter()
            .filter(|k| self.channel(*k).selected_track_id().is_some())
            .collect();
        if eligible.is_empty() {
            return Err(self.fail(PlayerError::NoSelection));
        }

        if self.is_playing {
            self.pause_all();
            info!("playback paused");
            self.error = None;
            return Ok(());
        }

        let mut failure: Option<PlayerError> = None;
        let mut pending: Vec<(ChannelKind, PendingPlay)> = Vec::new();
        for kind in eligible {
            match self.channel_mut(kind).begin_play() {
                Ok(request) => pending.push((kind, request)),
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }

        let answers: Vec<_> = pending
            .into_iter()
            .map(|(kind, request)| (kind, request.wait()))
            .collect();
        for (kind, answer) in answers {
            if let Err(err) = self.channel_mut(kind).finish_play(answer) {
                failure.get_or_insert(err);
            }
        }

        if let Some(err) = failure {
            self.pause_all();
            return Err(self.fail(start_failure(err)));
        }

        self.is_playing = true;
        self.error = None;
        info!("playback started");
        Ok(())
    }

    pub fn set_channel_volume(&mut self, kind: ChannelKind, volume: u8) -> Result<(), PlayerError> {
        let result = self.channel_mut(kind).set_volume(volume);
        self.settle(result)
    }

    /// Select a track on one channel. While the mix is playing, the new
    /// resource is started too.
    pub fn select_channel_track(&mut self, kind: ChannelKind, id: &str) -> Result<(), PlayerError> {
        let mut result = self.channel_mut(kind).select_track(id);

        let channel = self.channel(kind);
        if result.is_ok()
            && self.is_playing
            && channel.selected_track_id().is_some()
            && !channel.is_playing()
        {
            result = self.channel_mut(kind).play().map_err(start_failure);
            if result.is_err() {
                self.pause_all();
            }
        }

        self.sync_playing_flag();
        self.settle(result)
    }

    /// Whether tracks restart at their end. Applies to both channels.
    pub fn is_looping(&self) -> bool {
        self.music.is_looping()
    }

    pub fn set_looping(&mut self, looping: bool) {
        for kind in ChannelKind::ALL {
            self.channel_mut(kind).set_looping(looping);
        }
        info!(looping, "loop mode changed");
    }

    pub fn seek_channel(&mut self, kind: ChannelKind, seconds: f64) -> Result<(), PlayerError> {
        let result = self.channel_mut(kind).seek(seconds);
        self.settle(result)
    }

    /// Drain media events on both channels.
    pub fn tick(&mut self) {
        for kind in ChannelKind::ALL {
            if let Some(err) = self.channel_mut(kind).pump() {
                self.fail(err);
            }
        }
        self.sync_playing_flag();
    }

    /// Pause and release both media resources.
    pub fn shutdown(&mut self) {
        self.pause_all();
        for kind in ChannelKind::ALL {
            self.channel_mut(kind).detach();
        }
        info!("player shut down");
    }

    fn pause_all(&mut self) {
        for kind in ChannelKind::ALL {
            self.channel_mut(kind).pause();
        }
        self.is_playing = false;
    }

    /// A playing mix whose channels have all stopped is no longer playing.
    fn sync_playing_flag(&mut self) {
        if self.is_playing && !self.music.is_playing() && !self.binaural.is_playing() {
            self.is_playing = false;
        }
    }

    fn settle(&mut self, result: Result<(), PlayerError>) -> Result<(), PlayerError> {
        match result {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: PlayerError) -> PlayerError {
        warn!(category = ?err.category(), "{err}");
        self.error = Some(err.to_string());
        err
    }
}

/// A start the resource rejected reads as a failed play, not a failed load.
fn start_failure(err: PlayerError) -> PlayerError {
    match err {
        PlayerError::Playback { kind, source } => PlayerError::SyncPlayback { kind, source },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::audio::testing::{Call, FakeBackend};
    use crate::audio::MediaEvent;
    use crate::catalog::scanner::track_for_file;
    use crate::catalog::ManifestFile;
    use crate::player::{ErrorCategory, PlaybackState};

    const MUSIC_A: &str = "/audio/music/a.mp3";
    const MUSIC_B: &str = "/audio/music/b.mp3";
    const THETA: &str = "/audio/binaural/theta.wav";

    fn catalog(music: &[&str], binaural: &[&str]) -> Catalog {
        Catalog {
            music: music
                .iter()
                .map(|f| track_for_file(ChannelKind::Music, f))
                .collect(),
            binaural: binaural
                .iter()
                .map(|f| track_for_file(ChannelKind::Binaural, f))
                .collect(),
        }
    }

    fn loaded(backend: &FakeBackend, music: &[&str], binaural: &[&str]) -> Player {
        let mut player = Player::new(Arc::new(backend.clone()));
        player.load_catalog(&catalog(music, binaural)).unwrap();
        player
    }

    #[test]
    fn music_only_catalog_plays_music_alone() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &[]);

        let music = player.channel(ChannelKind::Music);
        assert_eq!(music.selected_track_id(), Some("a.mp3"));
        assert_eq!(music.selected_track().unwrap().name, "a");
        assert_eq!(music.selected_track().unwrap().url, MUSIC_A);
        assert!(!player.channel(ChannelKind::Binaural).is_enabled());

        player.toggle_play_pause().unwrap();
        assert!(player.is_playing());
        assert_eq!(backend.plays(), vec![MUSIC_A.to_string()]);
        assert_eq!(
            player.channel(ChannelKind::Binaural).state(),
            PlaybackState::Stopped
        );
    }

    #[test]
    fn empty_catalog_cannot_play() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &[], &[]);
        assert!(player.library_is_empty());

        let err = player.toggle_play_pause().unwrap_err();
        assert!(matches!(err, PlayerError::NoSelection));
        assert_eq!(err.category(), ErrorCategory::Selection);
        assert!(!player.is_playing());
        assert!(backend.calls().is_empty());
        assert_eq!(player.error(), Some("Please select at least one audio track"));
    }

    #[test]
    fn toggle_starts_both_then_pauses_both() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);
        backend.clear_calls();

        player.toggle_play_pause().unwrap();
        assert!(player.is_playing());
        assert_eq!(backend.plays(), vec![MUSIC_A.to_string(), THETA.to_string()]);
        for kind in ChannelKind::ALL {
            assert!(player.channel(kind).is_playing());
        }

        player.toggle_play_pause().unwrap();
        assert!(!player.is_playing());
        let calls = backend.calls();
        assert!(calls.contains(&Call::Pause(MUSIC_A.into())));
        assert!(calls.contains(&Call::Pause(THETA.into())));
        for kind in ChannelKind::ALL {
            assert_eq!(player.channel(kind).state(), PlaybackState::Stopped);
        }
    }

    #[test]
    fn partial_start_failure_pauses_the_started_channel() {
        let backend = FakeBackend::new();
        backend.fail_play(THETA);
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);
        backend.clear_calls();

        let err = player.toggle_play_pause().unwrap_err();
        assert!(matches!(
            err,
            PlayerError::SyncPlayback {
                kind: ChannelKind::Binaural,
                ..
            }
        ));
        assert_eq!(err.category(), ErrorCategory::Playback);
        assert!(!player.is_playing());
        assert_eq!(player.error(), Some("Failed to play audio. Please try again."));

        let calls = backend.calls();
        let started = calls.iter().position(|c| *c == Call::Play(MUSIC_A.into())).unwrap();
        let paused = calls.iter().position(|c| *c == Call::Pause(MUSIC_A.into())).unwrap();
        assert!(started < paused);
        assert!(!player.channel(ChannelKind::Music).is_playing());
    }

    #[test]
    fn volume_out_of_range_is_rejected_and_reported() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);

        for kind in ChannelKind::ALL {
            let err = player.set_channel_volume(kind, 150).unwrap_err();
            assert!(matches!(err, PlayerError::VolumeOutOfRange(150)));
            assert_eq!(player.channel(kind).volume(), 50);
            assert!(player.error().is_some());
        }

        player.set_channel_volume(ChannelKind::Music, 70).unwrap();
        assert_eq!(player.channel(ChannelKind::Music).volume(), 70);
        assert_eq!(player.channel(ChannelKind::Binaural).volume(), 50);
        assert_eq!(player.error(), None);
    }

    #[test]
    fn unknown_track_is_rejected() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3", "b.mp3"], &[]);
        let err = player
            .select_channel_track(ChannelKind::Music, "missing.mp3")
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(
            player.channel(ChannelKind::Music).selected_track_id(),
            Some("a.mp3")
        );
    }

    #[test]
    fn switching_track_while_playing_restarts_the_new_resource() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3", "b.mp3"], &["theta.wav"]);
        player.toggle_play_pause().unwrap();
        backend.clear_calls();

        player
            .select_channel_track(ChannelKind::Music, "b.mp3")
            .unwrap();
        assert!(player.is_playing());
        assert!(player.channel(ChannelKind::Music).is_playing());
        let calls = backend.calls();
        assert_eq!(calls.first(), Some(&Call::Close(MUSIC_A.into())));
        assert!(calls.contains(&Call::Play(MUSIC_B.into())));
    }

    #[test]
    fn switching_track_while_stopped_does_not_start_it() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3", "b.mp3"], &[]);
        player
            .select_channel_track(ChannelKind::Music, "b.mp3")
            .unwrap();
        assert!(backend.plays().is_empty());
        assert!(!player.is_playing());
    }

    #[test]
    fn seek_round_trips_through_telemetry() {
        let backend = FakeBackend::new();
        backend.set_duration(MUSIC_A, 300.0);
        let mut player = loaded(&backend, &["a.mp3"], &[]);
        assert!(matches!(
            player.seek_channel(ChannelKind::Binaural, 1.0),
            Err(PlayerError::NotSelected(ChannelKind::Binaural))
        ));

        player.tick();
        player.seek_channel(ChannelKind::Music, 42.5).unwrap();
        player.tick();
        assert_eq!(player.channel(ChannelKind::Music).current_time(), 42.5);
        assert!(backend
            .calls()
            .contains(&Call::Seek(MUSIC_A.into(), Duration::from_secs_f64(42.5))));

        player.seek_channel(ChannelKind::Music, 301.0).unwrap();
        player.tick();
        assert_eq!(player.channel(ChannelKind::Music).current_time(), 300.0);

        player.seek_channel(ChannelKind::Music, -1.0).unwrap();
        player.tick();
        assert_eq!(player.channel(ChannelKind::Music).current_time(), 0.0);
    }

    #[test]
    fn looping_channel_keeps_playing_at_end_of_stream() {
        let backend = FakeBackend::new();
        backend.set_duration(MUSIC_A, 60.0);
        let mut player = loaded(&backend, &["a.mp3"], &[]);
        player.toggle_play_pause().unwrap();

        backend.emit(MUSIC_A, MediaEvent::Position(Duration::from_secs(60)));
        player.tick();
        assert_eq!(player.channel(ChannelKind::Music).current_time(), 60.0);

        backend.emit(MUSIC_A, MediaEvent::Ended);
        player.tick();
        let music = player.channel(ChannelKind::Music);
        assert_eq!(music.current_time(), 0.0);
        assert_eq!(music.state(), PlaybackState::Playing);
        assert!(player.is_playing());
        assert_eq!(player.error(), None);
    }

    #[test]
    fn mix_stops_once_non_looping_tracks_end() {
        let backend = FakeBackend::new();
        backend.set_duration(MUSIC_A, 60.0);
        backend.set_duration(THETA, 30.0);
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);
        player.set_looping(false);
        assert!(!player.is_looping());
        assert!(backend.calls().contains(&Call::Looping(THETA.into(), false)));
        player.toggle_play_pause().unwrap();

        backend.emit(THETA, MediaEvent::Ended);
        player.tick();
        assert!(player.is_playing());

        backend.emit(MUSIC_A, MediaEvent::Ended);
        player.tick();
        assert!(!player.is_playing());
        assert_eq!(player.channel(ChannelKind::Music).current_time(), 60.0);
        assert_eq!(player.error(), None);
    }

    #[test]
    fn rejected_start_after_track_switch_reads_as_play_failure() {
        let backend = FakeBackend::new();
        backend.fail_play(MUSIC_B);
        let mut player = loaded(&backend, &["a.mp3", "b.mp3"], &["theta.wav"]);
        player.toggle_play_pause().unwrap();

        let err = player
            .select_channel_track(ChannelKind::Music, "b.mp3")
            .unwrap_err();
        assert!(matches!(err, PlayerError::SyncPlayback { kind: ChannelKind::Music, .. }));
        assert_eq!(player.error(), Some("Failed to play audio. Please try again."));
        assert!(!player.is_playing());
        assert_eq!(
            player.channel(ChannelKind::Binaural).state(),
            PlaybackState::Stopped
        );
    }

    #[test]
    fn pausing_twice_is_idempotent() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);
        player.toggle_play_pause().unwrap();
        player.toggle_play_pause().unwrap();

        let snapshot = |p: &Player| {
            (
                p.is_playing(),
                p.channel(ChannelKind::Music).state(),
                p.channel(ChannelKind::Music).current_time(),
                p.channel(ChannelKind::Binaural).state(),
            )
        };
        let once = snapshot(&player);
        player.channel_mut(ChannelKind::Music).pause();
        player.channel_mut(ChannelKind::Binaural).pause();
        assert_eq!(snapshot(&player), once);
    }

    #[test]
    fn catalog_failure_leaves_channels_empty() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);

        let missing = ManifestFile::new("/nonexistent/ambimix/audio-list.json");
        let err = player.load_catalog(&missing).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Catalog);
        assert!(!player.is_loading());
        assert!(player.library_is_empty());
        assert_eq!(
            player.error(),
            Some("Failed to load audio tracks. Restart to try again.")
        );
        assert!(player.toggle_play_pause().is_err());
    }

    #[test]
    fn mid_stream_failure_stops_the_mix_when_nothing_else_plays() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &[]);
        player.toggle_play_pause().unwrap();

        backend.emit(MUSIC_A, MediaEvent::Failed("device lost".into()));
        player.tick();
        assert!(!player.is_playing());
        assert!(player.error().unwrap().contains("device lost"));
    }

    #[test]
    fn attach_failure_on_load_is_reported_but_not_fatal() {
        let backend = FakeBackend::new();
        backend.fail_open(MUSIC_A);
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);

        assert!(player.error().unwrap().starts_with("Failed to load music track"));
        assert_eq!(
            player.channel(ChannelKind::Binaural).selected_track_id(),
            Some("theta.wav")
        );
        assert!(player.channel(ChannelKind::Binaural).is_attached());
    }

    #[test]
    fn shutdown_releases_both_resources() {
        let backend = FakeBackend::new();
        let mut player = loaded(&backend, &["a.mp3"], &["theta.wav"]);
        player.toggle_play_pause().unwrap();
        player.shutdown();

        assert!(!player.is_playing());
        let calls = backend.calls();
        assert!(calls.contains(&Call::Close(MUSIC_A.into())));
        assert!(calls.contains(&Call::Close(THETA.into())));
    }
}
