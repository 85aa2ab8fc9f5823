// src/audio/testing.rs
//! Scripted media backend for unit tests: records every call and lets the
//! test push events as if playback were progressing.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::media::{MediaBackend, MediaError, MediaEvent, MediaResource, PendingPlay};
use crate::catalog::{ChannelKind, Track};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(String),
    Play(String),
    Pause(String),
    Seek(String, Duration),
    Volume(String, f32),
    Looping(String, bool),
    Close(String),
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    fail_open: HashSet<String>,
    fail_play: HashSet<String>,
    durations: HashMap<String, Duration>,
    events: HashMap<String, Sender<MediaEvent>>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    script: Arc<Mutex<Script>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    /// Opening `url` fails synchronously.
    pub fn fail_open(&self, url: &str) {
        self.script().fail_open.insert(url.to_string());
    }

    /// Playing `url` is rejected.
    pub fn fail_play(&self, url: &str) {
        self.script().fail_play.insert(url.to_string());
    }

    /// Report `secs` as the duration right after `url` is opened.
    pub fn set_duration(&self, url: &str, secs: f64) {
        self.script()
            .durations
            .insert(url.to_string(), Duration::from_secs_f64(secs));
    }

    /// Push an event from the most recent resource opened for `url`.
    pub fn emit(&self, url: &str, event: MediaEvent) {
        let script = self.script();
        let tx = script.events.get(url).expect("resource was never opened");
        tx.send(event).expect("channel detached");
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub fn plays(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Play(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.script().calls.clear();
    }
}

impl MediaBackend for FakeBackend {
    fn open(
        &self,
        _kind: ChannelKind,
        track: &Track,
        events: Sender<MediaEvent>,
    ) -> Result<Box<dyn MediaResource>, MediaError> {
        let mut script = self.script();
        script.calls.push(Call::Open(track.url.clone()));
        if script.fail_open.contains(&track.url) {
            return Err(MediaError::Open {
                path: track.url.clone(),
                reason: "scripted failure".into(),
            });
        }
        if let Some(duration) = script.durations.get(&track.url) {
            let _ = events.send(MediaEvent::DurationKnown(*duration));
        }
        script.events.insert(track.url.clone(), events);

        Ok(Box::new(FakeResource {
            url: track.url.clone(),
            script: self.script.clone(),
        }))
    }
}

struct FakeResource {
    url: String,
    script: Arc<Mutex<Script>>,
}

impl FakeResource {
    fn record(&self, call: Call) -> MutexGuard<'_, Script> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call);
        script
    }
}

impl MediaResource for FakeResource {
    fn play(&mut self) -> PendingPlay {
        let script = self.record(Call::Play(self.url.clone()));
        if script.fail_play.contains(&self.url) {
            PendingPlay::ready(Err(MediaError::Decode {
                path: self.url.clone(),
                reason: "scripted failure".into(),
            }))
        } else {
            PendingPlay::ready(Ok(()))
        }
    }

    fn pause(&mut self) {
        self.record(Call::Pause(self.url.clone()));
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        let script = self.record(Call::Seek(self.url.clone(), position));
        if let Some(tx) = script.events.get(&self.url) {
            let _ = tx.send(MediaEvent::Position(position));
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Call::Volume(self.url.clone(), volume));
    }

    fn set_looping(&mut self, looping: bool) {
        self.record(Call::Looping(self.url.clone(), looping));
    }
}

impl Drop for FakeResource {
    fn drop(&mut self) {
        self.record(Call::Close(self.url.clone()));
    }
}
