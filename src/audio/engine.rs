// src/audio/engine.rs
//! Playback engine using rodio. One thread owns the output stream and a sink
//! per attached resource, so both channels mix on the same device.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use super::media::{MediaBackend, MediaError, MediaEvent, MediaResource, PendingPlay};
use super::metadata::probe_duration;
use super::progress::ProgressTap;
use crate::catalog::{locator, ChannelKind, Track};

type Reply<T> = Sender<Result<T, MediaError>>;

/// Commands sent to the engine thread.
enum EngineCommand {
    Open {
        slot: u64,
        path: PathBuf,
        looping: Arc<AtomicBool>,
        events: Sender<MediaEvent>,
    },
    Play {
        slot: u64,
        reply: Reply<()>,
    },
    Pause {
        slot: u64,
    },
    Seek {
        slot: u64,
        position: Duration,
    },
    Volume {
        slot: u64,
        volume: f32,
    },
    Close {
        slot: u64,
    },
}

/// One attached track on the engine thread.
enum Slot {
    Ready {
        sink: Sink,
        events: Sender<MediaEvent>,
    },
    /// Opening or decoding failed; every play is rejected with this error.
    Broken(MediaError),
}

/// Media backend that plays files from the audio library through rodio.
pub struct RodioBackend {
    cmd_tx: Sender<EngineCommand>,
    next_slot: AtomicU64,
    library_root: PathBuf,
}

impl RodioBackend {
    /// Spawn the engine thread. Tracks resolve below `library_root`.
    pub fn new(library_root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel::<EngineCommand>();

        thread::spawn(move || {
            // The stream must stay on this thread for as long as sinks play.
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(err) => {
                    warn!("no audio output: {err}");
                    // Answer commands until the sender is dropped, then return.
                    while let Ok(cmd) = rx.recv() {
                        reject(cmd, MediaError::NoOutput);
                    }
                    return;
                }
            };
            info!("audio engine started");

            let mut slots: HashMap<u64, Slot> = HashMap::new();
            while let Ok(cmd) = rx.recv() {
                handle_command(&handle, &mut slots, cmd);
            }

            // If the command channel closed, make sure every sink stops.
            for (_, slot) in slots.drain() {
                if let Slot::Ready { sink, .. } = slot {
                    sink.stop();
                }
            }
            drop(stream);
            debug!("audio engine stopped");
        });

        Self {
            cmd_tx: tx,
            next_slot: AtomicU64::new(1),
            library_root: library_root.into(),
        }
    }
}

impl MediaBackend for RodioBackend {
    fn open(
        &self,
        kind: ChannelKind,
        track: &Track,
        events: Sender<MediaEvent>,
    ) -> Result<Box<dyn MediaResource>, MediaError> {
        let path = locator::resolve(&self.library_root, &track.url)
            .ok_or_else(|| MediaError::Locator(track.url.clone()))?;
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
        let looping = Arc::new(AtomicBool::new(true));

        debug!(%kind, slot, path = %path.display(), "attaching media resource");
        self.cmd_tx
            .send(EngineCommand::Open {
                slot,
                path,
                looping: looping.clone(),
                events,
            })
            .map_err(|_| MediaError::Disconnected)?;

        Ok(Box::new(RodioResource {
            slot,
            cmd_tx: self.cmd_tx.clone(),
            looping,
        }))
    }
}

/// Handle to one engine slot; closes the slot when dropped.
pub struct RodioResource {
    slot: u64,
    cmd_tx: Sender<EngineCommand>,
    looping: Arc<AtomicBool>,
}

impl MediaResource for RodioResource {
    fn play(&mut self) -> PendingPlay {
        let (reply, pending) = PendingPlay::channel();
        // A closed engine drops `reply`, which `wait` reports as disconnected.
        let _ = self.cmd_tx.send(EngineCommand::Play {
            slot: self.slot,
            reply,
        });
        pending
    }

    fn pause(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Pause { slot: self.slot });
    }

    fn seek(&mut self, position: Duration) -> Result<(), MediaError> {
        self.cmd_tx
            .send(EngineCommand::Seek {
                slot: self.slot,
                position,
            })
            .map_err(|_| MediaError::Disconnected)
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.cmd_tx.send(EngineCommand::Volume {
            slot: self.slot,
            volume: volume.clamp(0.0, 1.0),
        });
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping.store(looping, Ordering::SeqCst);
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Close { slot: self.slot });
    }
}

fn handle_command(handle: &OutputStreamHandle, slots: &mut HashMap<u64, Slot>, cmd: EngineCommand) {
    match cmd {
        EngineCommand::Open {
            slot,
            path,
            looping,
            events,
        } => {
            let opened = open_sink(handle, &path, looping, events.clone());
            let state = match opened {
                Ok(sink) => Slot::Ready { sink, events },
                Err(err) => {
                    warn!(slot, "{err}");
                    let _ = events.send(MediaEvent::Failed(err.to_string()));
                    Slot::Broken(err)
                }
            };
            slots.insert(slot, state);
        }
        EngineCommand::Play { slot, reply } => {
            let result = match slots.get(&slot) {
                Some(Slot::Ready { sink, .. }) => {
                    sink.play();
                    Ok(())
                }
                Some(Slot::Broken(err)) => Err(err.clone()),
                None => Err(MediaError::Disconnected),
            };
            let _ = reply.send(result);
        }
        EngineCommand::Pause { slot } => {
            if let Some(Slot::Ready { sink, .. }) = slots.get(&slot) {
                sink.pause();
            }
        }
        EngineCommand::Seek { slot, position } => {
            // The tap reports the new position itself once the seek lands.
            if let Some(Slot::Ready { sink, events }) = slots.get(&slot) {
                if let Err(err) = sink.try_seek(position) {
                    debug!(slot, "seek failed: {err}");
                    let _ = events.send(MediaEvent::SeekFailed(err.to_string()));
                }
            }
        }
        EngineCommand::Volume { slot, volume } => {
            if let Some(Slot::Ready { sink, .. }) = slots.get(&slot) {
                sink.set_volume(volume);
            }
        }
        EngineCommand::Close { slot } => {
            if let Some(Slot::Ready { sink, .. }) = slots.remove(&slot) {
                sink.stop();
            }
            debug!(slot, "released media resource");
        }
    }
}

/// Decode `path` into a paused sink and announce its duration.
fn open_sink(
    handle: &OutputStreamHandle,
    path: &Path,
    looping: Arc<AtomicBool>,
    events: Sender<MediaEvent>,
) -> Result<Sink, MediaError> {
    let display = path.display().to_string();

    let file = File::open(path).map_err(|e| MediaError::Open {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let duration = source.total_duration().or_else(|| match probe_duration(path) {
        Ok(found) => found,
        Err(err) => {
            let probe_path = &display;
            debug!(path = %probe_path, "duration probe failed: {err}");
            None
        }
    });

    let sink = Sink::try_new(handle).map_err(|e| MediaError::Open {
        path: display,
        reason: e.to_string(),
    })?;
    sink.pause();
    sink.append(ProgressTap::new(
        source.convert_samples::<f32>(),
        events.clone(),
        looping,
    ));

    if let Some(duration) = duration {
        let _ = events.send(MediaEvent::DurationKnown(duration));
    }
    Ok(sink)
}

/// Answer a command when no output device exists.
fn reject(cmd: EngineCommand, err: MediaError) {
    match cmd {
        EngineCommand::Open { events, .. } => {
            let _ = events.send(MediaEvent::Failed(err.to_string()));
        }
        EngineCommand::Play { reply, .. } => {
            let _ = reply.send(Err(err));
        }
        EngineCommand::Pause { .. }
        | EngineCommand::Seek { .. }
        | EngineCommand::Volume { .. }
        | EngineCommand::Close { .. } => {}
    }
}
