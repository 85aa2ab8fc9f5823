// src/audio/progress.rs
//! A wrapper source that reports playback progress to the owning channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use rodio::source::SeekError;
use rodio::Source;

use super::media::MediaEvent;

/// Position reports per second of audio.
const REPORTS_PER_SEC: u64 = 10;

/// Passes samples through while pushing position, end-of-stream and
/// failure events. When `looping` is set, exhaustion rewinds to the start.
pub struct ProgressTap<S> {
    source: S,
    events: Sender<MediaEvent>,
    looping: Arc<AtomicBool>,
    /// Interleaved samples played since position 0.
    played: u64,
    since_report: u64,
    finished: bool,
}

impl<S> ProgressTap<S> {
    pub fn new(source: S, events: Sender<MediaEvent>, looping: Arc<AtomicBool>) -> Self {
        Self {
            source,
            events,
            looping,
            played: 0,
            since_report: 0,
            finished: false,
        }
    }
}

impl<S> ProgressTap<S>
where
    S: Source<Item = f32>,
{
    fn samples_per_sec(&self) -> u64 {
        (self.source.sample_rate() as u64 * self.source.channels() as u64).max(1)
    }

    fn position(&self) -> Duration {
        Duration::from_secs_f64(self.played as f64 / self.samples_per_sec() as f64)
    }

    fn report(&self, event: MediaEvent) {
        // The channel may already have detached; nothing to do then.
        let _ = self.events.send(event);
    }

    fn rewind(&mut self) -> bool {
        match self.source.try_seek(Duration::ZERO) {
            Ok(()) => {
                self.played = 0;
                self.since_report = 0;
                self.report(MediaEvent::Position(Duration::ZERO));
                true
            }
            Err(err) => {
                self.report(MediaEvent::Failed(format!("cannot loop: {err}")));
                false
            }
        }
    }
}

impl<S> Iterator for ProgressTap<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let sample = match self.source.next() {
            Some(sample) => sample,
            None => {
                self.report(MediaEvent::Ended);
                if !self.looping.load(Ordering::SeqCst) || !self.rewind() {
                    self.finished = true;
                    return None;
                }
                match self.source.next() {
                    Some(sample) => sample,
                    None => {
                        // Nothing to loop over.
                        self.finished = true;
                        return None;
                    }
                }
            }
        };

        self.played += 1;
        self.since_report += 1;
        if self.since_report >= self.samples_per_sec() / REPORTS_PER_SEC {
            self.since_report = 0;
            self.report(MediaEvent::Position(Self::position(self)));
        }
        Some(sample)
    }
}

impl<S> Source for ProgressTap<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.source.try_seek(pos)?;
        self.played = (pos.as_secs_f64() * self.samples_per_sec() as f64) as u64;
        self.since_report = 0;
        self.finished = false;
        self.report(MediaEvent::Position(pos));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    /// Mono 10 Hz source: one second is ten samples.
    struct Ramp {
        samples: Vec<f32>,
        cursor: usize,
    }

    impl Ramp {
        fn seconds(secs: usize) -> Self {
            Self {
                samples: (0..secs * 10).map(|i| i as f32).collect(),
                cursor: 0,
            }
        }
    }

    impl Iterator for Ramp {
        type Item = f32;
        fn next(&mut self) -> Option<f32> {
            let s = self.samples.get(self.cursor).copied();
            self.cursor += 1;
            s
        }
    }

    impl Source for Ramp {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }
        fn channels(&self) -> u16 {
            1
        }
        fn sample_rate(&self) -> u32 {
            10
        }
        fn total_duration(&self) -> Option<Duration> {
            Some(Duration::from_secs(self.samples.len() as u64 / 10))
        }
        fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
            self.cursor = (pos.as_secs_f64() * 10.0) as usize;
            Ok(())
        }
    }

    fn tap(secs: usize, looping: bool) -> (ProgressTap<Ramp>, mpsc::Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel();
        let tap = ProgressTap::new(Ramp::seconds(secs), tx, Arc::new(AtomicBool::new(looping)));
        (tap, rx)
    }

    #[test]
    fn reports_position_and_end() {
        let (tap, rx) = tap(2, false);
        assert_eq!(tap.count(), 20);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.last(), Some(&MediaEvent::Ended));
        assert!(events.contains(&MediaEvent::Position(Duration::from_secs(1))));
        assert!(events.contains(&MediaEvent::Position(Duration::from_secs(2))));
    }

    #[test]
    fn looping_rewinds_instead_of_ending() {
        let (mut tap, rx) = tap(1, true);
        let played: Vec<f32> = tap.by_ref().take(15).collect();
        assert_eq!(played[10], 0.0);
        assert_eq!(played[14], 4.0);

        let events: Vec<_> = rx.try_iter().collect();
        let ended = events.iter().position(|e| *e == MediaEvent::Ended).unwrap();
        assert_eq!(events[ended + 1], MediaEvent::Position(Duration::ZERO));
    }

    #[test]
    fn seek_moves_reported_position() {
        let (mut tap, rx) = tap(5, false);
        tap.try_seek(Duration::from_secs(3)).unwrap();
        assert_eq!(rx.try_recv(), Ok(MediaEvent::Position(Duration::from_secs(3))));
        assert_eq!(tap.next(), Some(30.0));
    }
}
