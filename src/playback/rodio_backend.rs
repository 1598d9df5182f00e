//! `rodio` implementation of the resource boundary.
//!
//! One `RodioOpener` owns the output stream; each opened track gets its own
//! paused `Sink` on the stream's mixer.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::resource::{AudioResource, ResourceError, ResourceOpener, TrackEnd};

pub struct RodioOpener {
    stream: OutputStream,
}

impl RodioOpener {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, ResourceError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| ResourceError::Output(err.to_string()))?;
        // rodio logs to stderr when the stream is dropped.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl ResourceOpener for RodioOpener {
    type Resource = RodioResource;

    fn open(&mut self, path: &Path) -> Result<RodioResource, ResourceError> {
        let source = decode(path)?;
        let duration = probe_duration(path)
            .or_else(|| source.total_duration())
            .unwrap_or(Duration::ZERO);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(RodioResource {
            path: path.to_path_buf(),
            sink,
            duration,
            ended: false,
        })
    }
}

pub struct RodioResource {
    path: PathBuf,
    sink: Sink,
    duration: Duration,
    ended: bool,
}

impl RodioResource {
    /// Queue the file again once the sink has drained it.
    fn refill(&mut self) -> Result<(), ResourceError> {
        if self.sink.empty() {
            self.sink.append(decode(&self.path)?);
        }
        Ok(())
    }
}

impl AudioResource for RodioResource {
    fn play(&mut self) -> Result<(), ResourceError> {
        self.refill()?;
        self.ended = false;
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.pause();
        if self.sink.empty() {
            return;
        }
        if let Err(err) = self.sink.try_seek(Duration::ZERO) {
            // Drop the queue instead; `play` decodes the file again.
            debug!("rewind of {} failed, clearing: {err}", self.path.display());
            self.sink.clear();
        }
    }

    fn current_time(&self) -> Duration {
        if self.sink.empty() {
            return Duration::ZERO;
        }
        self.sink.get_pos()
    }

    fn set_current_time(&mut self, position: Duration) -> Result<(), ResourceError> {
        self.refill()?;
        self.sink
            .try_seek(position)
            .map_err(|err| ResourceError::Seek(err.to_string()))
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn poll_end(&mut self) -> Option<TrackEnd> {
        if self.ended || self.sink.is_paused() || !self.sink.empty() {
            return None;
        }
        self.ended = true;
        Some(TrackEnd::Finished)
    }

    fn release(self) {
        self.sink.stop();
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, ResourceError> {
    let file = File::open(path).map_err(|source| ResourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|err| ResourceError::Decode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Duration from the container headers; more reliable than the decoder's estimate.
fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}
