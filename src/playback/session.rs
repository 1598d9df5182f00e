use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::PlaybackSettings;
use crate::notice::{self, Notice};

use super::clock::{ProgressClock, SeekGuard};
use super::resource::{AudioResource, ResourceError, ResourceOpener, TrackEnd};
use super::types::{PlaybackError, PlaybackHandle, PlaybackStatus, SessionSnapshot};

/// Single-track playback state machine.
///
/// Holds at most one open resource at a time and releases it exactly once:
/// on the next `load`, on `unload`, or when the session is dropped. Methods
/// that depend on time take `now` so the clock can be driven from tests.
pub struct PlaybackSession<O: ResourceOpener> {
    opener: O,
    resource: Option<O::Resource>,
    track: Option<PathBuf>,
    status: PlaybackStatus,
    position: Duration,
    duration: Option<Duration>,
    clock: Option<ProgressClock>,
    seek_guard: SeekGuard,
    interval: Duration,
    skip_step: Duration,
    snapshot: PlaybackHandle,
    notices: Sender<Notice>,
}

impl<O: ResourceOpener> PlaybackSession<O> {
    pub fn new(opener: O, settings: &PlaybackSettings, notices: Sender<Notice>) -> Self {
        Self {
            opener,
            resource: None,
            track: None,
            status: PlaybackStatus::Empty,
            position: Duration::ZERO,
            duration: None,
            clock: None,
            seek_guard: SeekGuard::new(Duration::from_millis(settings.seek_quiescence_ms)),
            interval: Duration::from_millis(settings.progress_interval_ms),
            skip_step: Duration::from_secs(settings.skip_seconds),
            snapshot: Arc::new(Mutex::new(SessionSnapshot::default())),
            notices,
        }
    }

    /// Publish into an existing handle instead of a private one.
    pub fn with_snapshot_handle(mut self, handle: PlaybackHandle) -> Self {
        self.snapshot = handle;
        self.publish();
        self
    }

    pub fn snapshot_handle(&self) -> PlaybackHandle {
        self.snapshot.clone()
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            track: self.track.clone(),
            position: self.position,
            duration: self.duration,
            is_seeking: self.seek_guard.active(now),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn track(&self) -> Option<&Path> {
        self.track.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.resource.is_some()
    }

    pub fn is_seeking(&self, now: Instant) -> bool {
        self.seek_guard.active(now)
    }

    pub fn is_ticking(&self) -> bool {
        self.clock.is_some()
    }

    pub fn skip_step(&self) -> Duration {
        self.skip_step
    }

    /// When the session next wants a `tick`: the next clock tick while
    /// playing, or the end of an open seek window, whichever is sooner.
    pub fn next_deadline(&self) -> Option<Instant> {
        let clock = self.clock.as_ref().map(ProgressClock::next_tick);
        match (clock, self.seek_guard.until()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Bind `path` to the session and open it, releasing whatever was held.
    ///
    /// On success the session is `Ready` at position zero. On failure it is
    /// `Failed`, holds no resource, and one `LoadFailed` notice is sent.
    pub fn load(&mut self, path: impl Into<PathBuf>) -> Result<(), PlaybackError> {
        let path = path.into();
        self.release_resource();
        self.track = Some(path.clone());
        self.position = Duration::ZERO;
        self.duration = None;
        self.seek_guard.clear();
        self.set_status(PlaybackStatus::Loading);

        match self.opener.open(&path) {
            Ok(resource) => {
                let duration = resource.duration();
                info!(
                    "loaded {} ({})",
                    path.display(),
                    super::format_time(duration)
                );
                self.resource = Some(resource);
                self.duration = Some(duration);
                self.set_status(PlaybackStatus::Ready);
                Ok(())
            }
            Err(source) => {
                warn!("could not load {}: {source}", path.display());
                self.set_status(PlaybackStatus::Failed);
                notice::emit(
                    &self.notices,
                    Notice::LoadFailed {
                        path: path.clone(),
                        reason: source.to_string(),
                    },
                );
                Err(PlaybackError::DecodeLoad { path, source })
            }
        }
    }

    /// Toggle playback.
    ///
    /// Without an open resource this loads the bound track and leaves it
    /// `Ready`; the caller toggles again to start it.
    pub fn play_pause(&mut self, now: Instant) -> Result<(), PlaybackError> {
        if self.status == PlaybackStatus::Loading {
            return Err(PlaybackError::Busy);
        }
        let Some(resource) = self.resource.as_mut() else {
            let path = self.track.clone().ok_or(PlaybackError::NoTrack)?;
            return self.load(path);
        };

        if self.status == PlaybackStatus::Playing {
            resource.pause();
            if !self.seek_guard.active(now) {
                self.position = clamp_to(resource.current_time(), self.duration);
            }
            self.clock = None;
            self.set_status(PlaybackStatus::Paused);
            return Ok(());
        }

        if let Err(err) = resource.play() {
            self.fail_playback(&err);
            return Err(err.into());
        }
        self.clock = Some(ProgressClock::start(now, self.interval));
        self.set_status(PlaybackStatus::Playing);
        Ok(())
    }

    /// Halt and rewind to zero, keeping the track loaded. No-op when nothing is open.
    pub fn stop(&mut self) {
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        resource.stop();
        self.clock = None;
        self.seek_guard.clear();
        self.position = Duration::ZERO;
        self.set_status(PlaybackStatus::Stopped);
    }

    /// Move to `target_secs`, clamped into `[0, duration]`.
    ///
    /// Clock reads are ignored for the quiescence window that follows, so the
    /// position reported right after a seek is the one asked for. Returns the
    /// position actually applied.
    pub fn seek(&mut self, target_secs: f64, now: Instant) -> Result<Duration, PlaybackError> {
        let Some(resource) = self.resource.as_mut() else {
            return Err(PlaybackError::NotLoaded);
        };
        let duration = self.duration.unwrap_or_else(|| resource.duration());
        let target = clamp_seconds(target_secs, duration);

        if let Err(err) = resource.set_current_time(target) {
            warn!("seek to {target:?} failed: {err}");
            return Err(err.into());
        }
        debug!("seeked to {}", super::format_time(target));
        self.position = target;
        self.seek_guard.arm(now);
        self.publish_at(now);
        Ok(target)
    }

    /// Seek `delta` past the current position, stopping at the end of the track.
    pub fn skip_forward(&mut self, delta: Duration, now: Instant) -> Result<Duration, PlaybackError> {
        if self.resource.is_none() {
            return Err(PlaybackError::NotLoaded);
        }
        let target = self.position.saturating_add(delta);
        let target = clamp_to(target, self.duration);
        self.seek(target.as_secs_f64(), now)
    }

    /// Drive the progress clock and end-of-track detection, and close an
    /// expired seek window in any status.
    pub fn tick(&mut self, now: Instant) {
        if self.seek_guard.until().is_some_and(|until| now >= until) {
            self.seek_guard.clear();
            self.publish_at(now);
        }
        if self.status != PlaybackStatus::Playing {
            return;
        }
        let Some(resource) = self.resource.as_mut() else {
            return;
        };

        match resource.poll_end() {
            Some(TrackEnd::Finished) => {
                self.finish_track();
                return;
            }
            Some(TrackEnd::Failed(err)) => {
                self.fail_playback(&err);
                return;
            }
            None => {}
        }

        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        if !clock.due(now) {
            return;
        }
        clock.advance(now);

        if self.seek_guard.active(now) {
            return;
        }
        self.position = clamp_to(resource.current_time(), self.duration);
        self.publish_at(now);
    }

    /// Release the track and go back to `Empty`.
    pub fn unload(&mut self) {
        self.release_resource();
        self.track = None;
        self.position = Duration::ZERO;
        self.duration = None;
        self.seek_guard.clear();
        self.set_status(PlaybackStatus::Empty);
    }

    fn finish_track(&mut self) {
        if let Some(path) = &self.track {
            info!("finished {}", path.display());
        }
        if let Some(resource) = self.resource.as_mut() {
            resource.stop();
        }
        self.clock = None;
        self.seek_guard.clear();
        self.position = Duration::ZERO;
        self.set_status(PlaybackStatus::Stopped);
    }

    fn fail_playback(&mut self, err: &ResourceError) {
        warn!("playback failed: {err}");
        if let Some(resource) = self.resource.as_mut() {
            resource.stop();
        }
        self.clock = None;
        self.seek_guard.clear();
        self.position = Duration::ZERO;
        self.set_status(PlaybackStatus::Stopped);
        notice::emit(
            &self.notices,
            Notice::PlaybackFailed {
                reason: err.to_string(),
            },
        );
    }

    fn release_resource(&mut self) {
        self.clock = None;
        if let Some(resource) = self.resource.take() {
            if let Some(path) = &self.track {
                debug!("releasing {}", path.display());
            }
            resource.release();
        }
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            debug!("playback {:?} -> {:?}", self.status, status);
        }
        self.status = status;
        self.publish();
    }

    fn publish(&self) {
        self.publish_at(Instant::now());
    }

    fn publish_at(&self, now: Instant) {
        if let Ok(mut snap) = self.snapshot.lock() {
            *snap = self.snapshot(now);
        }
    }
}

impl<O: ResourceOpener> Drop for PlaybackSession<O> {
    fn drop(&mut self) {
        self.release_resource();
    }
}

fn clamp_to(position: Duration, duration: Option<Duration>) -> Duration {
    match duration {
        Some(d) => position.min(d),
        None => position,
    }
}

/// Negative and non-finite targets map to zero.
fn clamp_seconds(target_secs: f64, duration: Duration) -> Duration {
    if !target_secs.is_finite() || target_secs <= 0.0 {
        return Duration::ZERO;
    }
    if target_secs >= duration.as_secs_f64() {
        return duration;
    }
    Duration::from_secs_f64(target_secs)
}
