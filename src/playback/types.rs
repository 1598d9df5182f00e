//! Playback session types and handles.
//!
//! This module defines the status enum, the commands accepted by the session
//! thread, the snapshot published for the UI and the session error type.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::resource::ResourceError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// No track bound to the session.
    #[default]
    Empty,
    /// Opening the decoder for the bound track.
    Loading,
    /// Loaded and positioned at the start, never played.
    Ready,
    Playing,
    Paused,
    /// Halted at position zero; the track stays loaded.
    Stopped,
    /// The last load failed; no decoder is held.
    Failed,
}

impl PlaybackStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }
}

#[derive(Debug)]
pub enum SessionCmd {
    /// Release the current track and open `path`.
    Load(PathBuf),
    /// Toggle between playing and paused; loads the bound track if needed.
    PlayPause,
    /// Halt and rewind to zero.
    Stop,
    /// Jump to the given second, clamped to the track.
    SeekTo(f64),
    /// Jump forward by the given amount, capped at the end of the track.
    SkipForward(Duration),
    /// Release the track and return to `Empty`.
    Unload,
    /// Tear the session down and end the thread.
    Quit,
}

/// Session state shared with the UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub status: PlaybackStatus,
    /// Track bound to the session, if any.
    pub track: Option<PathBuf>,
    pub position: Duration,
    /// Known once the track is loaded.
    pub duration: Option<Duration>,
    pub is_seeking: bool,
}

impl SessionSnapshot {
    pub fn position_seconds(&self) -> f64 {
        self.position.as_secs_f64()
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    /// Position as a `0.0..=1.0` fraction of the duration, for sliders.
    pub fn progress_fraction(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => (self.position.as_secs_f64() / d.as_secs_f64()).min(1.0),
            _ => 0.0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<SessionSnapshot>>;

/// `m:ss`, minutes unpadded.
pub fn format_time(t: Duration) -> String {
    let secs = t.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("failed to load {}", .path.display())]
    DecodeLoad {
        path: PathBuf,
        #[source]
        source: ResourceError,
    },
    #[error("no track has been selected")]
    NoTrack,
    #[error("no track is loaded")]
    NotLoaded,
    #[error("a track is still loading")]
    Busy,
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
