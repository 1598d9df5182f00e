//! The decoder boundary the session drives.

use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("seek failed: {0}")]
    Seek(String),
    #[error("playback interrupted: {0}")]
    Interrupted(String),
}

/// How a track stopped on its own.
#[derive(Debug)]
pub enum TrackEnd {
    Finished,
    Failed(ResourceError),
}

/// One opened, playable track.
pub trait AudioResource {
    /// Start or resume. After a `Finished` end this restarts from zero.
    fn play(&mut self) -> Result<(), ResourceError>;

    fn pause(&mut self);

    /// Halt and rewind to the start.
    fn stop(&mut self);

    fn current_time(&self) -> Duration;

    fn set_current_time(&mut self, position: Duration) -> Result<(), ResourceError>;

    fn duration(&self) -> Duration;

    /// Reports the end of playback once, after the track stops by itself.
    fn poll_end(&mut self) -> Option<TrackEnd>;

    /// Close the decoder. Consumes the resource so it cannot be released twice.
    fn release(self)
    where
        Self: Sized;
}

/// Opens tracks into resources.
pub trait ResourceOpener {
    type Resource: AudioResource;

    fn open(&mut self, path: &Path) -> Result<Self::Resource, ResourceError>;
}
