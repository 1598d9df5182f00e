//! Single-track playback.
//!
//! `PlaybackSession` is the state machine; it drives any `ResourceOpener`,
//! with `RodioOpener` as the real audio backend. `SessionPlayer` runs a
//! session on its own thread and publishes `SessionSnapshot`s.

mod clock;
mod player;
mod resource;
mod rodio_backend;
mod session;
mod thread;
mod types;

pub use clock::{ProgressClock, SeekGuard};
pub use player::SessionPlayer;
pub use resource::{AudioResource, ResourceError, ResourceOpener, TrackEnd};
pub use rodio_backend::{RodioOpener, RodioResource};
pub use session::PlaybackSession;
pub use types::{
    PlaybackError, PlaybackHandle, PlaybackStatus, SessionCmd, SessionSnapshot, format_time,
};
