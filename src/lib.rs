//! Core of the Muzicvia music player.
//!
//! - [`permission`] decides which storage capability to ask for and records the answer.
//! - [`library`] scans storage roots into a deduplicated catalog of audio files.
//! - [`playback`] plays one track at a time through a small state machine.
//!
//! Failures the user should see are delivered as [`notice::Notice`] values;
//! everything else is logged through `tracing`.

pub mod config;
pub mod library;
pub mod logging;
pub mod notice;
pub mod permission;
pub mod playback;
