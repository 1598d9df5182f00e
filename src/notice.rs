//! User-visible failure notices.
//!
//! Every failure event the user should hear about (permission denial, a
//! failed scan, a failed load, playback breaking off) is turned into exactly
//! one `Notice` and sent to whoever drives the view layer.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tracing::debug;

use crate::permission::Capability;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The storage capability was refused; nothing is retried until the user asks.
    PermissionDenied { capability: Capability },
    /// A scan pass could not run to completion.
    ScanFailed { reason: String },
    /// A track could not be opened or decoded.
    LoadFailed { path: PathBuf, reason: String },
    /// Playback broke off mid-track.
    PlaybackFailed { reason: String },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::PermissionDenied { .. } => "Permission Denied",
            Notice::ScanFailed { .. } | Notice::LoadFailed { .. } | Notice::PlaybackFailed { .. } => {
                "Error"
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::PermissionDenied { capability } => match capability {
                Capability::ReadMediaAudio => {
                    "Audio files permission is required to access music files.".to_string()
                }
                Capability::MediaLibrary => {
                    "Media library permission is required to access music files.".to_string()
                }
                Capability::ManageExternalStorage | Capability::ReadExternalStorage => {
                    "Storage permission is required to access music files.".to_string()
                }
            },
            Notice::ScanFailed { .. } => "Failed to scan music files from storage.".to_string(),
            Notice::LoadFailed { .. } => "Failed to load audio file".to_string(),
            Notice::PlaybackFailed { .. } => "Playback failed".to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

/// Send `notice` if anyone is still listening.
pub(crate) fn emit(tx: &Sender<Notice>, notice: Notice) {
    if let Err(err) = tx.send(notice) {
        debug!("notice dropped, receiver gone: {}", err.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn permission_messages_follow_the_capability() {
        let audio = Notice::PermissionDenied {
            capability: Capability::ReadMediaAudio,
        };
        assert_eq!(audio.title(), "Permission Denied");
        assert!(audio.message().starts_with("Audio files permission"));

        let storage = Notice::PermissionDenied {
            capability: Capability::ReadExternalStorage,
        };
        assert!(storage.message().starts_with("Storage permission"));

        let library = Notice::PermissionDenied {
            capability: Capability::MediaLibrary,
        };
        assert!(library.message().starts_with("Media library permission"));
    }

    #[test]
    fn emit_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        emit(
            &tx,
            Notice::PlaybackFailed {
                reason: "gone".into(),
            },
        );
    }

    #[test]
    fn display_joins_title_and_message() {
        let n = Notice::ScanFailed {
            reason: "boom".into(),
        };
        assert_eq!(n.to_string(), "Error: Failed to scan music files from storage.");
    }
}
