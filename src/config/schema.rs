use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/muzicvia/config.toml` or `~/.config/muzicvia/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUZICVIA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub playback: PlaybackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, leading dot optional).
    pub extensions: Vec<String>,
    /// Directory descents allowed below each primary root.
    pub max_depth: usize,
    /// Directory descents allowed during the fallback pass.
    pub fallback_max_depth: usize,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: [".mp3", ".m4a", ".wav", ".flac", ".aac", ".ogg"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_depth: 2,
            fallback_max_depth: 1,
            follow_links: true,
        }
    }
}

/// Where the device keeps user-visible storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Shared external storage directory.
    pub external_storage: PathBuf,
    /// The app's private documents directory.
    pub documents: PathBuf,
    /// App-specific directory on external storage, when the platform has one.
    pub app_external: Option<PathBuf>,
    /// Root holding the well-known media folders probed by the fallback pass.
    pub canonical_root: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            external_storage: PathBuf::from("/storage/emulated/0"),
            documents: PathBuf::from("/data/user/0/muzicvia/files"),
            app_external: None,
            canonical_root: PathBuf::from("/storage/emulated/0"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Progress clock period while playing (milliseconds).
    pub progress_interval_ms: u64,
    /// How long a seek suppresses progress clock writes (milliseconds).
    pub seek_quiescence_ms: u64,
    /// Seconds jumped by the skip-forward control.
    pub skip_seconds: u64,
    /// How often the session thread checks for end-of-track (milliseconds).
    pub completion_poll_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            progress_interval_ms: 1000,
            seek_quiescence_ms: 100,
            skip_seconds: 10,
            completion_poll_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Maximum log level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
