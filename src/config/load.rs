use std::{env, path::PathBuf};

use tracing::warn;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `MUZICVIA__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MUZICVIA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        if self.library.fallback_max_depth > self.library.max_depth {
            return Err("library.fallback_max_depth must not exceed library.max_depth".to_string());
        }
        if self.playback.progress_interval_ms == 0 {
            return Err("playback.progress_interval_ms must be >= 1".to_string());
        }
        if self.playback.completion_poll_ms == 0 {
            return Err("playback.completion_poll_ms must be >= 1".to_string());
        }
        Ok(())
    }

    /// Load and validate settings; any failure falls back to defaults.
    ///
    /// Config is optional, so a broken file must not keep the player from starting.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(s) => {
                if let Err(msg) = s.validate() {
                    warn!("invalid config, using defaults: {msg}");
                    Self::default()
                } else {
                    s
                }
            }
            Err(e) => {
                warn!("failed to load config, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// Resolve the config path from `MUZICVIA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MUZICVIA_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/muzicvia/config.toml`
/// or `~/.config/muzicvia/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("muzicvia").join("config.toml"))
}
