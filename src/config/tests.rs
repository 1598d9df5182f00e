use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_muzicvia_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MUZICVIA_CONFIG_PATH", "/tmp/muzicvia-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/muzicvia-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("muzicvia")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("muzicvia")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_player_behaviour() {
    let s = Settings::default();
    assert_eq!(s.library.extensions.len(), 6);
    assert!(s.library.extensions.contains(&".m4a".to_string()));
    assert_eq!(s.library.max_depth, 2);
    assert_eq!(s.library.fallback_max_depth, 1);
    assert_eq!(s.playback.progress_interval_ms, 1000);
    assert_eq!(s.playback.seek_quiescence_ms, 100);
    assert_eq!(s.playback.skip_seconds, 10);
    assert_eq!(s.storage.canonical_root, PathBuf::from("/storage/emulated/0"));
    assert!(s.storage.app_external.is_none());
    assert_eq!(s.logging.level, "info");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
extensions = ["mp3", ".FLAC"]
max_depth = 4
fallback_max_depth = 2
follow_links = false

[storage]
external_storage = "/sdcard"
documents = "/data/docs"
app_external = "/sdcard/Android/data/muzicvia/files"
canonical_root = "/sdcard"

[playback]
progress_interval_ms = 500
seek_quiescence_ms = 250
skip_seconds = 15

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUZICVIA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MUZICVIA__PLAYBACK__SEEK_QUIESCENCE_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.extensions, vec!["mp3".to_string(), ".FLAC".to_string()]);
    assert_eq!(s.library.max_depth, 4);
    assert_eq!(s.library.fallback_max_depth, 2);
    assert!(!s.library.follow_links);
    assert_eq!(s.storage.external_storage, PathBuf::from("/sdcard"));
    assert_eq!(s.storage.documents, PathBuf::from("/data/docs"));
    assert_eq!(
        s.storage.app_external,
        Some(PathBuf::from("/sdcard/Android/data/muzicvia/files"))
    );
    assert_eq!(s.playback.progress_interval_ms, 500);
    assert_eq!(s.playback.seek_quiescence_ms, 250);
    assert_eq!(s.playback.skip_seconds, 15);
    // Unset keys keep their defaults.
    assert_eq!(s.playback.completion_poll_ms, 200);
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
seek_quiescence_ms = 100
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUZICVIA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MUZICVIA__PLAYBACK__SEEK_QUIESCENCE_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.seek_quiescence_ms, 40);
}

#[test]
fn load_or_default_ignores_invalid_settings() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
progress_interval_ms = 0
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUZICVIA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MUZICVIA__PLAYBACK__SEEK_QUIESCENCE_MS");

    let s = Settings::load_or_default();
    assert_eq!(s.playback.progress_interval_ms, 1000);
}

#[test]
fn validate_rejects_inconsistent_depths_and_empty_extensions() {
    let mut s = Settings::default();
    s.library.fallback_max_depth = s.library.max_depth + 1;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" ".into(), ".".into()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.completion_poll_ms = 0;
    assert!(s.validate().is_err());
}
