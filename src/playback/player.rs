use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::PlaybackSettings;
use crate::notice::Notice;

use super::resource::{ResourceError, ResourceOpener};
use super::rodio_backend::RodioOpener;
use super::thread::spawn_session_thread;
use super::types::{PlaybackHandle, SessionCmd, SessionSnapshot};

/// Handle to a playback session running on its own thread.
///
/// Dropping the player shuts the session down, which releases any open track.
pub struct SessionPlayer {
    tx: Sender<SessionCmd>,
    snapshot: PlaybackHandle,
    skip_step: Duration,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SessionPlayer {
    pub fn spawn<O, F>(
        settings: &PlaybackSettings,
        make_opener: F,
        notices: Sender<Notice>,
    ) -> io::Result<Self>
    where
        O: ResourceOpener + 'static,
        F: FnOnce() -> Result<O, ResourceError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SessionCmd>();
        let snapshot: PlaybackHandle = Arc::new(Mutex::new(SessionSnapshot::default()));

        let handle = spawn_session_thread(
            make_opener,
            settings.clone(),
            rx,
            snapshot.clone(),
            notices,
        )?;

        Ok(Self {
            tx,
            snapshot,
            skip_step: Duration::from_secs(settings.skip_seconds),
            join: Mutex::new(Some(handle)),
        })
    }

    /// Spawn a session on the default audio output.
    pub fn with_default_output(settings: &PlaybackSettings, notices: Sender<Notice>) -> io::Result<Self> {
        Self::spawn(settings, RodioOpener::open_default, notices)
    }

    pub fn snapshot_handle(&self) -> PlaybackHandle {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot
            .lock()
            .map(|snap| snap.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: SessionCmd) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.tx.send(cmd)
    }

    pub fn load(&self, path: impl Into<PathBuf>) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.send(SessionCmd::Load(path.into()))
    }

    pub fn play_pause(&self) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.send(SessionCmd::PlayPause)
    }

    pub fn stop(&self) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.send(SessionCmd::Stop)
    }

    pub fn seek(&self, target_secs: f64) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.send(SessionCmd::SeekTo(target_secs))
    }

    /// Skip ahead by the configured step.
    pub fn skip_forward(&self) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.send(SessionCmd::SkipForward(self.skip_step))
    }

    /// Stop the session thread and wait for it to release its track.
    pub fn shutdown(&self) {
        let _ = self.send(SessionCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for SessionPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
