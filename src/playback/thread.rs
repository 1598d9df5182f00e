use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::config::PlaybackSettings;
use crate::notice::{self, Notice};

use super::resource::{ResourceError, ResourceOpener};
use super::session::PlaybackSession;
use super::types::{PlaybackHandle, PlaybackStatus, SessionCmd};

/// Run a `PlaybackSession` on its own thread.
///
/// The opener is built inside the thread since audio output streams are tied
/// to the thread that opened them. Commands arrive over `rx`; between
/// commands the loop wakes for the progress clock or, at the latest, every
/// `completion_poll_ms` to notice the end of the track.
pub(super) fn spawn_session_thread<O, F>(
    make_opener: F,
    settings: PlaybackSettings,
    rx: Receiver<SessionCmd>,
    snapshot: PlaybackHandle,
    notices: Sender<Notice>,
) -> io::Result<JoinHandle<()>>
where
    O: ResourceOpener + 'static,
    F: FnOnce() -> Result<O, ResourceError> + Send + 'static,
{
    thread::Builder::new()
        .name("muzicvia-playback".into())
        .spawn(move || {
            let opener = match make_opener() {
                Ok(opener) => opener,
                Err(err) => {
                    error!("playback unavailable: {err}");
                    if let Ok(mut snap) = snapshot.lock() {
                        snap.status = PlaybackStatus::Failed;
                    }
                    notice::emit(
                        &notices,
                        Notice::PlaybackFailed {
                            reason: err.to_string(),
                        },
                    );
                    return;
                }
            };

            let poll = Duration::from_millis(settings.completion_poll_ms.max(1));
            let mut session =
                PlaybackSession::new(opener, &settings, notices).with_snapshot_handle(snapshot);

            loop {
                let now = Instant::now();
                let timeout = session
                    .next_deadline()
                    .map_or(poll, |at| at.saturating_duration_since(now).min(poll));

                match rx.recv_timeout(timeout) {
                    Ok(SessionCmd::Quit) => break,
                    Ok(cmd) => handle(&mut session, cmd),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                session.tick(Instant::now());
            }

            session.unload();
            debug!("playback thread finished");
        })
}

fn handle<O: ResourceOpener>(session: &mut PlaybackSession<O>, cmd: SessionCmd) {
    let now = Instant::now();
    let result = match cmd {
        SessionCmd::Load(path) => session.load(path),
        SessionCmd::PlayPause => session.play_pause(now),
        SessionCmd::Stop => {
            session.stop();
            Ok(())
        }
        SessionCmd::SeekTo(secs) => session.seek(secs, now).map(|_| ()),
        SessionCmd::SkipForward(delta) => session.skip_forward(delta, now).map(|_| ()),
        SessionCmd::Unload => {
            session.unload();
            Ok(())
        }
        SessionCmd::Quit => Ok(()),
    };
    // Failures that matter to the user were already turned into notices.
    if let Err(err) = result {
        debug!("command not applied: {err}");
    }
}
