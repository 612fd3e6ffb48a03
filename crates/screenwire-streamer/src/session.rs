//! Session controller — one streaming session, a loop of isolated attempts.
//!
//! ```text
//! loop {
//!     screen_info  = source.screen_info()            // fresh every attempt
//!     display      = displays.create_virtual_display(..)
//!     outcome      = strategy.run_attempt(..)        // configure, bind, drain
//!     displays.destroy_virtual_display(display)      // unconditional
//!     Restart → continue    Stopped / error → done
//! }
//! ```
//!
//! Attempts are fully isolated: nothing survives a restart except the
//! rotation watch's consumption and the sink itself.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use screenwire_core::{ScreenInfo, StreamError};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::codec::CaptureSource;
use crate::display::{DisplayHandle, DisplayManager};
use crate::rotation::RotationWatch;

/// Name under which the off-screen virtual display is registered.
pub const VIRTUAL_DISPLAY_NAME: &str = "screenwire";

/// Owned byte destination for a spawned session.
pub type SessionSink = Box<dyn AsyncWrite + Unpin + Send>;

// ── Strategy contract ─────────────────────────────────────────────────────────

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Rotation detected — tear everything down, run a fresh attempt.
    Restart,
    /// Sink closed, stop requested, or end of stream — the session is over.
    Stopped,
}

/// Everything a strategy gets for one attempt. The display already exists;
/// the strategy binds its own surface to it. The strategy must release its
/// encoder/image-stream resources on every exit path; the controller then
/// destroys the display unconditionally.
pub struct AttemptContext<'a> {
    pub screen_info: ScreenInfo,
    pub display: &'a DisplayHandle,
    pub displays: &'a dyn DisplayManager,
    pub rotation: &'a RotationWatch,
    pub sink: &'a mut (dyn AsyncWrite + Unpin + Send),
    pub stop: &'a mut mpsc::Receiver<()>,
    /// Units successfully written to the sink, across all attempts.
    pub frames_written: &'a AtomicU64,
}

/// One of the two encoding variants (continuous video / snapshot images),
/// run under the common controller.
#[async_trait]
pub trait EncoderStrategy: Send {
    async fn run_attempt(&mut self, ctx: AttemptContext<'_>)
        -> Result<AttemptOutcome, StreamError>;
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Run a streaming session until the sink closes, a stop is requested, or a
/// fatal error occurs. Dropping the stop sender also stops the session.
pub async fn run_session(
    source: &dyn CaptureSource,
    displays: &dyn DisplayManager,
    strategy: &mut dyn EncoderStrategy,
    sink: &mut (dyn AsyncWrite + Unpin + Send),
    stop: &mut mpsc::Receiver<()>,
) -> Result<(), StreamError> {
    run_session_counted(source, displays, strategy, sink, stop, &AtomicU64::new(0)).await
}

pub(crate) async fn run_session_counted(
    source: &dyn CaptureSource,
    displays: &dyn DisplayManager,
    strategy: &mut dyn EncoderStrategy,
    sink: &mut (dyn AsyncWrite + Unpin + Send),
    stop: &mut mpsc::Receiver<()>,
    frames_written: &AtomicU64,
) -> Result<(), StreamError> {
    let rotation = RotationWatch::new();
    source.set_rotation_listener(Some(rotation.clone()));
    let result =
        attempt_loop(source, displays, strategy, sink, stop, &rotation, frames_written).await;
    source.set_rotation_listener(None);
    result
}

async fn attempt_loop(
    source: &dyn CaptureSource,
    displays: &dyn DisplayManager,
    strategy: &mut dyn EncoderStrategy,
    sink: &mut (dyn AsyncWrite + Unpin + Send),
    stop: &mut mpsc::Receiver<()>,
    rotation: &RotationWatch,
    frames_written: &AtomicU64,
) -> Result<(), StreamError> {
    loop {
        let screen_info = source.screen_info()?;
        let secure = displays.secure_displays_allowed();
        let display = displays.create_virtual_display(VIRTUAL_DISPLAY_NAME, secure)?;
        info!(
            size = %screen_info.video_size,
            rotation = screen_info.video_rotation.degrees(),
            secure,
            "attempt started"
        );

        let outcome = strategy
            .run_attempt(AttemptContext {
                screen_info,
                display: &display,
                displays,
                rotation,
                sink: &mut *sink,
                stop: &mut *stop,
                frames_written,
            })
            .await;
        displays.destroy_virtual_display(display);

        match outcome? {
            AttemptOutcome::Restart => continue,
            AttemptOutcome::Stopped => {
                info!(
                    frames = frames_written.load(Ordering::Relaxed),
                    "session stopped"
                );
                return Ok(());
            }
        }
    }
}

// ── Spawned session handle ────────────────────────────────────────────────────

/// Handle to a session running on its own worker task.
///
/// The task owns the whole capture/encode pipeline; this handle only signals
/// stop and observes progress.
pub struct ScreenSession {
    stop_tx: mpsc::Sender<()>,
    frames_written: Arc<AtomicU64>,
    handle: JoinHandle<Result<(), StreamError>>,
}

impl ScreenSession {
    /// Spawn a session task. It runs until the sink closes, [`stop`](Self::stop)
    /// is called, or a fatal error occurs; [`join`](Self::join) returns the
    /// session's result.
    pub fn spawn(
        source: Arc<dyn CaptureSource>,
        displays: Arc<dyn DisplayManager>,
        mut strategy: Box<dyn EncoderStrategy>,
        mut sink: SessionSink,
    ) -> Self {
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let frames_written = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&frames_written);

        let handle = tokio::spawn(async move {
            run_session_counted(
                source.as_ref(),
                displays.as_ref(),
                strategy.as_mut(),
                &mut *sink,
                &mut stop_rx,
                &counter,
            )
            .await
        });

        Self { stop_tx, frames_written, handle }
    }

    /// Request a graceful stop (non-blocking).
    pub fn stop(&self) {
        let _ = self.stop_tx.try_send(());
    }

    /// Units written to the sink so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written.load(Ordering::Relaxed)
    }

    /// Wait for the session task to finish and return its result.
    pub async fn join(self) -> Result<(), StreamError> {
        self.handle.await.map_err(io::Error::other)?
    }
}
