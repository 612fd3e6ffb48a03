//! Continuous video encoding — one hardware encoder session per attempt.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use screenwire_core::{CodecError, ConfigError, StreamConfig, StreamError};
use screenwire_protocol::FrameWriter;
use tracing::{debug, info};

use crate::codec::{EncoderEngine, VideoEncoderSession};
use crate::display::SurfaceBinding;
use crate::format::{build_video_format, MIME_VIDEO_AVC};
use crate::session::{AttemptContext, AttemptOutcome, EncoderStrategy};

/// Drives a hardware encoder session bound to the virtual display's capture
/// surface and drains compressed units onto the sink in timestamp order.
///
/// The session is torn down and recreated by the controller on every
/// rotation; nothing in this strategy survives an attempt.
pub struct VideoStrategy {
    engine: Arc<dyn EncoderEngine>,
    config: StreamConfig,
}

impl VideoStrategy {
    pub fn new(engine: Arc<dyn EncoderEngine>, config: StreamConfig) -> Self {
        Self { engine, config }
    }

    /// Create the configured encoder session. An unknown encoder name is a
    /// configuration error carrying the encoders that do support the
    /// required codec, so the caller can report them.
    fn create_session(&self) -> Result<Box<dyn VideoEncoderSession>, StreamError> {
        match &self.config.encoder_name {
            Some(name) => {
                debug!(encoder = %name, "creating encoder by name");
                self.engine.create_by_name(name).map_err(|err| match err {
                    CodecError::NotFound(_) => {
                        let available = self
                            .engine
                            .list_encoders(MIME_VIDEO_AVC)
                            .into_iter()
                            .map(|info| info.name)
                            .collect();
                        ConfigError::UnknownEncoder { name: name.clone(), available }.into()
                    }
                    other => other.into(),
                })
            }
            None => self.engine.create_default(MIME_VIDEO_AVC).map_err(StreamError::from),
        }
    }

    async fn attempt(
        &self,
        session: &mut dyn VideoEncoderSession,
        ctx: AttemptContext<'_>,
    ) -> Result<AttemptOutcome, StreamError> {
        let AttemptContext { screen_info, display, displays, rotation, sink, stop, frames_written } =
            ctx;

        let format = build_video_format(&self.config, screen_info.video_size);
        session.configure(&format)?;
        let surface = session.input_surface()?;
        displays.bind_surface(
            display,
            &SurfaceBinding {
                surface,
                rotation: screen_info.video_rotation,
                content_rect: screen_info.content_rect,
                video_rect: screen_info.video_size.to_rect(),
                layer_stack: screen_info.layer_stack,
            },
        )?;
        session.start()?;
        info!(encoder = session.name(), size = %screen_info.video_size, "encoding");

        let mut writer = FrameWriter::new(self.config.send_frame_meta);
        loop {
            // Checked once per drained frame; a pending change forces a full
            // restart because the session is bound to fixed geometry.
            if rotation.consume() {
                info!("rotation change detected; restarting with fresh geometry");
                return Ok(AttemptOutcome::Restart);
            }

            let frame = tokio::select! {
                _ = stop.recv() => {
                    info!("stop requested");
                    return Ok(AttemptOutcome::Stopped);
                }
                frame = session.next_frame() => frame?,
            };
            let Some(frame) = frame else {
                info!("encoder end of stream");
                return Ok(AttemptOutcome::Stopped);
            };

            if let Err(err) = writer.write_frame(&mut *sink, &frame).await {
                info!("sink closed ({err}); peer disconnected");
                return Ok(AttemptOutcome::Stopped);
            }
            frames_written.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl EncoderStrategy for VideoStrategy {
    async fn run_attempt(
        &mut self,
        ctx: AttemptContext<'_>,
    ) -> Result<AttemptOutcome, StreamError> {
        let mut session = self.create_session()?;
        let outcome = self.attempt(session.as_mut(), ctx).await;
        // Release runs on every exit path; the controller destroys the
        // display right after we return.
        session.stop();
        session.release();
        outcome
    }
}
