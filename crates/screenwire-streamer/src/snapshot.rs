//! Snapshot encoding — independently-decodable JPEG packets per capture.

use std::io::Cursor;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, RgbImage};
use screenwire_core::{CapturedImage, CodecError, Size, StreamError};
use screenwire_protocol::write_snapshot_packet;
use tracing::{debug, info};

use crate::codec::{ImageStream, ImageStreamFactory};
use crate::display::SurfaceBinding;
use crate::session::{AttemptContext, AttemptOutcome, EncoderStrategy};

/// At most one image in flight; the stream drops older frames unread.
const MAX_IMAGES_IN_FLIGHT: usize = 1;
const JPEG_QUALITY: u8 = 100;

/// Compresses each available capture to a JPEG and writes it as a
/// self-contained snapshot packet. No encoder state is carried between
/// captures; rotation handling matches the video strategy (full restart).
pub struct SnapshotStrategy {
    images: Arc<dyn ImageStreamFactory>,
}

impl SnapshotStrategy {
    pub fn new(images: Arc<dyn ImageStreamFactory>) -> Self {
        Self { images }
    }

    async fn attempt(
        &self,
        stream: &mut dyn ImageStream,
        ctx: AttemptContext<'_>,
    ) -> Result<AttemptOutcome, StreamError> {
        let AttemptContext { screen_info, display, displays, rotation, sink, stop, frames_written } =
            ctx;
        let target = screen_info.video_size;

        displays.bind_surface(
            display,
            &SurfaceBinding {
                surface: stream.surface(),
                rotation: screen_info.video_rotation,
                content_rect: screen_info.content_rect,
                video_rect: screen_info.unlocked_video_size.to_rect(),
                layer_stack: screen_info.layer_stack,
            },
        )?;
        info!(size = %target, "capturing snapshots");

        loop {
            if rotation.consume() {
                info!("rotation change detected; restarting with fresh geometry");
                return Ok(AttemptOutcome::Restart);
            }

            let image = tokio::select! {
                _ = stop.recv() => {
                    info!("stop requested");
                    return Ok(AttemptOutcome::Stopped);
                }
                image = stream.acquire_latest() => image?,
            };
            let Some(image) = image else {
                info!("image stream closed");
                return Ok(AttemptOutcome::Stopped);
            };

            let jpeg = compress_snapshot(&image, target)?;
            let write = write_snapshot_packet(
                &mut *sink,
                target.width as u64,
                target.height as u64,
                &jpeg,
            )
            .await;
            if let Err(err) = write {
                info!("sink closed ({err}); peer disconnected");
                return Ok(AttemptOutcome::Stopped);
            }
            frames_written.fetch_add(1, Ordering::Relaxed);
            debug!(bytes = jpeg.len(), "snapshot written");
        }
    }
}

#[async_trait]
impl EncoderStrategy for SnapshotStrategy {
    async fn run_attempt(
        &mut self,
        ctx: AttemptContext<'_>,
    ) -> Result<AttemptOutcome, StreamError> {
        let mut stream = self.images.open(ctx.screen_info.video_size, MAX_IMAGES_IN_FLIGHT)?;
        let outcome = self.attempt(stream.as_mut(), ctx).await;
        stream.close();
        outcome
    }
}

/// Crop a raw capture to the target rectangle, honoring the plane's row and
/// pixel strides, and compress it at maximum quality.
fn compress_snapshot(image: &CapturedImage, target: Size) -> Result<Vec<u8>, CodecError> {
    let width = target.width as usize;
    let height = target.height as usize;

    let mut rgb = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row = y * image.row_stride;
        for x in 0..width {
            let offset = row + x * image.pixel_stride;
            if offset + 2 < image.data.len() {
                rgb.push(image.data[offset]);
                rgb.push(image.data[offset + 1]);
                rgb.push(image.data[offset + 2]);
            } else {
                rgb.extend_from_slice(&[0, 0, 0]);
            }
        }
    }

    let rgb_image: RgbImage = ImageBuffer::from_raw(target.width, target.height, rgb)
        .ok_or_else(|| CodecError::Fault("snapshot buffer has invalid dimensions".to_owned()))?;

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb_image
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Fault(format!("JPEG encode failed: {e}")))?;
    Ok(out.into_inner())
}
