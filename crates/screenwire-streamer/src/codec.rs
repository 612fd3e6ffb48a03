//! Encoder, image-acquisition and capture-source capabilities.
//!
//! A video encoder session follows the platform codec lifecycle:
//!
//! ```text
//! create ─► configure ─► input_surface ─► start ─► next_frame …ᶰ ─► stop ─► release
//! ```
//!
//! `stop` and `release` must be callable in any state and more than once —
//! the session controller invokes them on every exit path, including paths
//! where `configure` or `start` already failed.

use async_trait::async_trait;
use screenwire_core::{CapturedImage, CodecError, EncodedFrame, ScreenInfo, Size, StreamError};

use crate::display::Surface;
use crate::format::EncoderFormat;
use crate::rotation::RotationWatch;

// ── Encoder discovery ─────────────────────────────────────────────────────────

/// One encoder discovered on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderInfo {
    pub name: String,
}

impl EncoderInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Hardware encoder discovery and session creation.
pub trait EncoderEngine: Send + Sync {
    /// All encoders supporting `mime`, in platform order.
    fn list_encoders(&self, mime: &str) -> Vec<EncoderInfo>;

    /// Create a session for the encoder with this exact name.
    /// Fails with [`CodecError::NotFound`] for an unknown name; the caller
    /// reports the discovered list alongside that failure.
    fn create_by_name(&self, name: &str) -> Result<Box<dyn VideoEncoderSession>, CodecError>;

    /// Create a session for the platform's default encoder for `mime`.
    fn create_default(&self, mime: &str) -> Result<Box<dyn VideoEncoderSession>, CodecError>;
}

// ── Video encoder session ─────────────────────────────────────────────────────

/// One hardware encoder session, valid for a single attempt.
#[async_trait]
pub trait VideoEncoderSession: Send {
    /// Resolved encoder name (useful in logs when the default was picked).
    fn name(&self) -> &str;

    fn configure(&mut self, format: &EncoderFormat) -> Result<(), CodecError>;

    /// The surface the encoder consumes input frames from. Valid after
    /// [`configure`](Self::configure).
    fn input_surface(&mut self) -> Result<Surface, CodecError>;

    fn start(&mut self) -> Result<(), CodecError>;

    /// Await the next compressed unit, in presentation order.
    ///
    /// Returns `Ok(None)` at end of stream. Must return promptly once the
    /// session is stopped so cancellation is bounded.
    async fn next_frame(&mut self) -> Result<Option<EncodedFrame>, CodecError>;

    /// Stop draining. Idempotent, callable in any state.
    fn stop(&mut self);

    /// Release the underlying codec and its surface. Idempotent.
    fn release(&mut self);
}

// ── Image acquisition (snapshot mode) ─────────────────────────────────────────

/// Creates image streams bound to a capture surface.
pub trait ImageStreamFactory: Send + Sync {
    /// Open a stream producing images of `size`, holding at most
    /// `max_images` in flight (older images are dropped unread).
    fn open(&self, size: Size, max_images: usize) -> Result<Box<dyn ImageStream>, CodecError>;
}

/// A stream of captured raw images.
#[async_trait]
pub trait ImageStream: Send {
    /// The surface the stream is fed from, for display binding.
    fn surface(&self) -> Surface;

    /// Await the most recent available image, skipping any the consumer
    /// never read. Returns `Ok(None)` when the stream closes.
    async fn acquire_latest(&mut self) -> Result<Option<CapturedImage>, CodecError>;

    /// Close the stream and release its surface. Idempotent.
    fn close(&mut self);
}

// ── Capture source ────────────────────────────────────────────────────────────

/// The device-side collaborator that knows screen geometry and reports
/// orientation changes.
pub trait CaptureSource: Send + Sync {
    /// Current geometry. Re-fetched at the start of every attempt.
    fn screen_info(&self) -> Result<ScreenInfo, StreamError>;

    /// Register (`Some`) or clear (`None`) the rotation listener. The
    /// source must call [`RotationWatch::signal`] from its own observation
    /// thread on every orientation change while registered.
    fn set_rotation_listener(&self, watch: Option<RotationWatch>);
}
