//! screenwire-streamer — the capture/encode core.
//!
//! Binds an off-screen virtual display to an encoder's input surface and
//! drains the encoder onto a byte sink, restarting the whole attempt when
//! the device rotates mid-stream.
//!
//! # Architecture
//!
//! ```text
//! CaptureSource ──geometry──► SessionController ◄──stop── caller
//!                                   │  per attempt
//!                                   ▼
//!                      DisplayManager.create / bind
//!                                   │
//!              ┌────────────────────┴────────────────────┐
//!              ▼                                         ▼
//!      VideoStrategy                             SnapshotStrategy
//!      EncoderEngine → VideoEncoderSession       ImageStreamFactory → ImageStream
//!      drain units → FrameWriter ──► sink        crop + JPEG → snapshot packets ──► sink
//!              │                                         │
//!              └────────── RotationWatch.consume ────────┘
//!                          true → tear down, fresh attempt
//! ```
//!
//! Platform specifics live behind the capability traits in [`display`] and
//! [`codec`]; an embedding adapter implements them against the real display
//! server / codec stack.

pub mod codec;
pub mod display;
pub mod format;
pub mod rotation;
pub mod session;
pub mod snapshot;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use codec::{
    CaptureSource, EncoderEngine, EncoderInfo, ImageStream, ImageStreamFactory,
    VideoEncoderSession,
};
pub use display::{DisplayHandle, DisplayManager, Surface, SurfaceBinding};
pub use format::{apply_codec_options, build_video_format, EncoderFormat, FormatValue};
pub use rotation::RotationWatch;
pub use session::{
    run_session, AttemptContext, AttemptOutcome, EncoderStrategy, ScreenSession, SessionSink,
    VIRTUAL_DISPLAY_NAME,
};
pub use snapshot::SnapshotStrategy;
pub use video::VideoStrategy;
