//! screenwire-protocol — the two ScreenWire wire formats.
//!
//! # Video mode (frame metadata enabled)
//!
//! Repeating units of:
//!
//! ```text
//! [0..8]   flags+pts  u64 BE  bit 63 = config packet, bit 62 = key frame,
//!                             bits 0..62 = PTS in µs, or the no-PTS sentinel
//! [8..12]  length     u32 BE  payload byte count
//! [12..]   payload    [u8]    one compressed access unit
//! ```
//!
//! With frame metadata disabled, the stream is raw elementary-stream bytes
//! with no headers; the remote side must use container-level framing.
//!
//! # Snapshot mode
//!
//! Repeating units of:
//!
//! ```text
//! [0..16]  tag     [u8;16]  fixed prefix (see [`SNAPSHOT_TAG`])
//! [16..24] width   u64 BE
//! [24..32] height  u64 BE
//! [32..]   payload [u8]     compressed image, no explicit length field —
//!                           bounded by the image codec's end marker or the
//!                           transport's message boundary
//! ```

pub mod frame_header;
pub mod snapshot;
pub mod writer;

pub use frame_header::{FrameHeader, FRAME_HEADER_LEN, PTS_MAX};
pub use snapshot::{SnapshotHeader, SNAPSHOT_HEADER_LEN, SNAPSHOT_TAG};
pub use writer::{write_snapshot_packet, FrameWriter};
