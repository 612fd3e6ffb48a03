//! Async sink writers that put encoded output on the wire.

use std::io;

use screenwire_core::EncodedFrame;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::frame_header::FrameHeader;
use crate::snapshot::SnapshotHeader;

// ── FrameWriter ───────────────────────────────────────────────────────────────

/// Writes encoded video units to a sink in the negotiated format.
///
/// Whether frames carry the 12-byte metadata header is decided once at
/// construction, never per frame. Timestamps are rebased so the first
/// non-config frame of the stream starts at zero; one writer therefore
/// serves exactly one encoding attempt.
#[derive(Debug)]
pub struct FrameWriter {
    send_frame_meta: bool,
    pts_origin_us: Option<u64>,
}

impl FrameWriter {
    pub fn new(send_frame_meta: bool) -> Self {
        Self { send_frame_meta, pts_origin_us: None }
    }

    /// Write one encoded unit, header first when frame metadata is enabled.
    ///
    /// An `Err` means the sink rejected the write — for a remote sink this
    /// is the normal "peer disconnected" signal.
    pub async fn write_frame<W>(&mut self, sink: &mut W, frame: &EncodedFrame) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        if self.send_frame_meta {
            let header = self.frame_header(frame);
            sink.write_all(&header.encode()).await?;
            trace!(
                pts = ?header.pts_us,
                config = header.config,
                key_frame = header.key_frame,
                len = header.payload_len,
                "frame header written"
            );
        }
        sink.write_all(&frame.data).await?;
        sink.flush().await
    }

    fn frame_header(&mut self, frame: &EncodedFrame) -> FrameHeader {
        // Config packets carry no real timestamp and never latch the origin.
        let pts_us = if frame.config {
            None
        } else {
            frame.pts_us.map(|pts| {
                let origin = *self.pts_origin_us.get_or_insert(pts);
                pts.saturating_sub(origin)
            })
        };

        FrameHeader {
            config: frame.config,
            key_frame: frame.key_frame,
            pts_us,
            payload_len: frame.data.len() as u32,
        }
    }
}

// ── Snapshot packets ──────────────────────────────────────────────────────────

/// Write one self-contained snapshot packet: tag, dimensions, payload.
pub async fn write_snapshot_packet<W>(
    sink: &mut W,
    width: u64,
    height: u64,
    payload: &[u8],
) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let header = SnapshotHeader { width, height };
    sink.write_all(&header.encode()).await?;
    sink.write_all(payload).await?;
    sink.flush().await
}
