//! 12-byte per-frame header for the video wire format.

use thiserror::Error;

/// Encoded size of a [`FrameHeader`].
pub const FRAME_HEADER_LEN: usize = 12;

const FLAG_CONFIG: u64 = 1 << 63;
const FLAG_KEY_FRAME: u64 = 1 << 62;
const PTS_MASK: u64 = (1 << 62) - 1;
/// In-band sentinel for "no timestamp" — all ones in the 62-bit PTS field.
const NO_PTS: u64 = PTS_MASK;

/// Largest representable presentation timestamp (the all-ones value is the
/// no-PTS sentinel).
pub const PTS_MAX: u64 = PTS_MASK - 1;

/// Decoded form of the per-frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Stream-initialization packet (carries no real timestamp).
    pub config: bool,
    pub key_frame: bool,
    /// Presentation timestamp in µs; `None` encodes the sentinel.
    pub pts_us: Option<u64>,
    /// Byte count of the payload immediately following this header.
    pub payload_len: u32,
}

#[derive(Error, Debug)]
pub enum HeaderDecodeError {
    #[error("truncated frame header: got {0} bytes, need {FRAME_HEADER_LEN}")]
    Truncated(usize),
}

impl FrameHeader {
    /// Encode into the 12-byte big-endian wire form.
    ///
    /// Timestamps above [`PTS_MAX`] are masked into the 62-bit field.
    pub fn encode(&self) -> [u8; FRAME_HEADER_LEN] {
        let pts_field = match self.pts_us {
            Some(pts) => {
                debug_assert!(pts <= PTS_MAX, "pts {pts} exceeds the 62-bit range");
                pts & PTS_MASK
            }
            None => NO_PTS,
        };
        let mut flags_and_pts = pts_field;
        if self.config {
            flags_and_pts |= FLAG_CONFIG;
        }
        if self.key_frame {
            flags_and_pts |= FLAG_KEY_FRAME;
        }

        let mut buf = [0u8; FRAME_HEADER_LEN];
        buf[..8].copy_from_slice(&flags_and_pts.to_be_bytes());
        buf[8..].copy_from_slice(&self.payload_len.to_be_bytes());
        buf
    }

    /// Decode from the first 12 bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, HeaderDecodeError> {
        if bytes.len() < FRAME_HEADER_LEN {
            return Err(HeaderDecodeError::Truncated(bytes.len()));
        }
        let flags_and_pts = u64::from_be_bytes(bytes[..8].try_into().unwrap());
        let payload_len = u32::from_be_bytes(bytes[8..12].try_into().unwrap());

        let pts_field = flags_and_pts & PTS_MASK;
        Ok(Self {
            config: flags_and_pts & FLAG_CONFIG != 0,
            key_frame: flags_and_pts & FLAG_KEY_FRAME != 0,
            pts_us: (pts_field != NO_PTS).then_some(pts_field),
            payload_len,
        })
    }
}
