//! Snapshot packet prefix for the still-image wire format.

use thiserror::Error;

/// Fixed 16-byte tag opening every snapshot packet.
pub const SNAPSHOT_TAG: [u8; 16] = [
    0xFF, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF,
];

/// Encoded size of a [`SnapshotHeader`]: tag + width + height.
pub const SNAPSHOT_HEADER_LEN: usize = 32;

/// Decoded prefix of a snapshot packet. The compressed image payload follows
/// with no explicit length field; its boundary is the image codec's end
/// marker or the transport's message boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub width:  u64,
    pub height: u64,
}

#[derive(Error, Debug)]
pub enum SnapshotDecodeError {
    #[error("truncated snapshot header: got {0} bytes, need {SNAPSHOT_HEADER_LEN}")]
    Truncated(usize),

    #[error("snapshot tag mismatch")]
    BadTag,
}

impl SnapshotHeader {
    /// Encode into the 32-byte big-endian wire form.
    pub fn encode(&self) -> [u8; SNAPSHOT_HEADER_LEN] {
        let mut buf = [0u8; SNAPSHOT_HEADER_LEN];
        buf[..16].copy_from_slice(&SNAPSHOT_TAG);
        buf[16..24].copy_from_slice(&self.width.to_be_bytes());
        buf[24..32].copy_from_slice(&self.height.to_be_bytes());
        buf
    }

    /// Decode and tag-check the first 32 bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotDecodeError> {
        if bytes.len() < SNAPSHOT_HEADER_LEN {
            return Err(SnapshotDecodeError::Truncated(bytes.len()));
        }
        if bytes[..16] != SNAPSHOT_TAG {
            return Err(SnapshotDecodeError::BadTag);
        }
        Ok(Self {
            width: u64::from_be_bytes(bytes[16..24].try_into().unwrap()),
            height: u64::from_be_bytes(bytes[24..32].try_into().unwrap()),
        })
    }
}
