use serde::{Deserialize, Serialize};

use crate::options::CodecOption;

/// Caller-supplied configuration for one streaming session.
///
/// `send_frame_meta` selects the wire format once, at construction: with it
/// on, every encoded unit is prefixed by the 12-byte frame header; with it
/// off, raw elementary-stream bytes are written and the remote side must use
/// container-level framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    #[serde(alias = "sendFrameMeta")]
    pub send_frame_meta: bool,
    #[serde(alias = "bitRate")]
    pub bit_rate: u32,
    /// Maximum input frame rate requested from the capture pipeline.
    /// `0` means uncapped.
    #[serde(alias = "maxFps")]
    pub max_fps: u32,
    /// Ordered list of tuning options applied onto the encoder format.
    #[serde(alias = "codecOptions")]
    pub codec_options: Vec<CodecOption>,
    /// Explicit encoder to use; `None` selects the platform default for the
    /// required MIME type.
    #[serde(alias = "encoderName")]
    pub encoder_name: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            send_frame_meta: true,
            bit_rate: 8_000_000,
            max_fps: 0,
            codec_options: Vec::new(),
            encoder_name: None,
        }
    }
}
