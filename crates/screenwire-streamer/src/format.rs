//! Encoder format construction and codec option application.

use std::collections::BTreeMap;

use screenwire_core::{CodecOption, CodecOptionValue, Size, StreamConfig};

// ── Format keys ───────────────────────────────────────────────────────────────

pub const KEY_MIME: &str = "mime";
pub const KEY_WIDTH: &str = "width";
pub const KEY_HEIGHT: &str = "height";
pub const KEY_BIT_RATE: &str = "bitrate";
pub const KEY_FRAME_RATE: &str = "frame-rate";
pub const KEY_COLOR_FORMAT: &str = "color-format";
pub const KEY_I_FRAME_INTERVAL: &str = "i-frame-interval";
pub const KEY_REPEAT_PREVIOUS_FRAME_AFTER: &str = "repeat-previous-frame-after";
pub const KEY_MAX_FPS_TO_ENCODER: &str = "max-fps-to-encoder";

pub const MIME_VIDEO_AVC: &str = "video/avc";

/// Encode from a surface rather than from pushed input buffers.
pub const COLOR_FORMAT_SURFACE: i32 = 0x7F00_0789;

const DEFAULT_I_FRAME_INTERVAL_SECS: i32 = 10;
/// Ask the encoder to repeat the previous frame when the source stalls, so
/// the stream keeps a decodable steady state and a late-joining client can
/// sync on the next repeat.
const REPEAT_FRAME_DELAY_US: i64 = 100_000;
/// Nominal rate required to configure the encoder; the actual frame rate is
/// variable.
const NOMINAL_FRAME_RATE: i32 = 60;

// ── EncoderFormat ─────────────────────────────────────────────────────────────

/// Typed value stored in an [`EncoderFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormatValue {
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
}

/// String-keyed, typed configuration record handed to
/// [`VideoEncoderSession::configure`](crate::codec::VideoEncoderSession::configure),
/// mirroring the platform's media format object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncoderFormat {
    entries: BTreeMap<String, FormatValue>,
}

impl EncoderFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.entries.insert(key.to_owned(), FormatValue::Int(value));
    }

    pub fn set_long(&mut self, key: &str, value: i64) {
        self.entries.insert(key.to_owned(), FormatValue::Long(value));
    }

    pub fn set_float(&mut self, key: &str, value: f32) {
        self.entries.insert(key.to_owned(), FormatValue::Float(value));
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), FormatValue::String(value.to_owned()));
    }

    pub fn get(&self, key: &str) -> Option<&FormatValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// Build the video encoder format for one attempt: AVC at the target size
/// and bit rate, surface input, periodic key frames, stalled-source repeat,
/// and — only when a positive cap is configured — the max-fps request.
pub fn build_video_format(config: &StreamConfig, video_size: Size) -> EncoderFormat {
    let mut format = EncoderFormat::new();
    format.set_string(KEY_MIME, MIME_VIDEO_AVC);
    format.set_int(KEY_WIDTH, video_size.width as i32);
    format.set_int(KEY_HEIGHT, video_size.height as i32);
    format.set_int(KEY_BIT_RATE, config.bit_rate as i32);
    format.set_int(KEY_FRAME_RATE, NOMINAL_FRAME_RATE);
    format.set_int(KEY_COLOR_FORMAT, COLOR_FORMAT_SURFACE);
    format.set_int(KEY_I_FRAME_INTERVAL, DEFAULT_I_FRAME_INTERVAL_SECS);
    format.set_long(KEY_REPEAT_PREVIOUS_FRAME_AFTER, REPEAT_FRAME_DELAY_US);
    if config.max_fps > 0 {
        format.set_float(KEY_MAX_FPS_TO_ENCODER, config.max_fps as f32);
    }

    apply_codec_options(&mut format, &config.codec_options);
    format
}

/// Apply tuning options onto a format, dispatching each value to the setter
/// of its type. The closed [`CodecOptionValue`] enum covers exactly the
/// format's supported types, so every option is applied — never silently
/// ignored.
pub fn apply_codec_options(format: &mut EncoderFormat, options: &[CodecOption]) {
    for option in options {
        match &option.value {
            CodecOptionValue::Int(v) => format.set_int(&option.key, *v),
            CodecOptionValue::Long(v) => format.set_long(&option.key, *v),
            CodecOptionValue::Float(v) => format.set_float(&option.key, *v),
            CodecOptionValue::String(v) => format.set_string(&option.key, v),
        }
    }
}
