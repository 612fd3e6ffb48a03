use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ── Size ──────────────────────────────────────────────────────────────────────

/// Pixel dimensions of a surface or video target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width:  u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The rect `(0, 0) .. (width, height)`.
    pub fn to_rect(self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Same dimensions with width and height swapped.
    pub fn rotated(self) -> Self {
        Self { width: self.height, height: self.width }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned pixel rectangle, `left/top` inclusive, `right/bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left:   i32,
    pub top:    i32,
    pub right:  i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

// ── Rotation ──────────────────────────────────────────────────────────────────

/// Display rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// From a quarter-turn count (0..=3); values outside wrap.
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> u32 {
        self.quarter_turns() as u32 * 90
    }

    /// Whether this rotation swaps width and height.
    pub fn transposes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

// ── ScreenInfo ────────────────────────────────────────────────────────────────

/// Geometry of the capture target, fetched from the capture source at the
/// start of every attempt and immutable for that attempt's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    /// Source area of the device screen that is captured.
    pub content_rect: Rect,
    /// Target video size, including any locked video orientation.
    pub video_size: Size,
    /// Target video size ignoring the locked orientation.
    pub unlocked_video_size: Size,
    /// Rotation applied between the content rect and the video frame.
    pub video_rotation: Rotation,
    /// Platform layer stack the virtual display mirrors.
    pub layer_stack: u32,
}

// ── EncodedFrame ──────────────────────────────────────────────────────────────

/// One compressed unit drained from a video encoder session.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub data: Bytes,
    /// Presentation timestamp in microseconds; `None` for units that carry
    /// no real timestamp (codec config packets).
    pub pts_us: Option<u64>,
    pub key_frame: bool,
    /// Stream initialization metadata (SPS/PPS-equivalent), not picture data.
    pub config: bool,
}

impl EncodedFrame {
    /// A config packet (no timestamp, not a key frame).
    pub fn config(data: Bytes) -> Self {
        Self { data, pts_us: None, key_frame: false, config: true }
    }

    /// A picture frame with the given timestamp.
    pub fn picture(data: Bytes, pts_us: u64, key_frame: bool) -> Self {
        Self { data, pts_us: Some(pts_us), key_frame, config: false }
    }
}

// ── CapturedImage ─────────────────────────────────────────────────────────────

/// One raw RGBA8888 image acquired from an image stream in snapshot mode.
///
/// `row_stride` may exceed `width * pixel_stride`; readers must honor the
/// padding when walking rows.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub data: Bytes,
    pub width:  u32,
    pub height: u32,
    /// Bytes from the start of one row to the start of the next.
    pub row_stride: usize,
    /// Bytes per pixel within a row.
    pub pixel_stride: usize,
}
