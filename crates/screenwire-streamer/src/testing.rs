//! Hand-rolled capability fakes shared by the strategy and session tests.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use screenwire_core::{
    CapturedImage, CodecError, DisplayError, EncodedFrame, Rect, Rotation, ScreenInfo, Size,
    StreamError,
};
use tokio::io::AsyncWrite;

use crate::codec::{
    CaptureSource, EncoderEngine, EncoderInfo, ImageStream, ImageStreamFactory,
    VideoEncoderSession,
};
use crate::display::{DisplayHandle, DisplayManager, Surface, SurfaceBinding};
use crate::format::EncoderFormat;
use crate::rotation::RotationWatch;

/// The rotation watch a fake source received via `set_rotation_listener`,
/// so test scripts can fire rotations mid-drain.
pub(crate) type RotationSlot = Arc<Mutex<Option<RotationWatch>>>;

static SURFACE_IDS: AtomicU64 = AtomicU64::new(1);

fn next_surface_id() -> u64 {
    SURFACE_IDS.fetch_add(1, Ordering::Relaxed)
}

// ── Screen geometries ─────────────────────────────────────────────────────────

pub(crate) fn portrait_info() -> ScreenInfo {
    ScreenInfo {
        content_rect: Rect::new(0, 0, 1080, 1920),
        video_size: Size::new(1080, 1920),
        unlocked_video_size: Size::new(1080, 1920),
        video_rotation: Rotation::Deg0,
        layer_stack: 0,
    }
}

pub(crate) fn landscape_info() -> ScreenInfo {
    ScreenInfo {
        content_rect: Rect::new(0, 0, 1920, 1080),
        video_size: Size::new(1920, 1080),
        unlocked_video_size: Size::new(1080, 1920),
        video_rotation: Rotation::Deg90,
        layer_stack: 0,
    }
}

// ── FakeSource ────────────────────────────────────────────────────────────────

/// Capture source serving a scripted sequence of geometries; the last one
/// repeats once the earlier entries are consumed.
pub(crate) struct FakeSource {
    infos: Mutex<VecDeque<ScreenInfo>>,
    fetches: AtomicU64,
    slot: RotationSlot,
}

impl FakeSource {
    pub fn single(info: ScreenInfo) -> Self {
        Self::with_infos(vec![info])
    }

    pub fn with_infos(infos: Vec<ScreenInfo>) -> Self {
        Self {
            infos: Mutex::new(infos.into()),
            fetches: AtomicU64::new(0),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn fetches(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn rotation_slot(&self) -> RotationSlot {
        Arc::clone(&self.slot)
    }
}

impl CaptureSource for FakeSource {
    fn screen_info(&self) -> Result<ScreenInfo, StreamError> {
        let mut infos = self.infos.lock().unwrap();
        let info = if infos.len() > 1 {
            infos.pop_front().unwrap()
        } else {
            *infos.front().ok_or_else(|| StreamError::Source {
                reason: "no scripted screen info".to_owned(),
            })?
        };
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(info)
    }

    fn set_rotation_listener(&self, watch: Option<RotationWatch>) {
        *self.slot.lock().unwrap() = watch;
    }
}

// ── FakeDisplays ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct DisplayLog {
    next_id: u64,
    created: Vec<(String, bool)>,
    bindings: Vec<SurfaceBinding>,
    destroyed: Vec<u64>,
    active: Vec<u64>,
    fail_bind: Option<String>,
}

/// Display manager recording every create/bind/destroy.
#[derive(Clone)]
pub(crate) struct FakeDisplays {
    inner: Arc<Mutex<DisplayLog>>,
    secure_allowed: bool,
}

impl FakeDisplays {
    pub fn new() -> Self {
        Self { inner: Arc::default(), secure_allowed: true }
    }

    /// A platform revision that rejects unprivileged secure displays.
    pub fn insecure() -> Self {
        Self { secure_allowed: false, ..Self::new() }
    }

    pub fn fail_bind(&self, reason: &str) {
        self.inner.lock().unwrap().fail_bind = Some(reason.to_owned());
    }

    pub fn created(&self) -> usize {
        self.inner.lock().unwrap().created.len()
    }

    pub fn created_with(&self) -> Vec<(String, bool)> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn destroyed(&self) -> usize {
        self.inner.lock().unwrap().destroyed.len()
    }

    pub fn active(&self) -> usize {
        self.inner.lock().unwrap().active.len()
    }

    pub fn bindings(&self) -> Vec<SurfaceBinding> {
        self.inner.lock().unwrap().bindings.clone()
    }
}

impl DisplayManager for FakeDisplays {
    fn create_virtual_display(
        &self,
        name: &str,
        secure: bool,
    ) -> Result<DisplayHandle, DisplayError> {
        let mut log = self.inner.lock().unwrap();
        log.next_id += 1;
        let id = log.next_id;
        log.created.push((name.to_owned(), secure));
        log.active.push(id);
        Ok(DisplayHandle::from_raw(id))
    }

    fn bind_surface(
        &self,
        _display: &DisplayHandle,
        binding: &SurfaceBinding,
    ) -> Result<(), DisplayError> {
        let mut log = self.inner.lock().unwrap();
        if let Some(reason) = &log.fail_bind {
            return Err(DisplayError::BindFailed { reason: reason.clone() });
        }
        log.bindings.push(binding.clone());
        Ok(())
    }

    fn destroy_virtual_display(&self, display: DisplayHandle) {
        let mut log = self.inner.lock().unwrap();
        let id = display.as_raw();
        log.destroyed.push(id);
        log.active.retain(|&d| d != id);
    }

    fn secure_displays_allowed(&self) -> bool {
        self.secure_allowed
    }
}

// ── FakeEngine + scripted encoder sessions ────────────────────────────────────

/// One step of a scripted encoder drain.
pub(crate) enum ScriptItem {
    Frame(EncodedFrame),
    /// Fire the rotation watch registered on the fake source, then keep
    /// draining the script.
    SignalRotation(RotationSlot),
    Fail(String),
    Eos,
    /// Block until cancelled (for stop-request tests).
    Pending,
}

#[derive(Default)]
pub(crate) struct SessionLog {
    pub configured: Option<EncoderFormat>,
    pub started: bool,
    pub stopped: bool,
    pub released: bool,
}

struct FakeVideoSession {
    name: String,
    script: VecDeque<ScriptItem>,
    log: Arc<Mutex<SessionLog>>,
    surface: u64,
}

#[async_trait]
impl VideoEncoderSession for FakeVideoSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, format: &EncoderFormat) -> Result<(), CodecError> {
        self.log.lock().unwrap().configured = Some(format.clone());
        Ok(())
    }

    fn input_surface(&mut self) -> Result<Surface, CodecError> {
        Ok(Surface::from_raw(self.surface))
    }

    fn start(&mut self) -> Result<(), CodecError> {
        self.log.lock().unwrap().started = true;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<EncodedFrame>, CodecError> {
        loop {
            match self.script.pop_front() {
                Some(ScriptItem::Frame(frame)) => return Ok(Some(frame)),
                Some(ScriptItem::SignalRotation(slot)) => {
                    if let Some(watch) = slot.lock().unwrap().as_ref() {
                        watch.signal();
                    }
                }
                Some(ScriptItem::Fail(reason)) => return Err(CodecError::Fault(reason)),
                Some(ScriptItem::Eos) | None => return Ok(None),
                Some(ScriptItem::Pending) => return std::future::pending().await,
            }
        }
    }

    fn stop(&mut self) {
        self.log.lock().unwrap().stopped = true;
    }

    fn release(&mut self) {
        self.log.lock().unwrap().released = true;
    }
}

struct EngineInner {
    encoders: Vec<String>,
    sessions: Mutex<VecDeque<FakeVideoSession>>,
}

/// Encoder engine with a fixed discovery list and a queue of scripted
/// sessions, handed out in order.
#[derive(Clone)]
pub(crate) struct FakeEngine {
    inner: Arc<EngineInner>,
}

impl FakeEngine {
    pub fn new(encoders: Vec<&str>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                encoders: encoders.into_iter().map(str::to_owned).collect(),
                sessions: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn push_session(&self, name: &str, script: Vec<ScriptItem>) -> Arc<Mutex<SessionLog>> {
        let log = Arc::new(Mutex::new(SessionLog::default()));
        self.inner.sessions.lock().unwrap().push_back(FakeVideoSession {
            name: name.to_owned(),
            script: script.into(),
            log: Arc::clone(&log),
            surface: next_surface_id(),
        });
        log
    }

    pub fn arc(&self) -> Arc<dyn EncoderEngine> {
        Arc::new(self.clone())
    }

    fn next_session(&self) -> Result<Box<dyn VideoEncoderSession>, CodecError> {
        self.inner
            .sessions
            .lock()
            .unwrap()
            .pop_front()
            .map(|s| Box::new(s) as Box<dyn VideoEncoderSession>)
            .ok_or_else(|| CodecError::Fault("no scripted session".to_owned()))
    }
}

impl EncoderEngine for FakeEngine {
    fn list_encoders(&self, _mime: &str) -> Vec<EncoderInfo> {
        self.inner.encoders.iter().map(|name| EncoderInfo::new(name.as_str())).collect()
    }

    fn create_by_name(&self, name: &str) -> Result<Box<dyn VideoEncoderSession>, CodecError> {
        if !self.inner.encoders.iter().any(|e| e == name) {
            return Err(CodecError::NotFound(name.to_owned()));
        }
        self.next_session()
    }

    fn create_default(&self, _mime: &str) -> Result<Box<dyn VideoEncoderSession>, CodecError> {
        self.next_session()
    }
}

// ── FakeImages + scripted image streams ───────────────────────────────────────

pub(crate) enum ImageScriptItem {
    Image(CapturedImage),
    SignalRotation(RotationSlot),
    Fail(String),
    Eos,
    Pending,
}

#[derive(Default)]
pub(crate) struct StreamLog {
    pub closed: bool,
}

struct FakeImageStream {
    script: VecDeque<ImageScriptItem>,
    log: Arc<Mutex<StreamLog>>,
    surface: u64,
}

#[async_trait]
impl ImageStream for FakeImageStream {
    fn surface(&self) -> Surface {
        Surface::from_raw(self.surface)
    }

    async fn acquire_latest(&mut self) -> Result<Option<CapturedImage>, CodecError> {
        loop {
            match self.script.pop_front() {
                Some(ImageScriptItem::Image(image)) => return Ok(Some(image)),
                Some(ImageScriptItem::SignalRotation(slot)) => {
                    if let Some(watch) = slot.lock().unwrap().as_ref() {
                        watch.signal();
                    }
                }
                Some(ImageScriptItem::Fail(reason)) => return Err(CodecError::Fault(reason)),
                Some(ImageScriptItem::Eos) | None => return Ok(None),
                Some(ImageScriptItem::Pending) => return std::future::pending().await,
            }
        }
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closed = true;
    }
}

struct ImagesInner {
    streams: Mutex<VecDeque<FakeImageStream>>,
    opens: Mutex<Vec<(Size, usize)>>,
}

/// Image stream factory with a queue of scripted streams.
#[derive(Clone)]
pub(crate) struct FakeImages {
    inner: Arc<ImagesInner>,
}

impl FakeImages {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ImagesInner {
                streams: Mutex::new(VecDeque::new()),
                opens: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn push_stream(&self, script: Vec<ImageScriptItem>) -> Arc<Mutex<StreamLog>> {
        let log = Arc::new(Mutex::new(StreamLog::default()));
        self.inner.streams.lock().unwrap().push_back(FakeImageStream {
            script: script.into(),
            log: Arc::clone(&log),
            surface: next_surface_id(),
        });
        log
    }

    pub fn arc(&self) -> Arc<dyn ImageStreamFactory> {
        Arc::new(self.clone())
    }

    pub fn opens(&self) -> Vec<(Size, usize)> {
        self.inner.opens.lock().unwrap().clone()
    }
}

impl ImageStreamFactory for FakeImages {
    fn open(&self, size: Size, max_images: usize) -> Result<Box<dyn ImageStream>, CodecError> {
        self.inner.opens.lock().unwrap().push((size, max_images));
        self.inner
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .map(|s| Box::new(s) as Box<dyn ImageStream>)
            .ok_or_else(|| CodecError::Fault("no scripted image stream".to_owned()))
    }
}

// ── FailingSink ───────────────────────────────────────────────────────────────

/// Sink accepting exactly `limit` bytes, then failing like a closed pipe.
pub(crate) struct FailingSink {
    data: Vec<u8>,
    limit: usize,
}

impl FailingSink {
    pub fn new(limit: usize) -> Self {
        Self { data: Vec::new(), limit }
    }

    pub fn written(&self) -> &[u8] {
        &self.data
    }
}

impl AsyncWrite for FailingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.data.len() + buf.len() > self.limit {
            return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed")));
        }
        self.data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

// ── Image fixtures ────────────────────────────────────────────────────────────

/// RGBA test image with `row_padding` junk bytes appended to every row.
pub(crate) fn gradient_image(width: u32, height: u32, row_padding: usize) -> CapturedImage {
    let pixel_stride = 4;
    let row_stride = width as usize * pixel_stride + row_padding;
    let mut data = vec![0xEEu8; row_stride * height as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = y * row_stride + x * pixel_stride;
            data[offset] = (x % 256) as u8;
            data[offset + 1] = (y % 256) as u8;
            data[offset + 2] = 0x40;
            data[offset + 3] = 0xFF;
        }
    }
    CapturedImage {
        data: data.into(),
        width,
        height,
        row_stride,
        pixel_stride,
    }
}
