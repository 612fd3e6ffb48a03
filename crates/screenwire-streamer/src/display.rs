//! Virtual display management capability.

use screenwire_core::{DisplayError, Rect, Rotation};

// ── Opaque platform tokens ────────────────────────────────────────────────────

/// Opaque token for a platform capture surface (the buffer queue that
/// receives rendered frames). Issued by an encoder session or image stream,
/// consumed by [`DisplayManager::bind_surface`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Surface(u64);

impl Surface {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Opaque token for a created virtual display. Owned by the session
/// controller for the lifetime of one attempt and always passed back to
/// [`DisplayManager::destroy_virtual_display`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

// ── SurfaceBinding ────────────────────────────────────────────────────────────

/// Everything a display binding needs, carried as one value so surface
/// assignment, projection and layer-stack assignment apply in a single
/// transaction — a frame must never be composed with inconsistent geometry.
#[derive(Debug, Clone)]
pub struct SurfaceBinding {
    pub surface: Surface,
    pub rotation: Rotation,
    /// Source area of the device screen to project.
    pub content_rect: Rect,
    /// Destination rect on the virtual display.
    pub video_rect: Rect,
    pub layer_stack: u32,
}

// ── DisplayManager ────────────────────────────────────────────────────────────

/// Platform capability for creating, binding and destroying off-screen
/// virtual displays.
pub trait DisplayManager: Send + Sync {
    /// Create a virtual display. `secure` requests capture of protected
    /// content and must only be passed where
    /// [`secure_displays_allowed`](Self::secure_displays_allowed) is true.
    fn create_virtual_display(
        &self,
        name: &str,
        secure: bool,
    ) -> Result<DisplayHandle, DisplayError>;

    /// Atomically apply surface, projection and layer stack to the display.
    fn bind_surface(
        &self,
        display: &DisplayHandle,
        binding: &SurfaceBinding,
    ) -> Result<(), DisplayError>;

    /// Destroy a virtual display. Must be safe to call after a partially
    /// failed bind — cleanup paths call it unconditionally.
    fn destroy_virtual_display(&self, display: DisplayHandle);

    /// Whether this platform revision permits secure virtual displays
    /// without elevated privilege. The session controller falls back to
    /// `secure = false` where it does not.
    fn secure_displays_allowed(&self) -> bool;
}
