//! Single-slot rotation-change signal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A single-slot flag set from the device's rotation-observation thread and
/// consumed by the encoder loop, at most once per drained frame.
///
/// [`signal`](Self::signal) never blocks, so it is safe on the delivery
/// path. Release/Acquire ordering guarantees that a signal which
/// happens-before a [`consume`](Self::consume) is observed by it, and that a
/// signal issued after the consume returns is left pending for the next one.
/// Concurrent signals collapse into a single pending change.
#[derive(Debug, Clone, Default)]
pub struct RotationWatch {
    changed: Arc<AtomicBool>,
}

impl RotationWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the device orientation changed. Callable from any thread.
    pub fn signal(&self) {
        self.changed.store(true, Ordering::Release);
    }

    /// Atomically read and clear the pending-change flag.
    pub fn consume(&self) -> bool {
        self.changed.swap(false, Ordering::Acquire)
    }
}
