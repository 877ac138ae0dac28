//! Single-flight guard for callers that poll a frame source

use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag allowing at most one scan in flight.
///
/// The pipeline never takes it itself; a camera loop or request handler
/// acquires it around [`crate::Scanner::scan`] and skips the frame when busy.
#[derive(Debug, Default)]
pub struct ScanSlot {
    busy: AtomicBool,
}

impl ScanSlot {
    /// A free slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if a scan is already running
    pub fn try_acquire(&self) -> Option<ScanGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| ScanGuard { slot: self })
    }

    /// Whether a scan currently holds the slot
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases its [`ScanSlot`] on drop
#[derive(Debug)]
pub struct ScanGuard<'a> {
    slot: &'a ScanSlot,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.slot.busy.store(false, Ordering::Release);
    }
}
