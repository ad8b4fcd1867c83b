use std::sync::atomic::{AtomicU8, Ordering};

/// Distance between two touched bytes.
pub const TOUCH_STRIDE: usize = 1024;

/// Process-wide byte buffer allocated once at startup and touched by every
/// loaded request. Never resized or freed.
///
/// Concurrent requests write overlapping positions without coordination. The
/// written values are never read back for correctness, only the page
/// residency matters, so stores are relaxed.
pub struct MemoryArena {
    bytes: Box<[AtomicU8]>,
}

impl MemoryArena {
    /// Zeroed allocation. Pages are not written here, so they only become
    /// resident once [`MemoryArena::touch`] reaches them.
    pub fn new(len: usize) -> Self {
        let zeroed: Box<[u8]> = vec![0u8; len].into_boxed_slice();
        // SAFETY: AtomicU8 has the same size, alignment and bit validity as u8.
        let bytes = unsafe { Box::from_raw(Box::into_raw(zeroed) as *mut [AtomicU8]) };
        Self { bytes }
    }

    pub fn empty() -> Self {
        Self::new(0)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write one byte every [`TOUCH_STRIDE`] bytes across the whole arena.
    pub fn touch(&self) {
        for i in (0..self.bytes.len()).step_by(TOUCH_STRIDE) {
            self.bytes[i].store((i % 256) as u8, Ordering::Relaxed);
        }
    }
}
