use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Accessors for the lap pointers in a shared ring header.
///
/// ## The underlying structure
///
/// ```text
/// header.read_ptr     header.write_ptr
///     |                   |
///     v                   v
///     +-------------------+-------------------+-------------------+
///     | read_ptr          | write_ptr         | capacity          |
///     +-------------------+-------------------+-------------------+
///     | usize             | usize             | usize             |
///     +-------------------+-------------------+-------------------+
/// ```
///
/// Both lap pointers increase monotonically and wrap on overflow; only
/// their low bits are meaningful, so the wrap is harmless. They are only
/// ever touched through single-width atomic operations, so neither side
/// can observe a torn value. The capacity field never changes after
/// initialization and is read once at construction, not through here.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Header {
    /// The raw pointer to the read lap pointer, owned by the consumer.
    read_ptr: *mut usize,

    /// The raw pointer to the write lap pointer, owned by the producer.
    write_ptr: *mut usize,
}

impl Header {
    /// Create header accessors over the given region.
    ///
    /// # Safety
    /// The `region_ptr` must be a valid, usize-aligned pointer to the start
    /// of the ring region, alive for as long as the returned value is used.
    pub(crate) unsafe fn new(region_ptr: *mut u8) -> Self {
        let read_ptr = region_ptr as *mut usize;
        let write_ptr = unsafe { read_ptr.add(1) };

        Self { read_ptr, write_ptr }
    }

    pub(crate) fn read_ptr(&self) -> usize {
        let ptr = self.read_ptr;

        let atomic = unsafe { AtomicUsize::from_ptr(ptr) };
        atomic.load(Ordering::Acquire)
    }

    pub(crate) fn set_read_ptr(&self, value: usize) {
        let ptr = self.read_ptr;

        let atomic = unsafe { AtomicUsize::from_ptr(ptr) };
        atomic.store(value, Ordering::Release);
    }

    /// Advance the read lap pointer by `n`, wrapping on overflow.
    pub(crate) fn advance_read(&self, n: usize) {
        let ptr = self.read_ptr;

        let atomic = unsafe { AtomicUsize::from_ptr(ptr) };
        atomic.fetch_add(n, Ordering::Release);
    }

    pub(crate) fn write_ptr(&self) -> usize {
        let ptr = self.write_ptr;

        let atomic = unsafe { AtomicUsize::from_ptr(ptr) };
        atomic.load(Ordering::Acquire)
    }

    pub(crate) fn set_write_ptr(&self, value: usize) {
        let ptr = self.write_ptr;

        let atomic = unsafe { AtomicUsize::from_ptr(ptr) };
        atomic.store(value, Ordering::Release);
    }

    /// Advance the write lap pointer by `n`, wrapping on overflow.
    pub(crate) fn advance_write(&self, n: usize) {
        let ptr = self.write_ptr;

        let atomic = unsafe { AtomicUsize::from_ptr(ptr) };
        atomic.fetch_add(n, Ordering::Release);
    }
}
