mod header;
pub mod state;

use std::alloc::alloc_zeroed;
use std::alloc::dealloc;
use std::alloc::Layout;
use std::mem::align_of;
use std::mem::size_of;
use std::ptr::NonNull;
use std::sync::Arc;

use snafu::ensure;
use snafu::OptionExt;
use tracing::debug;

use crate::consumer::Consumer;
use crate::error;
use crate::error::Result;
use crate::producer::Producer;
use crate::ringbuf::header::Header;
use crate::ringbuf::state::RingState;

/// The ring buffer view over a shared region.
///
/// ## The underlying structure
///
/// ```text
///                                             storage_ptr
///                                                  |
///                                                  v
/// +--------------+--------------+--------------+--------------------------+
/// | read_ptr     | write_ptr    | capacity     | storage                  |
/// +--------------+--------------+--------------+--------------------------+
/// | usize        | usize        | usize        | capacity bytes           |
/// +--------------+--------------+--------------+--------------------------+
/// ```
///
/// The region starts with a three word header followed by the storage
/// array. The capacity must be a power of two; the constructors validate
/// it once and every later operation relies on it. The two lap pointers
/// carry both an index into the storage and a lap parity bit, which is how
/// a full ring and an empty ring stay distinguishable without any counter.
///
/// A `Ringbuf` is a view, not the region itself. Views over a caller-owned
/// region ([`Ringbuf::init`], [`Ringbuf::attach`]) never release anything;
/// views over a ring created with [`Ringbuf::alloc`] release the backing
/// allocation when the last of them is dropped.
pub struct Ringbuf {
    /// Accessors for the two lap pointers at the start of the region.
    header: Header,

    /// The raw pointer to the storage array behind the header.
    storage_ptr: *mut u8,

    /// Capacity of the storage array in bytes, always a power of two.
    /// The header copy never changes after init, so each view caches it.
    capacity: usize,

    /// Releases the backing allocation of rings created by
    /// [`Ringbuf::alloc`]; `None` for views over caller-owned regions.
    drop_guard: Option<Arc<DropGuard>>,
}

unsafe impl Send for Ringbuf {}
unsafe impl Sync for Ringbuf {}

/// Length of the ring header in bytes: the read lap pointer, the write lap
/// pointer and the capacity, one usize each. A caller-owned region must
/// hold `HEADER_LEN + capacity` bytes.
pub const HEADER_LEN: usize = 3 * size_of::<usize>();

impl Ringbuf {
    /// Initialize a ring in a caller-owned region.
    ///
    /// Writes the capacity, which becomes `region_len - HEADER_LEN`, and
    /// resets both lap pointers to zero, leaving an empty ring. Other
    /// contexts pick the ring up with [`Ringbuf::attach`] afterwards.
    ///
    /// # Safety
    /// - `region` must be valid for reads and writes of `region_len` bytes
    ///   and stay alive for as long as any view over it is in use.
    /// - Nothing else may access the region until `init` returns.
    pub unsafe fn init(region: NonNull<u8>, region_len: usize) -> Result<Self> {
        // 1. Check the region geometry.
        let addr = region.as_ptr() as usize;
        ensure!(
            addr % align_of::<usize>() == 0,
            error::MisalignedRegionSnafu { addr }
        );
        ensure!(
            region_len > HEADER_LEN,
            error::RegionTooSmallSnafu {
                provided: region_len,
                required: HEADER_LEN + 1,
            }
        );

        // 2. The storage is everything behind the header.
        let capacity = region_len - HEADER_LEN;
        ensure!(
            capacity.is_power_of_two(),
            error::InvalidCapacitySnafu { capacity }
        );

        // 3. Write the header: the capacity, then both pointers to zero.
        unsafe { capacity_slot(region).write(capacity) };

        let ringbuf = unsafe { Self::view_unchecked(region, capacity) };
        ringbuf.header.set_read_ptr(0);
        ringbuf.header.set_write_ptr(0);

        debug!(capacity, region_len, "initialized ring in region");

        Ok(ringbuf)
    }

    /// Attach a view to a region that already holds an initialized ring.
    ///
    /// The header is validated but left untouched, so a producer context
    /// and a consumer context can each attach their own view without
    /// disturbing data in flight.
    ///
    /// # Safety
    /// - `region` must be valid for reads and writes of `region_len` bytes
    ///   and stay alive for as long as any view over it is in use.
    /// - The header must have been written by [`Ringbuf::init`] before the
    ///   first attach; attaching concurrently with `init` is not allowed.
    pub unsafe fn attach(region: NonNull<u8>, region_len: usize) -> Result<Self> {
        // 1. Check the region geometry.
        let addr = region.as_ptr() as usize;
        ensure!(
            addr % align_of::<usize>() == 0,
            error::MisalignedRegionSnafu { addr }
        );
        ensure!(
            region_len > HEADER_LEN,
            error::RegionTooSmallSnafu {
                provided: region_len,
                required: HEADER_LEN + 1,
            }
        );

        // 2. Read the stored capacity and check it against the region.
        let capacity = unsafe { capacity_slot(region).read() };
        ensure!(
            capacity.is_power_of_two(),
            error::InvalidCapacitySnafu { capacity }
        );
        ensure!(
            region_len >= HEADER_LEN + capacity,
            error::RegionTooSmallSnafu {
                provided: region_len,
                required: HEADER_LEN + capacity,
            }
        );

        debug!(capacity, region_len, "attached ring view to region");

        Ok(unsafe { Self::view_unchecked(region, capacity) })
    }

    /// Allocate a zeroed region on the heap and initialize a ring in it.
    ///
    /// The returned view owns the region together with the handles split
    /// from it; the allocation is released when the last of them is
    /// dropped.
    pub fn alloc(capacity: usize) -> Result<Self> {
        ensure!(
            capacity.is_power_of_two(),
            error::InvalidCapacitySnafu { capacity }
        );

        let region_len = HEADER_LEN
            .checked_add(capacity)
            .context(error::InvalidCapacitySnafu { capacity })?;
        let layout = Layout::from_size_align(region_len, align_of::<usize>())
            .ok()
            .context(error::InvalidCapacitySnafu { capacity })?;

        // 1. Allocate the zeroed region.
        let region_ptr = unsafe { alloc_zeroed(layout) };
        let region =
            NonNull::new(region_ptr).context(error::AllocFailedSnafu { capacity })?;

        let drop_guard = Arc::new(DropGuard { region, layout });

        // 2. Initialize a ring in it. The guard frees the region if this
        //    fails.
        let mut ringbuf = unsafe { Self::init(region, region_len)? };
        ringbuf.drop_guard = Some(drop_guard);

        Ok(ringbuf)
    }

    unsafe fn view_unchecked(region: NonNull<u8>, capacity: usize) -> Self {
        let header = unsafe { Header::new(region.as_ptr()) };
        let storage_ptr = unsafe { region.as_ptr().add(HEADER_LEN) };

        Ringbuf {
            header,
            storage_ptr,
            capacity,
            drop_guard: None,
        }
    }

    /// Split the ring into its producer and consumer halves.
    ///
    /// The write lap pointer is only reachable through the [`Producer`]
    /// and the read lap pointer through the [`Consumer`]. Splitting
    /// consumes the view and views cannot be duplicated from safe code,
    /// so one ring yields exactly one handle pair:
    ///
    /// ```compile_fail
    /// use lap_ringbuf::Ringbuf;
    ///
    /// let ring = Ringbuf::alloc(64).unwrap();
    /// let first = ring.clone().split();
    /// let second = ring.split();
    /// ```
    ///
    /// In cross-context embeddings each context attaches its own view,
    /// splits it, and keeps only the half it owns.
    pub fn split(self) -> (Producer, Consumer) {
        let consumer = Consumer::new(self.share());
        let producer = Producer::new(self);

        (producer, consumer)
    }

    /// Duplicate the view for the second half of a split. Private: safe
    /// callers get exactly one producer and one consumer per ring.
    fn share(&self) -> Ringbuf {
        Ringbuf {
            header: self.header,
            storage_ptr: self.storage_ptr,
            capacity: self.capacity,
            drop_guard: self.drop_guard.clone(),
        }
    }

    /// Capacity of the storage array in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Compute a snapshot of the ring state.
    ///
    /// Each lap pointer is loaded once before anything is derived, so the
    /// snapshot is internally consistent without any lock. It goes stale
    /// the moment either side advances; take a fresh one before every
    /// advance decision.
    pub fn state(&self) -> RingState {
        let read_ptr = self.header.read_ptr();
        let write_ptr = self.header.write_ptr();

        RingState::derive(read_ptr, write_ptr, self.capacity)
    }

    /// Advance the write lap pointer by `n` bytes.
    ///
    /// Publishes the bytes at the old write position: the consumer side
    /// may read them the moment the pointer moves.
    ///
    /// # Safety
    /// `n` must not exceed the `free_bytes` of a state snapshot taken
    /// after the previous write advance. The ring performs no range check
    /// of its own; advancing too far silently corrupts the accounting.
    pub unsafe fn advance_write(&self, n: usize) {
        debug_assert!(n <= self.state().free_bytes);

        self.header.advance_write(n);
    }

    /// Advance the read lap pointer by `n` bytes.
    ///
    /// Releases the bytes at the old read position: the producer side may
    /// overwrite them the moment the pointer moves.
    ///
    /// # Safety
    /// `n` must not exceed the `used_bytes` of a state snapshot taken
    /// after the previous read advance. The ring performs no range check
    /// of its own; advancing too far silently corrupts the accounting.
    pub unsafe fn advance_read(&self, n: usize) {
        debug_assert!(n <= self.state().used_bytes);

        self.header.advance_read(n);
    }

    pub(crate) fn storage_ptr(&self) -> *mut u8 {
        self.storage_ptr
    }
}

unsafe fn capacity_slot(region: NonNull<u8>) -> *mut usize {
    unsafe { (region.as_ptr() as *mut usize).add(2) }
}

/// Owns the heap region behind rings created by [`Ringbuf::alloc`]. The
/// region is returned to the allocator when all views over it are gone.
struct DropGuard {
    region: NonNull<u8>,
    layout: Layout,
}

unsafe impl Send for DropGuard {}
unsafe impl Sync for DropGuard {}

impl Drop for DropGuard {
    fn drop(&mut self) {
        unsafe { dealloc(self.region.as_ptr(), self.layout) };
    }
}
