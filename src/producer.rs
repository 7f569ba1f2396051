use std::ptr;
use std::slice;

use snafu::ensure;

use crate::error;
use crate::error::Result;
use crate::ringbuf::state::RingState;
use crate::ringbuf::Ringbuf;

/// The write half of a split ring.
///
/// Owns the write lap pointer: nothing else may advance it while this
/// handle exists. The handle never blocks; when the ring runs out of space
/// the caller decides whether to retry, drop data or back off.
pub struct Producer {
    ringbuf: Ringbuf,
}

impl Producer {
    pub(crate) fn new(ringbuf: Ringbuf) -> Self {
        Producer { ringbuf }
    }

    /// Capacity of the ring in bytes.
    pub fn capacity(&self) -> usize {
        self.ringbuf.capacity()
    }

    /// Snapshot of the ring state.
    ///
    /// The free counts only degrade conservatively on this side: the
    /// consumer can grow them after the snapshot, never shrink them.
    pub fn state(&self) -> RingState {
        self.ringbuf.state()
    }

    /// The contiguous free run starting at the current write index.
    ///
    /// Fill a prefix of the slice, then commit it with
    /// [`Producer::advance_write`]. The slice is empty when the ring is
    /// full. Free bytes beyond the storage end are not covered; they
    /// become reachable once the write index wraps.
    pub fn free_slice(&mut self) -> &mut [u8] {
        let state = self.ringbuf.state();

        unsafe {
            slice::from_raw_parts_mut(
                self.ringbuf.storage_ptr().add(state.write_index),
                state.contiguous_free_bytes,
            )
        }
    }

    /// Advance the write lap pointer by `n` bytes.
    ///
    /// # Safety
    /// `n` must not exceed the `free_bytes` of a snapshot taken after this
    /// producer's previous advance, and the bytes must already be in
    /// place: the consumer may read them the moment the pointer moves.
    pub unsafe fn advance_write(&mut self, n: usize) {
        unsafe { self.ringbuf.advance_write(n) };
    }

    /// Copy `data` into the ring and advance past it.
    ///
    /// All or nothing: when `data` does not fit into the current free
    /// bytes, nothing is written. The copy wraps across the storage end
    /// when the free region does, so callers never deal with the split.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let state = self.ringbuf.state();

        ensure!(
            data.len() <= state.free_bytes,
            error::NotEnoughSpaceSnafu {
                remaining: state.free_bytes,
                expected: data.len(),
            }
        );

        let first = data.len().min(state.contiguous_free_bytes);
        let storage_ptr = self.ringbuf.storage_ptr();

        unsafe {
            ptr::copy_nonoverlapping(
                data.as_ptr(),
                storage_ptr.add(state.write_index),
                first,
            );
            ptr::copy_nonoverlapping(
                data.as_ptr().add(first),
                storage_ptr,
                data.len() - first,
            );

            self.ringbuf.advance_write(data.len());
        }

        Ok(())
    }
}
