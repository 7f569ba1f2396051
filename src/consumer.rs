use std::ptr;
use std::slice;

use snafu::ensure;

use crate::error;
use crate::error::Result;
use crate::ringbuf::state::RingState;
use crate::ringbuf::Ringbuf;

/// The read half of a split ring.
///
/// Owns the read lap pointer: nothing else may advance it while this
/// handle exists. The handle never blocks; when the ring runs dry the
/// caller decides whether to retry, poll or back off.
pub struct Consumer {
    ringbuf: Ringbuf,
}

impl Consumer {
    pub(crate) fn new(ringbuf: Ringbuf) -> Self {
        Consumer { ringbuf }
    }

    /// Capacity of the ring in bytes.
    pub fn capacity(&self) -> usize {
        self.ringbuf.capacity()
    }

    /// Snapshot of the ring state.
    ///
    /// The used counts only degrade conservatively on this side: the
    /// producer can grow them after the snapshot, never shrink them.
    pub fn state(&self) -> RingState {
        self.ringbuf.state()
    }

    /// The contiguous used run starting at the current read index.
    ///
    /// Consume a prefix of the slice, then release it with
    /// [`Consumer::advance_read`]. The slice is empty when the ring is
    /// empty. Used bytes beyond the storage end are not covered; they
    /// become reachable once the read index wraps.
    pub fn used_slice(&self) -> &[u8] {
        let state = self.ringbuf.state();

        unsafe {
            slice::from_raw_parts(
                self.ringbuf.storage_ptr().add(state.read_index),
                state.contiguous_used_bytes,
            )
        }
    }

    /// Advance the read lap pointer by `n` bytes.
    ///
    /// # Safety
    /// `n` must not exceed the `used_bytes` of a snapshot taken after this
    /// consumer's previous advance, and the bytes must already be out of
    /// the slice: the producer may overwrite them the moment the pointer
    /// moves.
    pub unsafe fn advance_read(&mut self, n: usize) {
        unsafe { self.ringbuf.advance_read(n) };
    }

    /// Copy the next `buf.len()` bytes out of the ring and advance past
    /// them.
    ///
    /// All or nothing: when the ring holds fewer used bytes than `buf`
    /// wants, nothing is read. The copy wraps across the storage end when
    /// the used region does, so callers never deal with the split.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        let state = self.ringbuf.state();

        ensure!(
            buf.len() <= state.used_bytes,
            error::NotEnoughDataSnafu {
                available: state.used_bytes,
                expected: buf.len(),
            }
        );

        let first = buf.len().min(state.contiguous_used_bytes);
        let storage_ptr = self.ringbuf.storage_ptr();

        unsafe {
            ptr::copy_nonoverlapping(
                storage_ptr.add(state.read_index),
                buf.as_mut_ptr(),
                first,
            );
            ptr::copy_nonoverlapping(
                storage_ptr,
                buf.as_mut_ptr().add(first),
                buf.len() - first,
            );

            self.ringbuf.advance_read(buf.len());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ringbuf::Ringbuf;

    #[test]
    fn test_consumer_read_rejects_underflow() {
        let (mut producer, mut consumer) = Ringbuf::alloc(8).unwrap().split();

        let mut out = [0u8; 1];
        let result = consumer.read(&mut out);
        assert!(matches!(
            result,
            Err(Error::NotEnoughData {
                available: 0,
                expected: 1,
                ..
            })
        ));

        producer.write(&[7, 8]).unwrap();

        let mut out = [0u8; 3];
        let result = consumer.read(&mut out);
        assert!(matches!(result, Err(Error::NotEnoughData { .. })));

        let mut out = [0u8; 2];
        consumer.read(&mut out).unwrap();
        assert_eq!(out, [7, 8]);
        assert!(consumer.state().is_empty);
    }

    #[test]
    fn test_consumer_read_wraps_storage_end() {
        let (mut producer, mut consumer) = Ringbuf::alloc(8).unwrap().split();

        producer.write(&[0; 5]).unwrap();
        let mut sink = [0u8; 5];
        consumer.read(&mut sink).unwrap();

        // Read index 5, the next 6 bytes cross the storage end.
        producer.write(&[1, 2, 3, 4, 5, 6]).unwrap();
        let state = consumer.state();
        assert_eq!(state.read_index, 5);
        assert_eq!(state.contiguous_used_bytes, 3);

        let mut out = [0u8; 6];
        consumer.read(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_consumer_used_slice() {
        let (mut producer, mut consumer) = Ringbuf::alloc(8).unwrap().split();
        assert_eq!(consumer.capacity(), 8);

        assert!(consumer.used_slice().is_empty());

        producer.write(&[1, 2, 3, 4]).unwrap();
        assert_eq!(consumer.used_slice(), &[1, 2, 3, 4]);

        let n = consumer.used_slice().len();
        unsafe { consumer.advance_read(n) };

        assert!(consumer.used_slice().is_empty());
        assert!(consumer.state().is_empty);
    }
}
