//! Derived ring state.
//!
//! The ring stores nothing but two monotonically increasing lap pointers.
//! For a capacity of `2^N` bytes, the low `N` bits of a pointer index the
//! storage array and bit `N` counts completed laps, modulo two. The write
//! pointer can run at most one full lap ahead of the read pointer, so one
//! extra bit is enough to tell full from empty when the index bits match:
//! equal lap bits mean empty, unequal mean full. Everything else in
//! [`RingState`] falls out of the same two values.

/// A point-in-time projection of the two lap pointers.
///
/// A snapshot is internally consistent but goes stale the moment either
/// side advances. The counts degrade safely for their natural reader: a
/// producer holding an old snapshot sees `free_bytes` that can only have
/// grown since, a consumer sees `used_bytes` that can only have grown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingState {
    /// Index of the next byte to read, in `[0, capacity)`.
    pub read_index: usize,

    /// Index of the next byte to write, in `[0, capacity)`.
    pub write_index: usize,

    /// The writer is exactly one lap ahead of the reader.
    pub is_full: bool,

    /// Both pointers are on the same lap and index.
    pub is_empty: bool,

    /// Total bytes available to read.
    pub used_bytes: usize,

    /// Total bytes available to write.
    pub free_bytes: usize,

    /// Bytes readable from `read_index` without crossing the storage end.
    pub contiguous_used_bytes: usize,

    /// Bytes writable from `write_index` without crossing the storage end.
    pub contiguous_free_bytes: usize,
}

impl RingState {
    /// Compute the state projected by a pair of lap pointers.
    ///
    /// Pure: reads nothing but its arguments, so a state can be derived
    /// from pointer values loaded once, without holding any lock. The
    /// `capacity` must be a power of two; the ring constructors validate
    /// it once and a debug assertion covers direct callers.
    #[inline]
    pub fn derive(read_ptr: usize, write_ptr: usize, capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());

        let mask = capacity - 1;

        let read_index = read_ptr & mask;
        let write_index = write_ptr & mask;

        // The index bits plus lap bit N, folded into one comparison value.
        let ptr_xor = (capacity | mask) & (read_ptr ^ write_ptr);
        let is_full = ptr_xor == capacity;
        let is_empty = ptr_xor == 0;

        // Wrapping subtraction on the masked indexes covers every state
        // except the two where the indexes coincide.
        let used_bytes = if is_full {
            capacity
        } else {
            write_index.wrapping_sub(read_index) & mask
        };
        let free_bytes = if is_empty {
            capacity
        } else {
            read_index.wrapping_sub(write_index) & mask
        };

        let contiguous_used_bytes = if is_empty {
            0
        } else if write_index <= read_index {
            capacity - read_index
        } else {
            write_index - read_index
        };
        let contiguous_free_bytes = if is_full {
            0
        } else if read_index <= write_index {
            capacity - write_index
        } else {
            read_index - write_index
        };

        RingState {
            read_index,
            write_index,
            is_full,
            is_empty,
            used_bytes,
            free_bytes,
            contiguous_used_bytes,
            contiguous_free_bytes,
        }
    }
}
