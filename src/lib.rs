//! Lock-free single-producer single-consumer byte ring buffer built on
//! lap pointers.
//!
//! The ring stores no element counter and takes no lock. Its entire
//! shared state is two monotonically increasing pointers: for a capacity
//! of `2^N` bytes the low `N` bits of a pointer index the storage array
//! and bit `N` counts laps, modulo two. The extra bit is what tells a
//! full ring from an empty one when both indexes coincide. Each pointer
//! has exactly one writer, so a single-width atomic store per advance and
//! an atomic load per inspection are all the synchronization the scheme
//! needs.
//!
//! ## Quick start
//!
//! ```
//! use lap_ringbuf::Ringbuf;
//!
//! let ring = Ringbuf::alloc(64).unwrap();
//! let (mut producer, mut consumer) = ring.split();
//!
//! producer.write(b"telemetry frame").unwrap();
//!
//! let mut frame = [0u8; 15];
//! consumer.read(&mut frame).unwrap();
//! assert_eq!(&frame, b"telemetry frame");
//! ```
//!
//! ## Caller-owned regions
//!
//! [`Ringbuf::alloc`] owns its region. Embeddings that bring their own
//! memory, a shared mapping or a static arena, lay the ring out with
//! [`Ringbuf::init`] and pick it up elsewhere with [`Ringbuf::attach`].
//! The region needs [`HEADER_LEN`] bytes for the header plus the
//! power-of-two storage behind it.
//!
//! ## Copy-free access
//!
//! [`Producer::write`] and [`Consumer::read`] copy and handle the wrap.
//! The raw workflow skips the copy: inspect [`Producer::state`], fill
//! [`Producer::free_slice`], commit with [`Producer::advance_write`];
//! the read side mirrors it with [`Consumer::used_slice`] and
//! [`Consumer::advance_read`].

pub mod consumer;
pub mod error;
pub mod producer;
pub mod ringbuf;

pub use consumer::Consumer;
pub use error::Error;
pub use producer::Producer;
pub use ringbuf::state::RingState;
pub use ringbuf::Ringbuf;
pub use ringbuf::HEADER_LEN;
