use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lap_ringbuf::Ringbuf;
use tracing::info;

const RING_CAPACITY: usize = 1 << 14;

/// A generator thread streams a wrapping byte counter through the ring
/// while a sink thread drains and checks it, both logging the ring state
/// they act on.
fn main() {
    tracing_subscriber::fmt::init();

    let ring = Ringbuf::alloc(RING_CAPACITY).unwrap();
    let (mut producer, mut consumer) = ring.split();

    let stop = Arc::new(AtomicBool::new(false));

    let generator = {
        let stop = stop.clone();
        thread::spawn(move || {
            let write_size = producer.capacity() / 4;
            let mut value = 0u8;

            while !stop.load(Ordering::Relaxed) {
                let state = producer.state();
                if state.free_bytes < write_size {
                    thread::sleep(Duration::from_millis(1));
                    continue;
                }

                let n = write_size.min(state.contiguous_free_bytes);
                info!(
                    write_index = state.write_index,
                    read_index = state.read_index,
                    free = state.free_bytes,
                    contiguous_free = state.contiguous_free_bytes,
                    n,
                    "generator writing"
                );

                let free = producer.free_slice();
                for byte in free[..n].iter_mut() {
                    *byte = value;
                    value = value.wrapping_add(1);
                }
                unsafe { producer.advance_write(n) };

                thread::sleep(Duration::from_millis(10));
            }
        })
    };

    let sink = {
        let stop = stop.clone();
        thread::spawn(move || {
            let read_size = consumer.capacity() / 64;
            let mut expected = 0u8;

            while !stop.load(Ordering::Relaxed) {
                let state = consumer.state();
                if state.used_bytes < read_size {
                    thread::sleep(Duration::from_millis(1));
                    continue;
                }

                let n = read_size.min(state.contiguous_used_bytes);
                info!(
                    write_index = state.write_index,
                    read_index = state.read_index,
                    used = state.used_bytes,
                    contiguous_used = state.contiguous_used_bytes,
                    n,
                    "sink reading"
                );

                for byte in &consumer.used_slice()[..n] {
                    assert_eq!(*byte, expected, "byte stream out of order");
                    expected = expected.wrapping_add(1);
                }
                unsafe { consumer.advance_read(n) };

                thread::sleep(Duration::from_millis(2));
            }
        })
    };

    thread::sleep(Duration::from_secs(2));
    stop.store(true, Ordering::Relaxed);

    generator.join().unwrap();
    sink.join().unwrap();

    info!("demo finished");
}
