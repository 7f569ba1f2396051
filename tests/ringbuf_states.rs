use std::mem::size_of;
use std::ptr::NonNull;

use lap_ringbuf::Ringbuf;
use lap_ringbuf::HEADER_LEN;

#[test]
fn test_state_round_trip() {
    let ring = Ringbuf::alloc(8).unwrap();
    let (mut producer, mut consumer) = ring.split();

    producer.write(&[1, 2, 3, 4, 5]).unwrap();

    let state = consumer.state();
    assert_eq!(state.used_bytes, 5);
    assert_eq!(state.free_bytes, 3);
    assert!(!state.is_full);
    assert!(!state.is_empty);

    let mut out = [0u8; 5];
    consumer.read(&mut out).unwrap();
    assert_eq!(out, [1, 2, 3, 4, 5]);
    assert!(consumer.state().is_empty);

    producer.write(&[0; 8]).unwrap();

    let state = producer.state();
    assert!(state.is_full);
    assert_eq!(state.read_index, state.write_index);

    let mut out = [0u8; 8];
    consumer.read(&mut out).unwrap();

    let state = consumer.state();
    assert!(state.is_empty);
    assert_eq!(state.read_index, state.write_index);
}

#[test]
fn test_contiguous_drain_fills_in_two_runs() {
    let ring = Ringbuf::alloc(16).unwrap();
    let (mut producer, mut consumer) = ring.split();

    // Park both indexes at 10.
    producer.write(&[0; 10]).unwrap();
    let mut sink = [0u8; 10];
    consumer.read(&mut sink).unwrap();

    let mut runs = Vec::new();
    loop {
        let state = producer.state();
        if state.contiguous_free_bytes == 0 {
            break;
        }
        runs.push(state.contiguous_free_bytes);
        producer
            .write(&vec![0xCD; state.contiguous_free_bytes])
            .unwrap();
    }

    assert_eq!(runs, vec![6, 10]);
    assert!(producer.state().is_full);
}

#[test]
fn test_caller_owned_region_shared_by_two_views() {
    let mut backing = vec![0usize; (HEADER_LEN + 64) / size_of::<usize>()];
    let region = NonNull::new(backing.as_mut_ptr() as *mut u8).unwrap();
    let region_len = HEADER_LEN + 64;

    let producer_view = unsafe { Ringbuf::init(region, region_len) }.unwrap();
    let consumer_view = unsafe { Ringbuf::attach(region, region_len) }.unwrap();

    // Each side keeps the half it owns, the way two processes over a
    // shared mapping would.
    let (mut producer, _) = producer_view.split();
    let (_, mut consumer) = consumer_view.split();

    producer.write(b"shared region").unwrap();

    let mut got = [0u8; 13];
    consumer.read(&mut got).unwrap();
    assert_eq!(&got, b"shared region");
    assert!(producer.state().is_empty);
}
