use std::hint::black_box;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use lap_ringbuf::RingState;
use lap_ringbuf::Ringbuf;

fn criterion_bench_state(c: &mut Criterion) {
    c.bench_function("derive_state", |b| {
        b.iter(|| {
            RingState::derive(black_box(2), black_box(14), black_box(1 << 14))
        })
    });

    let ringbuf = Ringbuf::alloc(1 << 14).unwrap();
    unsafe { ringbuf.advance_write(1000) };
    unsafe { ringbuf.advance_read(200) };

    c.bench_function("load_state", |b| b.iter(|| ringbuf.state()));
}

fn criterion_bench_write_read(c: &mut Criterion) {
    let ringbuf = Ringbuf::alloc(1 << 14).unwrap();
    let (mut producer, mut consumer) = ringbuf.split();

    let frame = [0x5Au8; 64];
    let mut out = [0u8; 64];

    c.bench_function("write_read_64", |b| {
        b.iter(|| {
            producer.write(black_box(&frame)).unwrap();
            consumer.read(black_box(&mut out)).unwrap();
        })
    });
}

criterion_group!(benches, criterion_bench_state, criterion_bench_write_read);
criterion_main!(benches);
