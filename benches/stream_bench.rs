//! Criterion benchmarks for the ring buffer stream
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ringstream::RingBufferStream;

fn bench_byte_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_stream");
    group.throughput(Throughput::Bytes(1));

    group.bench_function("write_byte", |b| {
        let stream = RingBufferStream::new(65536).unwrap();
        let mut i = 0u8;
        b.iter(|| {
            stream.write(&[black_box(i)], 0, 1).unwrap();
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("pop", |b| {
        let stream = RingBufferStream::new(65536).unwrap();
        stream.write(&[0xAB; 32768], 0, 32768).unwrap();
        b.iter(|| {
            let v = stream.pop().unwrap();
            stream.write(&[black_box(v)], 0, 1).unwrap();
        });
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    for chunk in [64usize, 1024, 16 * 1024].iter() {
        group.throughput(Throughput::Bytes(*chunk as u64));
        group.bench_function(format!("write_read_{}", chunk), |b| {
            let stream = RingBufferStream::new(65536).unwrap();
            let payload = vec![0x5Au8; *chunk];
            let mut scratch = vec![0u8; *chunk];
            b.iter(|| {
                stream.write(black_box(&payload), 0, *chunk).unwrap();
                black_box(stream.read(&mut scratch, 0, *chunk).unwrap());
            });
        });
    }

    group.bench_function("overwrite_full_ring", |b| {
        let stream = RingBufferStream::new(4096).unwrap();
        let payload = vec![0xC3u8; 6000];
        b.iter(|| stream.write(black_box(&payload), 0, payload.len()).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_byte_ops, bench_throughput);
criterion_main!(benches);
