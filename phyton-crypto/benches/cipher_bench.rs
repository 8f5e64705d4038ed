//! Performance benchmarks for the mangle cipher.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use phyton_crypto::MangleKey;
use std::hint::black_box;

fn bench_block(c: &mut Criterion) {
    let key = MangleKey::new([0x5Au8; 16]);
    let mut block = [1u8, 2, 3, 4, 5, 6, 7, 8];

    let mut group = c.benchmark_group("mangle_cipher_block");
    group.throughput(Throughput::Bytes(8));
    group.bench_function("encrypt_block", |b| {
        b.iter(|| key.encrypt_block(black_box(&mut block)));
    });
    group.bench_function("decrypt_block", |b| {
        b.iter(|| key.decrypt_block(black_box(&mut block)));
    });
    group.finish();
}

fn bench_bulk(c: &mut Criterion) {
    let key = MangleKey::new([0xA5u8; 16]);
    let mut group = c.benchmark_group("mangle_cipher_bulk");

    for size in [512usize, 4096, 32 * 1024] {
        let mut buf = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| key.encrypt(black_box(&mut buf)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_block, bench_bulk);
criterion_main!(benches);
