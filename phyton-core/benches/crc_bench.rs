//! Performance benchmarks for the MPEG-2-style CRC-32.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use phyton_core::crc::{Crc32, checksum};
use std::hint::black_box;

mod test_data {
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. ";
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
            let remaining = size - data.len();
            let chunk_size = remaining.min(text.len());
            data.extend_from_slice(&text[..chunk_size]);
        }
        data
    }
}

/// Block sizes matching typical firmware container blocks (512 B..64 KB).
fn bench_crc32_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc32_sizes");

    let sizes = [
        ("512B", 512),
        ("4KB", 4 * 1024),
        ("32KB", 32 * 1024),
        ("64KB", 64 * 1024),
    ];

    for (size_name, size) in sizes {
        let data = test_data::text_like(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| black_box(checksum(black_box(data))));
        });
    }

    group.finish();
}

/// Incremental updates across a 32 KB block, matching how a firmware
/// container's CRC is folded per-chunk during reassembly.
fn bench_crc32_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc32_incremental");

    let size = 32 * 1024;
    let data = test_data::text_like(size);

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(
        BenchmarkId::from_parameter("single_shot"),
        &data,
        |b, data| {
            b.iter(|| black_box(checksum(black_box(data))));
        },
    );

    for chunk_size in [256, 1024, 4096] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("chunks_{chunk_size}")),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut crc = Crc32::new();
                    for chunk in data.chunks(chunk_size) {
                        crc.update(black_box(chunk));
                    }
                    black_box(crc.finalize())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_crc32_sizes, bench_crc32_incremental);
criterion_main!(benches);
