use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gcs::{fast_reduce, Decoder, ElementSet, Encoder, FilterKey};

/// Generate a block-sized element set: 25-byte P2PKH-like scripts.
fn generate_scripts(n: usize) -> ElementSet {
    (0..n)
        .map(|i| {
            let mut script = vec![0x76, 0xa9, 0x14];
            script.extend_from_slice(&(i as u64).to_le_bytes());
            script.resize(23, 0x5c);
            script.extend_from_slice(&[0x88, 0xac]);
            script
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let key = FilterKey::new([0x42; 16]);

    for size in [100, 1_000, 10_000, 100_000] {
        let elements = generate_scripts(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("basic", size), &elements, |b, elements| {
            b.iter(|| {
                let filter = Encoder::default().encode(black_box(elements), &key).unwrap();
                black_box(filter)
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let key = FilterKey::new([0x42; 16]);

    for size in [100, 1_000, 10_000, 100_000] {
        let filter = Encoder::default()
            .encode(&generate_scripts(size), &key)
            .unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("lenient", size), &filter, |b, filter| {
            b.iter(|| {
                let values = Decoder::decode(black_box(&filter.data), 19).unwrap();
                black_box(values)
            });
        });

        group.bench_with_input(BenchmarkId::new("exact", size), &filter, |b, filter| {
            b.iter(|| {
                let values = black_box(filter).values(19).unwrap();
                black_box(values)
            });
        });
    }

    group.finish();
}

fn bench_fast_reduce(c: &mut Criterion) {
    c.bench_function("fast_reduce", |b| {
        let mut v: u64 = 0x9E37_79B9_7F4A_7C15;
        b.iter(|| {
            v = v.wrapping_mul(0x2545_F491_4F6C_DD1D);
            black_box(fast_reduce(black_box(v), 10_000 * 784_931))
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_fast_reduce);
criterion_main!(benches);
