//! Entropy backend throughput over skewed token-like streams.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use qyn1_core::compression::{
    get_backend, BackendOptions, EntropyBackend, BACKEND_CHUNKED_RANS, BACKEND_FSE_PRODUCTION,
    BACKEND_RANS,
};

const ALPHABET: usize = 128;

const BACKENDS: [(&str, u32); 3] =
    [(BACKEND_RANS, 12), (BACKEND_CHUNKED_RANS, 14), (BACKEND_FSE_PRODUCTION, 12)];

/// Deterministic stream with a long tail, shaped like morpheme indices.
fn skewed_symbols(count: usize) -> Vec<u32> {
    let mut state = 0x9E37_79B9u32;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let r = state % 1000;
            match r {
                0..=499 => r % 8,
                500..=849 => 8 + r % 24,
                _ => 32 + r % (ALPHABET as u32 - 32),
            }
        })
        .collect()
}

fn backend(name: &str, precision_bits: u32) -> Box<dyn EntropyBackend> {
    let options = BackendOptions { precision_bits, ..BackendOptions::default() };
    get_backend(name, options).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for count in [1_024usize, 16_384, 131_072] {
        let symbols = skewed_symbols(count);
        group.throughput(Throughput::Elements(count as u64));
        for (name, precision) in BACKENDS {
            let codec = backend(name, precision);
            group.bench_with_input(BenchmarkId::new(name, count), &symbols, |b, symbols| {
                b.iter(|| codec.compress(black_box(symbols), ALPHABET).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for count in [1_024usize, 16_384, 131_072] {
        let symbols = skewed_symbols(count);
        group.throughput(Throughput::Elements(count as u64));
        for (name, precision) in BACKENDS {
            let codec = backend(name, precision);
            let (data, model) = codec.compress(&symbols, ALPHABET).unwrap();
            group.bench_with_input(BenchmarkId::new(name, count), &data, |b, data| {
                b.iter(|| codec.decode(black_box(data), &model, count).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_precision(c: &mut Criterion) {
    let mut group = c.benchmark_group("precision");
    let symbols = skewed_symbols(32_768);
    group.throughput(Throughput::Elements(symbols.len() as u64));
    for precision in [11u32, 12, 14, 16] {
        let codec = backend(BACKEND_RANS, precision);
        group.bench_with_input(BenchmarkId::from_parameter(precision), &symbols, |b, symbols| {
            b.iter(|| codec.compress(black_box(symbols), ALPHABET).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_precision);
criterion_main!(benches);
