use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fca::stdx::BitSet;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use std::env;
use std::hint::black_box;

const DEFAULT_SAMPLE_SIZE: usize = 50;
const DEFAULT_BIT_LENGTH: usize = 1 << 20;

fn bench_bitset(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitset");
    group.sample_size(env_usize("BITSET_BENCH_SAMPLE_SIZE").unwrap_or(DEFAULT_SAMPLE_SIZE));

    // Env overrides: BITSET_BENCH_BIT_LENGTH, BITSET_BENCH_SAMPLE_SIZE.
    // Odd lengths keep a partial last word in play.
    let bit_length = env_usize("BITSET_BENCH_BIT_LENGTH").unwrap_or(DEFAULT_BIT_LENGTH + 37);
    assert!(bit_length > 0);
    group.throughput(Throughput::Elements(bit_length as u64));

    let mut runner = TestRunner::deterministic();
    let sparse = random_bitset(&mut runner, bit_length, 64);
    let dense = {
        let mut bits = sparse.clone();
        bits.flip_all();
        bits
    };

    group.bench_with_input(BenchmarkId::new("flip_all", bit_length), &sparse, |b, bits| {
        let mut bits = bits.clone();
        b.iter(|| {
            bits.flip_all();
            black_box(&bits);
        });
    });

    group.bench_with_input(BenchmarkId::new("flip_each", bit_length), &sparse, |b, bits| {
        let mut bits = bits.clone();
        b.iter(|| {
            for i in 0..bits.size() {
                bits.flip(i);
            }
            black_box(&bits);
        });
    });

    group.bench_with_input(BenchmarkId::new("count", bit_length), &dense, |b, bits| {
        b.iter(|| black_box(bits.count()));
    });

    group.bench_with_input(BenchmarkId::new("any_empty", bit_length), &bit_length, |b, &len| {
        let bits = BitSet::empty(len);
        b.iter(|| black_box(bits.any()));
    });

    let superset = BitSet::full(bit_length);
    group.bench_with_input(
        BenchmarkId::new("is_proper_subset_of", bit_length),
        &sparse,
        |b, bits| {
            b.iter(|| black_box(bits.is_proper_subset_of(&superset)));
        },
    );

    group.bench_with_input(BenchmarkId::new("iter", bit_length), &sparse, |b, bits| {
        b.iter(|| black_box(bits.iter().sum::<usize>()));
    });

    group.finish();
}

/// Sets roughly one bit in `one_in` using a deterministic proptest runner.
fn random_bitset(runner: &mut TestRunner, bit_length: usize, one_in: usize) -> BitSet {
    let picks = (bit_length / one_in).max(1);
    let indices = prop::collection::vec(0..bit_length, picks)
        .new_tree(runner)
        .expect("index strategy")
        .current();

    let mut bits = BitSet::empty(bit_length);
    for idx in indices {
        bits.set(idx);
    }
    bits
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

criterion_group!(benches, bench_bitset);
criterion_main!(benches);
