use std::hint::black_box;
use std::rc::Rc;
use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use freqlist::{FrequencyList, ManualClock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const KEYS: u64 = 4096;

/// Skewed key stream: low keys are drawn far more often than high ones.
fn skewed_keys(len: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let x: f64 = rng.r#gen();
            (x * x * KEYS as f64) as u64
        })
        .collect()
}

fn bench_update(c: &mut Criterion) {
    let keys = skewed_keys(16_384, 42);
    let mut group = c.benchmark_group("frequency_list_update");
    group.throughput(Throughput::Elements(keys.len() as u64));

    group.bench_function("frequency_only", |b| {
        b.iter_batched(
            || FrequencyList::with_capacity(KEYS as usize),
            |mut list| {
                for &key in &keys {
                    list.update(black_box(key));
                }
                list
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("with_recency", |b| {
        b.iter_batched(
            || FrequencyList::with_clock(ManualClock::new()),
            |mut list| {
                for &key in &keys {
                    list.update(black_box(key));
                }
                list
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_evict(c: &mut Criterion) {
    let keys = skewed_keys(16_384, 7);
    let mut group = c.benchmark_group("frequency_list_evict");
    group.throughput(Throughput::Elements(256));

    group.bench_function("remove_least_frequent_256", |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<FrequencyList<u64>>(),
            |mut list| black_box(list.remove_least_frequent(256, None)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("remove_overall_least_recent_256", |b| {
        b.iter_batched(
            || {
                let mut list = FrequencyList::with_clock(ManualClock::new());
                list.extend(keys.iter().copied());
                list
            },
            |mut list| black_box(list.remove_overall_least_recent(256)),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("remove_outside_window", |b| {
        b.iter_batched(
            || {
                let clock = Rc::new(ManualClock::new());
                let mut list = FrequencyList::with_clock(Rc::clone(&clock));
                for (i, &key) in keys.iter().enumerate() {
                    clock.set(Duration::from_micros(i as u64));
                    list.update(key);
                }
                list
            },
            |mut list| black_box(list.remove_overall_least_recent_outside(Duration::from_micros(8_000))),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let list: FrequencyList<u64> = skewed_keys(16_384, 3).into_iter().collect();
    let mut group = c.benchmark_group("frequency_list_traverse");
    group.throughput(Throughput::Elements(list.len() as u64));
    group.bench_function("least_to_most_frequent", |b| {
        b.iter(|| list.least_to_most_frequent().map(|key| black_box(*key)).sum::<u64>())
    });
    group.bench_function("most_to_least_frequent", |b| {
        b.iter(|| list.most_to_least_frequent().map(|key| black_box(*key)).sum::<u64>())
    });
    group.finish();
}

criterion_group!(benches, bench_update, bench_evict, bench_traverse);
criterion_main!(benches);
