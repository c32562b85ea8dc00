use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use event_counter::OrderedCountIndex;
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate id sequences ──────────────────────────────

fn ordered_ids(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_ids(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut ids = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        ids.push((x >> 33) as i64);
    }
    ids
}

fn sorted_entries(ids: &[i64]) -> Vec<(i64, u64)> {
    let mut entries: Vec<(i64, u64)> = ids.iter().map(|&id| (id, 1)).collect();
    entries.sort_unstable();
    entries.dedup_by_key(|entry| entry.0);
    entries
}

fn btree_range_sum(map: &BTreeMap<i64, u64>, low: i64, high: i64) -> u128 {
    map.range(low..=high).map(|(_, &count)| u128::from(count)).sum()
}

// ─── Update Benchmarks ──────────────────────────────────────────────────────

fn bench_increase_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("increase_ordered");
    let ids = ordered_ids(N);

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter(|| {
            let mut index = OrderedCountIndex::new();
            for &id in &ids {
                index.increase(id, 1);
            }
            index
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &id in &ids {
                *map.entry(id).or_insert(0u64) += 1;
            }
            map
        });
    });

    group.finish();
}

fn bench_increase_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("increase_random");
    let ids = random_ids(N);

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter(|| {
            let mut index = OrderedCountIndex::new();
            for &id in &ids {
                index.increase(id, 1);
            }
            index
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &id in &ids {
                *map.entry(id).or_insert(0u64) += 1;
            }
            map
        });
    });

    group.finish();
}

fn bench_reduce_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_random");
    let ids = random_ids(N);
    let entries = sorted_entries(&ids);

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter_batched(
            || OrderedCountIndex::from_sorted(&entries),
            |mut index| {
                for &id in &ids {
                    index.reduce(id, 1);
                }
                index
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || entries.iter().copied().collect::<BTreeMap<_, _>>(),
            |mut map| {
                for &id in &ids {
                    if let Some(count) = map.get_mut(&id) {
                        *count -= 1;
                        if *count == 0 {
                            map.remove(&id);
                        }
                    }
                }
                map
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Bulk Load Benchmarks ───────────────────────────────────────────────────

fn bench_from_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_sorted");
    let entries = sorted_entries(&ordered_ids(N));

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter(|| OrderedCountIndex::from_sorted(black_box(&entries)));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| black_box(&entries).iter().copied().collect::<BTreeMap<_, _>>());
    });

    group.finish();
}

// ─── Query Benchmarks ───────────────────────────────────────────────────────

fn bench_count_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_random");
    let ids = random_ids(N);
    let entries = sorted_entries(&ids);
    let index = OrderedCountIndex::from_sorted(&entries);
    let map: BTreeMap<i64, u64> = entries.iter().copied().collect();

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter(|| ids.iter().map(|&id| index.count(black_box(id))).sum::<u64>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| ids.iter().map(|&id| map.get(&black_box(id)).copied().unwrap_or(0)).sum::<u64>());
    });

    group.finish();
}

fn bench_range_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_sum");
    let ids = ordered_ids(N);
    let entries = sorted_entries(&ids);
    let index = OrderedCountIndex::from_sorted(&entries);
    let map: BTreeMap<i64, u64> = entries.iter().copied().collect();
    let bounds: Vec<(i64, i64)> = random_ids(100)
        .into_iter()
        .map(|x| {
            let low = x % N as i64;
            (low, low + (x / N as i64) % (N as i64 / 2))
        })
        .collect();

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter(|| bounds.iter().map(|&(low, high)| index.range_sum(low, high)).sum::<u128>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| bounds.iter().map(|&(low, high)| btree_range_sum(&map, low, high)).sum::<u128>());
    });

    group.finish();
}

fn bench_next_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_random");
    let ids = random_ids(N);
    let entries = sorted_entries(&ids);
    let index = OrderedCountIndex::from_sorted(&entries);
    let map: BTreeMap<i64, u64> = entries.iter().copied().collect();

    group.bench_function(BenchmarkId::new("OrderedCountIndex", N), |b| {
        b.iter(|| ids.iter().filter_map(|&id| index.next_id(black_box(id))).count());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            ids.iter()
                .filter_map(|&id| map.range(black_box(id) + 1..).next().map(|(&next, _)| next))
                .count()
        });
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(update_benches, bench_increase_ordered, bench_increase_random, bench_reduce_random,);

criterion_group!(load_benches, bench_from_sorted,);

criterion_group!(query_benches, bench_count_random, bench_range_sum, bench_next_random,);

criterion_main!(update_benches, load_benches, query_benches,);
