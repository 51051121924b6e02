use avl_ost::OSAvlTree;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate value sequences ───────────────────────────

fn ordered_values(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_values(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut values = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        values.push((x >> 33) as i64);
    }
    values
}

fn sorted_vec_insert(vec: &mut Vec<i64>, value: i64) {
    let at = vec.partition_point(|&v| v <= value);
    vec.insert(at, value);
}

// ─── Insertion ──────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (name, values) in [("ordered", ordered_values(N)), ("random", random_values(N))] {
        let mut group = c.benchmark_group(format!("insert_{name}"));

        group.bench_function(BenchmarkId::new("OSAvlTree", N), |b| {
            b.iter(|| {
                let mut tree = OSAvlTree::new();
                for &v in &values {
                    tree.insert(v);
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &v in &values {
                    set.insert(v);
                }
                set
            });
        });

        group.bench_function(BenchmarkId::new("SortedVec", N), |b| {
            b.iter(|| {
                let mut vec = Vec::with_capacity(N);
                for &v in &values {
                    sorted_vec_insert(&mut vec, v);
                }
                vec
            });
        });

        group.finish();
    }
}

// ─── Order statistics ───────────────────────────────────────────────────────

fn bench_get_by_rank(c: &mut Criterion) {
    let values = random_values(N);
    let tree: OSAvlTree<i64> = values.iter().copied().collect();
    let set: BTreeSet<i64> = values.iter().copied().collect();
    let len = tree.len().min(set.len());

    let mut group = c.benchmark_group("get_by_rank");

    group.bench_function(BenchmarkId::new("OSAvlTree", N), |b| {
        b.iter(|| {
            for rank in (0..len).step_by(7) {
                black_box(tree.get(rank).ok());
            }
        });
    });

    // BTreeSet has no rank index; `nth` walks from the front.
    group.bench_function(BenchmarkId::new("BTreeSet::iter().nth", N), |b| {
        b.iter(|| {
            for rank in (0..len).step_by(7) {
                black_box(set.iter().nth(rank));
            }
        });
    });

    group.finish();
}

fn bench_index_of(c: &mut Criterion) {
    let values = random_values(N);
    let tree: OSAvlTree<i64> = values.iter().copied().collect();

    c.bench_function("index_of/OSAvlTree", |b| {
        b.iter(|| {
            for v in values.iter().step_by(7) {
                black_box(tree.index_of(v));
            }
        });
    });
}

// ─── Removal ────────────────────────────────────────────────────────────────

fn bench_remove(c: &mut Criterion) {
    let values = random_values(N);
    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("OSAvlTree::remove", N), |b| {
        b.iter_batched(
            || values.iter().copied().collect::<OSAvlTree<i64>>(),
            |mut tree| {
                for v in &values {
                    tree.remove(v);
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("OSAvlTree::remove_at", N), |b| {
        b.iter_batched(
            || values.iter().copied().collect::<OSAvlTree<i64>>(),
            |mut tree| {
                while !tree.is_empty() {
                    let _ = tree.remove_at(tree.len() / 2);
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet::remove", N), |b| {
        b.iter_batched(
            || values.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for v in &values {
                    set.remove(v);
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(insert_benches, bench_insert);
criterion_group!(rank_benches, bench_get_by_rank, bench_index_of);
criterion_group!(remove_benches, bench_remove);

criterion_main!(insert_benches, rank_benches, remove_benches);
