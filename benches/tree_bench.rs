use avl_collections::{AvlTree, BinarySearchTree, InOrder, LevelOrder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn scrambled(n: u32) -> Vec<u32> {
    (0..n).map(|i| i.wrapping_mul(2_654_435_761) % (n * 4)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for n in [1_000u32, 10_000] {
        let keys = scrambled(n);
        group.bench_with_input(BenchmarkId::new("avl", n), &keys, |b, keys| {
            b.iter(|| keys.iter().copied().collect::<AvlTree<u32>>())
        });
        group.bench_with_input(BenchmarkId::new("bst", n), &keys, |b, keys| {
            b.iter(|| keys.iter().copied().collect::<BinarySearchTree<u32>>())
        });
        let sorted: Vec<u32> = (0..n).collect();
        group.bench_with_input(BenchmarkId::new("avl_sorted", n), &sorted, |b, keys| {
            b.iter(|| keys.iter().copied().collect::<AvlTree<u32>>())
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys = scrambled(10_000);
    let tree: AvlTree<u32> = keys.iter().copied().collect();
    c.bench_function("avl_remove_all", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            for key in &keys {
                tree.remove(key);
            }
            black_box(tree.size())
        })
    });
}

fn bench_traversal(c: &mut Criterion) {
    let tree: AvlTree<u32> = scrambled(10_000).into_iter().collect();
    c.bench_function("avl_in_order", |b| {
        b.iter(|| tree.iter::<InOrder>().copied().sum::<u32>())
    });
    c.bench_function("avl_level_order", |b| {
        b.iter(|| tree.iter::<LevelOrder>().count())
    });
}

criterion_group!(benches, bench_insert, bench_remove, bench_traversal);
criterion_main!(benches);
