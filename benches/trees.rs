use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use binarytrees::bench::{self, BenchConfig, Strategy};
use binarytrees::{boxed, tree, Arena};

fn build_and_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_and_check");
    for depth in [4, 8, 12, 16] {
        group.bench_with_input(BenchmarkId::new("boxed", depth), &depth, |b, &depth| {
            b.iter(|| boxed::checksum(&boxed::build(black_box(depth))));
        });

        let mut arena = Arena::for_depth(depth).unwrap();
        group.bench_with_input(BenchmarkId::new("pooled", depth), &depth, |b, &depth| {
            b.iter(|| {
                arena.reset();
                let root = tree::build(&mut arena, black_box(depth)).unwrap();
                tree::checksum(&arena, root).unwrap()
            });
        });
    }

    group.finish();
}

fn full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);
    let config = BenchConfig::new().max_depth(14);
    for strategy in Strategy::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(strategy),
            &strategy,
            |b, &strategy| {
                b.iter(|| bench::run(strategy, &config).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, build_and_check, full_run);
criterion_main!(benches);
