use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dotgrid_core::{
    generate_halftone_states, generate_usage_series_seeded, GradientDirection, GridCoord,
    GridSize, HalftoneStrategy, PositionSet, UsageSeriesParams,
};

fn diagonal_shape(grid: GridSize) -> PositionSet {
    let span = grid.width.min(grid.height) as i32;
    (0..span).map(|i| GridCoord::new(i, i)).collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("halftone");
    let strategies = [
        HalftoneStrategy::halo(),
        HalftoneStrategy::Distance { radius: 2.5 },
        HalftoneStrategy::Gradient {
            direction: GradientDirection::Outward,
        },
    ];

    for size in [5u32, 14, 32] {
        let grid = GridSize::square(size);
        let full = diagonal_shape(grid);
        for strategy in strategies {
            group.bench_with_input(
                BenchmarkId::new(strategy.kind(), size),
                &size,
                |b, _| {
                    b.iter(|| generate_halftone_states(&full, &strategy, grid, &[]));
                },
            );
        }
    }

    group.finish();
}

fn bench_usage_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("usage_series");

    for (name, params) in [
        ("dashboard", UsageSeriesParams::dashboard()),
        ("card", UsageSeriesParams::card()),
    ] {
        group.bench_function(BenchmarkId::new("halo", name), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                generate_usage_series_seeded(0.7, -0.4, &params, seed).state_map()
            });
        });
    }

    group.finish();
}

criterion_group!(halftone_benches, bench_strategies, bench_usage_series);
criterion_main!(halftone_benches);
