//! Report benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use delivery_analytics::execution::ReportContext;
use delivery_analytics::reports::Report;
use delivery_analytics::sample::{SampleGenerator, SampleSize};

fn create_context(orders: usize) -> ReportContext {
    let size = SampleSize {
        orders,
        ..SampleSize::default()
    };
    let store = SampleGenerator::new(size).generate().unwrap();
    ReportContext::from_store(&store).unwrap()
}

fn benchmark_reports(c: &mut Criterion) {
    let ctx = create_context(10_000);

    let mut group = c.benchmark_group("reports");
    group.sample_size(10);

    // Joins plus a window function, and a plain aggregation for contrast
    for report in [
        Report::RestaurantRevenueRanking,
        Report::RestaurantGrowthRatio,
        Report::CustomerLifetimeValue,
    ] {
        group.bench_with_input(BenchmarkId::new("report", report.number()), &report, |b, r| {
            b.iter(|| {
                let result = ctx.run(*r).unwrap();
                black_box(result.row_count);
            });
        });
    }

    group.finish();
}

fn benchmark_full_suite(c: &mut Criterion) {
    let ctx = create_context(10_000);

    c.bench_function("reports_sequential", |b| {
        b.iter(|| {
            let total: usize = ctx
                .run_all_sequential()
                .into_iter()
                .filter_map(|r| r.ok())
                .map(|r| r.row_count)
                .sum();
            black_box(total)
        });
    });

    c.bench_function("reports_parallel", |b| {
        b.iter(|| {
            let total: usize = ctx
                .run_all()
                .into_iter()
                .filter_map(|r| r.ok())
                .map(|r| r.row_count)
                .sum();
            black_box(total)
        });
    });
}

criterion_group!(benches, benchmark_reports, benchmark_full_suite);
criterion_main!(benches);
