//! Benchmarks for indicator preparation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trading_core::traits::Indicator;
use trading_core::types::{Bar, BarSeries};
use trading_indicators::{IndicatorConfig, IndicatorPreparer, Rsi};

fn generate_series(size: usize) -> BarSeries {
    BarSeries::from_bars(
        "BTC/USDT",
        (0..size).map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 300_000, close, close + 0.5, close - 0.5, close, 1000.0)
        }),
    )
    .expect("generated timestamps are increasing")
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [1000, 10000, 100000].iter() {
        let closes = generate_series(*size).closes();

        group.bench_with_input(BenchmarkId::new("simple", size), &closes, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("wilder", size), &closes, |b, data| {
            let rsi = Rsi::wilder(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare");
    let preparer = IndicatorPreparer::new(IndicatorConfig::default()).expect("default config");

    // Host strategies typically pass a few hundred candles per evaluation
    for size in [100, 500, 5000].iter() {
        let series = generate_series(*size);

        group.bench_with_input(BenchmarkId::new("frame", size), &series, |b, series| {
            b.iter(|| preparer.prepare(black_box(series)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rsi, benchmark_prepare);
criterion_main!(benches);
