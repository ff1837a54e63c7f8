//! Criterion benchmarks for SahamLab hot paths.
//!
//! Benchmarks:
//! 1. Filter evaluation over a dataset-sized store, per preset
//! 2. Sorting a filtered view
//! 3. CSV ingest with tagging

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sahamlab_core::store::write_csv;
use sahamlab_core::{BacktestRecord, Column, Metric, Preset, ResultStore, SortDirection};

// ── Helpers ──────────────────────────────────────────────────────────

const TOKENS: [&str; 5] = ["CCI", "RSI", "MACD", "STO", "SMACross"];

fn make_records(n: usize) -> Vec<BacktestRecord> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            BacktestRecord::new(format!("{} {} {} {}", TOKENS[i % 5], i % 50, i % 30, i % 90))
                .with_metric(Metric::TotalTrades, (i % 320) as f64)
                .with_metric(Metric::MaxDrawdown, -((i % 75) as f64))
                .with_metric(Metric::WinRate, (x * 0.37).sin().abs() * 95.0)
                .with_metric(Metric::Return, (x * 0.11).cos().abs() * 220.0)
                .with_metric(Metric::Sharpe, (x * 0.07).sin().abs())
                .with_metric(Metric::ProfitFactor, (i % 2100) as f64)
                .with_metric(Metric::ReturnAnn, (x * 0.13).sin().abs() * 11.0)
                .with_metric(Metric::AvgTrade, (x * 0.05).cos().abs() * 55.0)
        })
        .collect()
}

// ── 1. Filter evaluation ─────────────────────────────────────────────

fn bench_filter(c: &mut Criterion) {
    let store = ResultStore::from_records(make_records(50_000));
    let mut group = c.benchmark_group("filter_50k");
    for preset in Preset::ALL {
        let spec = preset.filter_spec();
        group.bench_with_input(BenchmarkId::from_parameter(preset), &spec, |b, spec| {
            b.iter(|| black_box(spec.apply(&store)).len())
        });
    }
    group.finish();
}

// ── 2. View sorting ──────────────────────────────────────────────────

fn bench_sort(c: &mut Criterion) {
    let store = ResultStore::from_records(make_records(50_000));
    let view = Preset::NoFilter.filter_spec().apply(&store);
    c.bench_function("sort_sharpe_desc", |b| {
        b.iter(|| black_box(view.sorted_by(Column::Sharpe, SortDirection::Descending)))
    });
    c.bench_function("sort_settings_asc", |b| {
        b.iter(|| black_box(view.sorted_by(Column::Settings, SortDirection::Ascending)))
    });
}

// ── 3. CSV ingest ────────────────────────────────────────────────────

fn bench_load(c: &mut Criterion) {
    let mut csv = Vec::new();
    if write_csv(make_records(10_000), &mut csv).is_err() {
        return;
    }
    c.bench_function("load_csv_10k", |b| {
        b.iter(|| ResultStore::from_reader(black_box(csv.as_slice())).map(|s| s.len()))
    });
}

criterion_group!(benches, bench_filter, bench_sort, bench_load);
criterion_main!(benches);
