//! Throughput of a full analysis run
//!
//! Run with: cargo bench --bench analytics_bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use psy_analytics::psy_core::SubjectAttributes;
use psy_analytics::{AnalysisConfig, AnalyticsEngine, CancellationToken, GroupBy, Observation, Period};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const APTITUDES: &[&str] = &["V", "E", "A", "CON", "R", "N", "M", "O"];

/// `evaluations` evaluations spread over two years, one record per aptitude
fn generate(evaluations: usize, seed: u64) -> Vec<Observation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut data = Vec::with_capacity(evaluations * APTITUDES.len());

    for eval in 0..evaluations {
        let date = start + Duration::days(rng.gen_range(0..730));
        let gender = if rng.gen_bool(0.5) { "F" } else { "M" };
        for (i, code) in APTITUDES.iter().enumerate() {
            let drift = date.signed_duration_since(start).num_days() as f64 / 730.0 * i as f64;
            let percentile: f64 = (rng.gen_range(10.0..90.0) + drift).clamp(0.0, 100.0);
            data.push(Observation {
                evaluation_id: format!("ev-{eval}"),
                subject_id: Some(format!("subject-{}", eval % 500)),
                timestamp: date.and_hms_opt(10, 0, 0).unwrap(),
                aptitude_code: code.to_string(),
                aptitude_name: None,
                percentile,
                direct_score: percentile / 2.0,
                attributes: SubjectAttributes {
                    gender: Some(gender.to_string()),
                    ..SubjectAttributes::default()
                },
            });
        }
    }
    data
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = AnalyticsEngine::new();
    let cancel = CancellationToken::new();
    let config = AnalysisConfig::new(Period::Monthly)
        .with_time_range(24)
        .with_group_by(GroupBy::Gender)
        .with_forecasting(6);

    for evaluations in [100, 1_000, 10_000] {
        let data = generate(evaluations, 42);
        group.throughput(Throughput::Elements(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("monthly_by_gender", evaluations),
            &data,
            |b, data| b.iter(|| engine.analyze(black_box(data), &config, &cancel).unwrap()),
        );
    }
    group.finish();
}

fn bench_periods(c: &mut Criterion) {
    let mut group = c.benchmark_group("period");
    let engine = AnalyticsEngine::new();
    let cancel = CancellationToken::new();
    let data = generate(2_000, 7);

    for period in [Period::Weekly, Period::Monthly, Period::Quarterly] {
        let config = AnalysisConfig::new(period).with_time_range(8);
        group.bench_with_input(BenchmarkId::new("analyze", period), &config, |b, config| {
            b.iter(|| engine.analyze(black_box(&data), config, &cancel).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze, bench_periods);
criterion_main!(benches);
