//! Performance benchmarks for log aggregation
//! Compares the sequential fold against partitioned map-reduce over the same log

use chrono::{TimeDelta, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use procminer::core::{group_by_case, RunningStats, SocialNetwork};
use procminer::{AnalysisConfig, Event, LogAnalyzer};
use std::hint::black_box;

const ACTIVITIES: [&str; 5] = ["submit", "review", "approve", "reject", "archive"];
const ORIGINATORS: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

/// Synthetic log: `cases` cases of up to eight events, interleaved
fn create_events(cases: usize) -> Vec<Event> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut events = Vec::new();
    for step in 0..8 {
        for case in 0..cases {
            if (case + step) % 9 == 8 {
                continue;
            }
            let start = base + TimeDelta::minutes((case * 7 + step * 13) as i64);
            events.push(
                Event::new(
                    format!("case-{}", case),
                    ACTIVITIES[(case + step) % ACTIVITIES.len()],
                    ORIGINATORS[(case * 3 + step) % ORIGINATORS.len()],
                    start,
                    start + TimeDelta::minutes(((case + step) % 45) as i64),
                )
                .unwrap(),
            );
        }
    }
    events
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_analysis");

    for cases in [100, 1_000, 10_000] {
        let events = create_events(cases);

        group.bench_with_input(BenchmarkId::new("sequential", cases), &events, |b, events| {
            let analyzer = LogAnalyzer::new(AnalysisConfig::sequential());
            b.iter(|| black_box(analyzer.analyze(events).unwrap()));
        });

        for partitions in [4, 16] {
            group.bench_with_input(
                BenchmarkId::new(format!("partitioned_{}", partitions), cases),
                &events,
                |b, events| {
                    let analyzer =
                        LogAnalyzer::new(AnalysisConfig::sequential().with_partitions(partitions));
                    b.iter(|| black_box(analyzer.analyze(events).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_running_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("running_stats");

    for size in [1_000, 100_000] {
        let values: Vec<f64> = (0..size).map(|i| (i % 997) as f64 * 0.5).collect();

        group.bench_with_input(BenchmarkId::new("observe", size), &values, |b, values| {
            b.iter(|| black_box(RunningStats::from_values(values.iter().copied()).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("merge_chunks", size), &values, |b, values| {
            b.iter(|| {
                let merged = values
                    .chunks(1_000)
                    .map(|chunk| RunningStats::from_values(chunk.iter().copied()).unwrap())
                    .fold(RunningStats::identity(), |acc, next| acc.merge(&next));
                black_box(merged)
            });
        });
    }

    group.finish();
}

fn bench_network(c: &mut Criterion) {
    let events = create_events(2_000);
    let instances: Vec<_> = group_by_case(events).into_values().collect();

    c.bench_function("network_from_instances", |b| {
        b.iter(|| black_box(SocialNetwork::from_instances(&instances)));
    });

    let (left, right) = instances.split_at(instances.len() / 2);
    let left = SocialNetwork::from_instances(left);
    let right = SocialNetwork::from_instances(right);
    c.bench_function("network_merge", |b| {
        b.iter(|| black_box(left.merge(&right)));
    });
}

criterion_group!(benches, bench_analysis, bench_running_stats, bench_network);
criterion_main!(benches);
