use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use passpilot_core::model::TopicRecord;
use passpilot_core::planner::plan;
use passpilot_core::simulation::{simulate, SimulationConfig};

fn make_records(n: usize) -> Vec<TopicRecord> {
    (0..n)
        .map(|i| {
            let frequency = i % 7 + 1;
            let total_marks = (frequency * (i % 4 + 1) * 5) as u64;
            TopicRecord {
                topic: format!("Topic {i}"),
                frequency,
                modules: BTreeSet::from([format!("CS{}", 200 + i % 3)]),
                total_marks,
                average_marks: total_marks as f64 / frequency as f64,
            }
        })
        .collect()
}

fn bench_plan(c: &mut Criterion) {
    let records = make_records(200);
    let studied: Vec<String> = (0..20).map(|i| format!("Topic {i}")).collect();

    c.bench_function("plan_200_topics", |b| {
        b.iter(|| plan(black_box(&records), black_box(&studied), 60.0))
    });
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    let records = make_records(30);

    for trials in [1_000u32, 10_000, 100_000] {
        let config = SimulationConfig {
            trials,
            seed: Some(42),
            ..SimulationConfig::default()
        };
        group.bench_function(format!("{trials}_trials"), |b| {
            b.iter(|| simulate(black_box(&records), &[], 60.0, &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_simulate);
criterion_main!(benches);
