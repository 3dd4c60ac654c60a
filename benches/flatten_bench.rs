use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::time::Duration;

use jex::tree::{flatten, CollapseState};
use jex::ui::viewport::Viewport;

fn sample_document(num_items: usize) -> Value {
    let items: Vec<Value> = (0..num_items)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("item_{}", i),
                "timestamp": i * 1000,
                "nested": {
                    "level": 1,
                    "value": i * 2,
                    "tags": ["tag1", "tag2", "tag3"]
                }
            })
        })
        .collect();
    Value::Array(items)
}

fn flatten_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    group.measurement_time(Duration::from_secs(10));

    for size in [100, 1_000, 5_000].iter() {
        let doc = sample_document(*size);
        group.bench_with_input(BenchmarkId::new("flatten", size), size, |b, _| {
            b.iter(|| black_box(flatten(&doc)))
        });
    }

    group.finish();
}

fn visibility_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility");
    group.measurement_time(Duration::from_secs(10));

    let doc = sample_document(2_000);
    let lines = flatten(&doc);

    let mut collapsed = CollapseState::new();
    for line in lines.iter().filter(|l| l.collapsible).step_by(3) {
        collapsed.toggle(line);
    }

    group.bench_function("filter_all_expanded", |b| {
        let state = CollapseState::new();
        b.iter(|| {
            black_box(
                lines
                    .iter()
                    .filter(|l| state.is_visible(l))
                    .count(),
            )
        })
    });

    group.bench_function("filter_partially_collapsed", |b| {
        b.iter(|| {
            black_box(
                lines
                    .iter()
                    .filter(|l| collapsed.is_visible(l))
                    .count(),
            )
        })
    });

    group.finish();
}

fn window_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");

    let mut viewport = Viewport::new(40, 1, 5);
    group.bench_function("visible_range", |b| {
        b.iter(|| {
            viewport.scroll_offset = (viewport.scroll_offset + 7) % 100_000;
            black_box(viewport.visible_range(100_000))
        })
    });

    group.finish();
}

criterion_group!(benches, flatten_benchmark, visibility_benchmark, window_benchmark);
criterion_main!(benches);
