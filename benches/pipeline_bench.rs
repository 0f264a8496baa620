//! Criterion benchmarks for the in-memory stages.
//!
//! Rows are generated, so no files are read; rendering is not measured.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use txt_insights::aggregate::{aggregate, daily_sentiment};
use txt_insights::extract::extract;
use txt_insights::lexical::summarize;
use txt_insights::models::{Direction, RawMessage};
use txt_insights::NlpToolkit;

const LINES: &[&str] = &[
    "are we still on for dinner tonight?",
    "yes! really looking forward to it 😀",
    "the movie was terrible, not going back there",
    "haha that's so funny 😂😂",
    "can't make it, sorry. very tired today",
    "ok see you at 8",
];

fn rows(count: usize) -> Vec<RawMessage> {
    (0..count)
        .map(|i| RawMessage {
            chat_session: "Alex".to_string(),
            direction: if i % 2 == 0 {
                Direction::Outgoing
            } else {
                Direction::Incoming
            },
            text: Some(LINES[i % LINES.len()].to_string()),
            timestamp: format!("2024-{:02}-{:02} 12:00:00", i % 12 + 1, i % 28 + 1),
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let toolkit = NlpToolkit::standard().unwrap();
    let mut group = c.benchmark_group("extract");
    for size in [100, 1_000, 10_000] {
        let input = rows(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| extract(black_box(input), &toolkit).unwrap());
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let toolkit = NlpToolkit::standard().unwrap();
    let extraction = extract(&rows(10_000), &toolkit).unwrap();
    let mut group = c.benchmark_group("aggregate");
    group.bench_function("sender_aggregates", |b| {
        b.iter(|| aggregate(&extraction.contact, black_box(&extraction.messages)));
    });
    group.bench_function("daily_sentiment", |b| {
        b.iter(|| daily_sentiment(black_box(&extraction.messages)));
    });
    group.bench_function("word_frequencies", |b| {
        b.iter(|| summarize(black_box(&extraction.messages), toolkit.tokenizer.as_ref()));
    });
    group.finish();
}

criterion_group!(benches, bench_extract, bench_aggregate);
criterion_main!(benches);
