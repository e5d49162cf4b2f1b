//! Build and search throughput benchmarks for the pattern automaton.
//!
//! Measures automaton construction and single-pass search with growing
//! pattern sets, from small word lists to the thousands-of-patterns range the
//! arena layout is designed for.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lexguard::{ContentFilter, FilterConfig, Normalizer, Pattern, PatternAutomaton};

fn synthetic_patterns(count: usize) -> Vec<Pattern> {
    (0..count)
        .map(|i| {
            let word = format!("badword{i:04}");
            Pattern::new(word, (i % 4 + 1) as u8, "profanity", "en")
        })
        .collect()
}

fn sample_text() -> String {
    let mut text = String::new();
    for i in 0..200 {
        text.push_str("perfectly ordinary sentence fragment number ");
        text.push_str(&i.to_string());
        text.push(' ');
        if i % 17 == 0 {
            text.push_str("badword0042 ");
        }
    }
    text
}

fn bench_automaton_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("automaton_build");
    for count in [10, 100, 1_000, 5_000] {
        let patterns = synthetic_patterns(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &patterns, |b, patterns| {
            b.iter(|| {
                let mut automaton = PatternAutomaton::new();
                for pattern in patterns {
                    automaton.insert(pattern.clone(), &pattern.word);
                }
                automaton.build_failure_links();
                black_box(automaton.node_count())
            });
        });
    }
    group.finish();
}

fn bench_automaton_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("automaton_search");
    let text = sample_text();
    for count in [10, 100, 1_000, 5_000] {
        let mut automaton = PatternAutomaton::new();
        for pattern in synthetic_patterns(count) {
            let word = pattern.word.clone();
            automaton.insert(pattern, &word);
        }
        automaton.build_failure_links();

        group.bench_with_input(BenchmarkId::from_parameter(count), &automaton, |b, automaton| {
            b.iter(|| black_box(automaton.search(&text, false).unwrap()));
        });
    }
    group.finish();
}

fn bench_normalizer(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let evasive = "Ｗhat a d@mn d.a.y, fuuuuck thｉs noiѕe ".repeat(25);

    c.bench_function("normalize_evasive_1k", |b| {
        b.iter(|| black_box(normalizer.normalize(&evasive)));
    });
    c.bench_function("normalize_aggressive_1k", |b| {
        b.iter(|| black_box(normalizer.normalize_aggressive(&evasive)));
    });
}

fn bench_end_to_end_detect(c: &mut Criterion) {
    // Automaton path only; the fuzzy path is per-pattern and benchmarked by
    // its own scaling behavior elsewhere.
    let config = FilterConfig {
        enable_fuzzy_matching: false,
        ..FilterConfig::default()
    };
    let filter = ContentFilter::with_patterns(config, synthetic_patterns(1_000)).unwrap();
    let text = sample_text();

    c.bench_function("detect_1k_patterns", |b| {
        b.iter(|| black_box(filter.detect(&text).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_automaton_build,
    bench_automaton_search,
    bench_normalizer,
    bench_end_to_end_detect
);
criterion_main!(benches);
