use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use paraglob::{Paraglob, ParaglobConfig, QueryContext};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const PATTERN_WORDS: &[&str] = &[
    "aaaaaa",
    "bb",
    "cccccccccccccccc",
    "ddddd",
    "eeeeeeeee",
    "fffffffffffff",
    "gggg",
];

fn random_word(rng: &mut StdRng) -> String {
    let len = rng.gen_range(5..30);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

fn pattern_word(rng: &mut StdRng) -> &'static str {
    PATTERN_WORDS.choose(rng).copied().unwrap_or("bb")
}

/// Patterns are 2-11 words joined by `*`, one word in ten from the shared
/// pattern vocabulary
fn make_patterns(rng: &mut StdRng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let words = rng.gen_range(2..12);
            (0..words)
                .map(|_| {
                    if rng.gen_ratio(1, 10) {
                        pattern_word(rng).to_string()
                    } else {
                        random_word(rng)
                    }
                })
                .collect::<Vec<_>>()
                .join("*")
        })
        .collect()
}

/// `match_percent` of queries are built from pattern words, the rest are
/// random letters
fn make_queries(rng: &mut StdRng, count: usize, match_percent: u32) -> Vec<String> {
    (0..count)
        .map(|_| {
            if rng.gen_range(0..100) < match_percent {
                let words = rng.gen_range(1..6);
                (0..words).map(|_| pattern_word(rng)).collect()
            } else {
                let len = rng.gen_range(5..55);
                (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
            }
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for &count in &[1_000usize, 10_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let patterns = make_patterns(&mut rng, count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &patterns, |b, patterns| {
            b.iter(|| {
                black_box(Paraglob::build_from_patterns(patterns, ParaglobConfig::new()).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let patterns = make_patterns(&mut rng, 10_000);
    let pg = Paraglob::build_from_patterns(&patterns, ParaglobConfig::new()).unwrap();

    let mut group = c.benchmark_group("query");
    for &match_percent in &[0u32, 10, 50] {
        let queries = make_queries(&mut rng, 1_000, match_percent);
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("fresh_context", match_percent),
            &queries,
            |b, queries| {
                b.iter(|| {
                    for q in queries {
                        black_box(pg.count(q).unwrap());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("pooled_context", match_percent),
            &queries,
            |b, queries| {
                let mut ctx = QueryContext::new();
                b.iter(|| {
                    for q in queries {
                        black_box(pg.find_in(&mut ctx, q, |_, _| {}).unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
