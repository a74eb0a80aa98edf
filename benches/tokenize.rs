//! Tokenizer Throughput Benchmarks
//!
//! Measures end-to-end tokenization over a representative query mix and
//! the keyword lookup paths in isolation.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench --bench tokenize
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use turlex::{find_keyword, find_keyword_simd, Dispatcher, Tokenizer};

const QUERY_MIX: &[&str] = &[
    "SELECT id, name, email FROM users WHERE active = true AND age >= 21 ORDER BY name;",
    "INSERT INTO events (kind, payload, at) VALUES ('click', '{\"x\": 10}', 1700000000);",
    "WITH RECURSIVE ancestors AS (SELECT * FROM nodes WHERE id = 1 UNION ALL \
     SELECT n.* FROM nodes n JOIN ancestors a ON n.parent_id = a.id) \
     SELECT count(*) FROM ancestors;",
    "UPDATE accounts SET balance = balance - 12.50 WHERE owner_id = 42; -- debit\n",
    "CREATE TABLE measurements (id BIGINT PRIMARY KEY, taken TIMESTAMP, \
     value DOUBLE PRECISION DEFAULT 0.0, note VARCHAR);",
    "/* nightly rollup */ DELETE FROM samples WHERE taken < '2024-01-01' AND kind <> 'keep';",
];

fn build_corpus(repeat: usize) -> String {
    let mut corpus = String::new();
    for _ in 0..repeat {
        for query in QUERY_MIX {
            corpus.push_str(query);
            corpus.push('\n');
        }
    }
    corpus
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for repeat in [1usize, 16, 256] {
        let corpus = build_corpus(repeat);
        group.throughput(Throughput::Bytes(corpus.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.len()),
            corpus.as_bytes(),
            |b, input| {
                b.iter(|| {
                    let mut tokenizer = Tokenizer::new(black_box(input));
                    black_box(tokenizer.tokenize())
                });
            },
        );
    }

    group.finish();
}

fn bench_whitespace_heavy(c: &mut Criterion) {
    // Deeply indented SQL exercises the SIMD skip kernels.
    let mut corpus = String::new();
    for _ in 0..512 {
        corpus.push_str("                SELECT 1;\n");
    }

    let mut group = c.benchmark_group("whitespace_heavy");
    group.throughput(Throughput::Bytes(corpus.len() as u64));
    group.bench_function("indented", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::new(black_box(corpus.as_bytes()));
            black_box(tokenizer.tokenize())
        });
    });
    group.finish();
}

fn bench_keyword_lookup(c: &mut Criterion) {
    let lexemes: &[&[u8]] = &[
        b"SELECT",
        b"from",
        b"users",
        b"AUTHORIZATION",
        b"balance",
        b"on",
        b"x",
        b"serializable",
    ];

    let mut group = c.benchmark_group("keyword_lookup");

    group.bench_function("binary_search", |b| {
        b.iter(|| {
            for lexeme in lexemes {
                black_box(find_keyword(black_box(lexeme)));
            }
        });
    });

    let dispatcher = Dispatcher::new();
    group.bench_function("bucket_simd", |b| {
        b.iter(|| {
            for lexeme in lexemes {
                black_box(find_keyword_simd(&dispatcher, black_box(lexeme)));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_whitespace_heavy,
    bench_keyword_lookup
);
criterion_main!(benches);
