// Lexer and parser throughput benchmarks for tyconform
//
// Declaration catalogs can run to thousands of lines, so lexing and parsing
// both need to stay well ahead of checking.

use criterion::{black_box, criterion_group, criterion_main, Bencher, BenchmarkId, Criterion};
use tyconform_syntax::{parse_declarations, parse_fixture, Lexer};

const CATALOG: &str = r#"
declare class Worker {
    id: number;
    process: ChildProcess;
    send(message: string, callback?: (error: Error | null) => void): boolean;
    send(message: string, sendHandle: Socket, options?: MessageOptions, callback?: (error: Error | null) => void): boolean;
    isDead(): boolean;
    disconnect(): this;
}
interface ClusterSettings {
    args?: string[];
    serialization?: "json" | "advanced";
    cwd?: string;
    windowsHide?: boolean;
}
"#;

const FIXTURE: &str = r#"
cluster.fork();
Object.keys(cluster.workers!).forEach(key => {
    const worker = cluster.workers![key];
    if (worker && worker.isDead()) {
        console.log("worker %d is dead", worker.process.pid);
    }
    worker!.send("test", () => {});
});
// $ExpectType Worker
worker.disconnect();
"#;

/// Lexes a single call expression.
fn bench_call_expression(c: &mut Criterion) {
    let source = r#"worker!.send("", connect({ port: 1 }), { keepOpen: true }, () => {});"#;

    c.bench_function("call_expression", |b: &mut Bencher| {
        b.iter(|| Lexer::new(black_box(source)).lex().unwrap())
    });
}

/// Lexes a class declaration with overloads.
fn bench_catalog(c: &mut Criterion) {
    c.bench_function("catalog", |b: &mut Bencher| {
        b.iter(|| Lexer::new(black_box(CATALOG)).lex().unwrap())
    });
}

/// Lexes a fixture containing directives.
fn bench_fixture_with_directives(c: &mut Criterion) {
    c.bench_function("fixture_with_directives", |b: &mut Bencher| {
        b.iter(|| Lexer::new(black_box(FIXTURE)).lex().unwrap())
    });
}

/// Lexing throughput as the catalog grows.
fn bench_input_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("input_size");

    for copies in [1, 10, 100, 500] {
        let source = CATALOG.repeat(copies);
        let line_count = source.lines().count();

        group.bench_with_input(BenchmarkId::from_parameter(line_count), &source, |b: &mut Bencher, source| {
            b.iter(|| Lexer::new(black_box(source)).lex().unwrap())
        });
    }

    group.finish();
}

/// Full lex and parse of both grammars.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("declarations", |b: &mut Bencher| {
        b.iter(|| parse_declarations(black_box(CATALOG)).unwrap())
    });

    group.bench_function("fixture", |b: &mut Bencher| {
        b.iter(|| parse_fixture(black_box(FIXTURE)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_call_expression,
    bench_catalog,
    bench_fixture_with_directives,
    bench_input_size,
    bench_parse
);
criterion_main!(benches);
