//! Benchmarks for restriction matching and fixing
//!
//! Measures evaluation and the multi-pass fix loop on generated files with
//! hundreds of imports.

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use restrict_imports::analysis::{ImportExtractor, SourceLanguage};
use restrict_imports::config::parse_str;
use restrict_imports::lint::Linter;
use restrict_imports::restriction::RestrictionTable;
use restrict_imports::rule::evaluate;

const CONFIG: &str = r#"{
    "paths": [
        "lodash",
        { "target": "react-.*", "replacement": { "^react-": "preact-" } },
        { "target": "legacy-ui", "namedImports": ["Button", "Modal"], "replacement": "@acme/ui" },
        { "target": "utils/(a|b)", "namedImports": ["helper"], "replacement": "utils/shared" }
    ]
}"#;

fn table() -> RestrictionTable {
    let entries = parse_str(CONFIG).expect("valid config");
    RestrictionTable::build(&entries).expect("valid table")
}

/// Create a source file with `count` imports, a quarter of them restricted
fn create_source(count: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        let line = match i % 8 {
            0 => format!("import {{ Button, Input{} }} from 'legacy-ui';\n", i),
            1 => format!("import widget{} from 'react-widget-{}';\n", i, i),
            2 => format!("import {{ helper as h{} }} from 'utils/a';\n", i),
            3 => format!("import {{ value{} }} from './local/module-{}';\n", i, i),
            _ => format!("import dep{} from 'package-{}';\n", i, i),
        };
        source.push_str(&line);
    }
    source.push_str("\nexport default function main() {}\n");
    source
}

/// Benchmark extraction plus evaluation of every statement
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let table = table();
    let mut extractor = ImportExtractor::new().expect("extractor");

    for size in [50, 200, 1000] {
        let source = create_source(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                let statements = extractor
                    .extract_source(source, SourceLanguage::JavaScript, Path::new("bench.js"))
                    .expect("parse");
                let count: usize = statements
                    .iter()
                    .map(|s| evaluate(s, &table).len())
                    .sum();
                black_box(count)
            });
        });
    }

    group.finish();
}

/// Benchmark the full fix loop
fn bench_fix(c: &mut Criterion) {
    let mut group = c.benchmark_group("fix_source");
    let mut linter = Linter::new(table()).expect("linter");

    for size in [50, 200] {
        let source = create_source(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                let outcome = linter
                    .fix_source(
                        black_box(source),
                        SourceLanguage::JavaScript,
                        Path::new("bench.js"),
                    )
                    .expect("fix");
                black_box(outcome.applied)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_fix);
criterion_main!(benches);
