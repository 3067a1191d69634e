use criterion::{black_box, criterion_group, criterion_main, Criterion};
use codescope::parsers::cache::SyntaxCache;
use codescope::parsers::typescript::TypeScriptParser;
use codescope::parsers::{FileSyntax, LanguageParser};
use codescope::{AnalyzerConfig, CacheMode, CodebaseAnalyzer};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A workspace of `modules` util files, each imported and called by a
/// consumer file from a few different scopes.
fn synthetic_workspace(modules: usize) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    std::fs::create_dir_all(root.join("lib")).unwrap();
    std::fs::create_dir_all(root.join("app")).unwrap();

    for i in 0..modules {
        let util = format!(
            r#"
export interface Options{i} {{
    value: number;
    name: string;
}}

export function format{i}(opts: Options{i}): string {{
    return `${{opts.name}}:${{opts.value}}`;
}}

export function parse{i}(raw: string): Options{i} {{
    const [name, value] = raw.split(':');
    return {{ name, value: Number(value) }};
}}
"#
        );
        std::fs::write(root.join(format!("lib/util_{i}.ts")), util).unwrap();

        let next = (i + 1) % modules;
        let consumer = format!(
            r#"
import {{ format{i}, parse{i} }} from '../lib/util_{i}';
import {{ format{next} as fmt }} from '../lib/util_{next}';

export class Component{i} {{
    render(raw: string): string {{
        return format{i}(parse{i}(raw));
    }}
}}

export const handler{i} = (raw: string) => fmt(parse{next}(raw));

format{i}({{ value: {i}, name: "boot" }});
"#
        );
        std::fs::write(root.join(format!("app/component_{i}.ts")), consumer).unwrap();
    }

    (dir, root)
}

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_index");

    let (_small_dir, small_root) = synthetic_workspace(10);
    let small_roots = vec![small_root];
    group.bench_function("small_workspace", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new(AnalyzerConfig::default());
            black_box(analyzer.analyze(black_box(&small_roots)).unwrap())
        });
    });

    let (_large_dir, large_root) = synthetic_workspace(200);
    let large_roots = vec![large_root];
    group.bench_function("large_workspace", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new(AnalyzerConfig::default());
            black_box(analyzer.analyze(black_box(&large_roots)).unwrap())
        });
    });

    let warm = CodebaseAnalyzer::new(AnalyzerConfig::default().with_cache(CacheMode::Memory));
    warm.analyze(&large_roots).unwrap();
    group.bench_function("large_workspace_warm_cache", |b| {
        b.iter(|| black_box(warm.analyze(black_box(&large_roots)).unwrap()));
    });

    group.finish();
}

fn benchmark_syntax_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("syntax_cache");

    let source = "import { f } from './util';\nexport function g() { return f(1); }\n";
    let tree = TypeScriptParser::new()
        .parse_source(Path::new("/bench/main.ts"), source.to_string())
        .unwrap();
    let syntax = FileSyntax::extract(&tree);
    let hash = SyntaxCache::content_hash(source);

    group.bench_function("store_and_get", |b| {
        b.iter(|| {
            let cache = SyntaxCache::in_memory_only();
            let path = Path::new("/bench/main.ts");
            black_box(cache.get(path, hash));
            cache.store(path, hash, black_box(&syntax)).unwrap();
            black_box(cache.get(path, hash))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_analysis, benchmark_syntax_cache);
criterion_main!(benches);
