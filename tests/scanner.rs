use codescope::core::scanner::FileScanner;
use codescope::parsers::SourceLanguage;
use codescope::AnalyzerConfig;
use std::fs;
use std::path::{Path, PathBuf};

fn touch<P: AsRef<Path>>(p: P) {
    fs::write(p, "// test").unwrap();
}

fn names(files: &[codescope::core::FileInfo], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn scanner_filters_by_extension_and_skips_node_modules() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::create_dir_all(root.join("src/node_modules/inner")).unwrap();

    touch(root.join("src/main.ts"));
    touch(root.join("src/nested/util.js"));
    touch(root.join("src/view.tsx")); // not included by default
    touch(root.join("src/readme.md"));
    touch(root.join("node_modules/pkg/index.js"));
    touch(root.join("src/node_modules/inner/index.ts"));

    let scanner = FileScanner::new(&AnalyzerConfig::default());
    let files = scanner.scan_directory(&root).unwrap();

    assert_eq!(names(&files, &root), vec!["src/main.ts", "src/nested/util.js"]);
    assert!(files.iter().all(|f| f.path.is_absolute()));
    assert_eq!(files[0].language, SourceLanguage::TypeScript);
    assert_eq!(files[1].language, SourceLanguage::JavaScript);
}

#[test]
fn scanner_order_is_stable_across_runs() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    for name in ["zeta.ts", "alpha.ts", "mid.js", "b/one.ts", "a/two.ts"] {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        touch(path);
    }

    let scanner = FileScanner::new(&AnalyzerConfig::default());
    let first = scanner.scan_directory(&root).unwrap();
    let second = scanner.scan_directory(&root).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        names(&first, &root),
        vec!["a/two.ts", "alpha.ts", "b/one.ts", "mid.js", "zeta.ts"]
    );
}

#[test]
fn overlapping_roots_are_deduplicated() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("pkg")).unwrap();
    touch(root.join("pkg/a.ts"));
    touch(root.join("b.ts"));

    let scanner = FileScanner::new(&AnalyzerConfig::default());
    let files = scanner
        .scan_roots(&[root.join("pkg"), root.clone()])
        .unwrap();
    assert_eq!(names(&files, &root), vec!["pkg/a.ts", "b.ts"]);
}

#[test]
fn missing_root_yields_no_files() {
    let scanner = FileScanner::new(&AnalyzerConfig::default());
    let files = scanner
        .scan_roots(&[PathBuf::from("/definitely/not/here/codescope")])
        .unwrap();
    assert!(files.is_empty());
}

#[test]
fn configured_extensions_widen_the_scan() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    touch(root.join("view.tsx"));
    touch(root.join("main.ts"));
    touch(root.join("notes.vue"));

    let config = AnalyzerConfig::default().with_extensions(["ts", "tsx", "vue"]);
    let files = FileScanner::new(&config).scan_directory(&root).unwrap();
    assert_eq!(names(&files, &root), vec!["main.ts", "view.tsx"]);
    assert_eq!(files[1].language, SourceLanguage::Tsx);
}
