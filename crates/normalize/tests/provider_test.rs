//! Unified provider tests over real directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use drift_normalize::{Language, UnifiedProvider};
use drift_normalize_core::{DriftConfig, DriftErrorCode, ParseError};
use tempfile::TempDir;

fn provider(toml: &str) -> UnifiedProvider {
    UnifiedProvider::new(DriftConfig::from_toml(toml).unwrap()).unwrap()
}

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/lib.rs", "pub fn run() { tracing::info!(\"go\"); worker::spawn(1); }\n");
    write(
        root,
        "web/app.ts",
        "import express from 'express';\nexport const app = express();\napp.use(cors()).listen(3000);\n",
    );
    write(root, "web/legacy.js", "module.exports = { start };\nfunction start() { server.start(); }\n");
    write(root, "tools/build.py", "import os\n\ndef main():\n    os.path.join('a', 'b')\n");
    write(root, "README.md", "# docs\n");
    write(root, "node_modules/dep/index.js", "dep();\n");
    write(root, "target/debug/gen.rs", "fn gen() {}\n");
    dir
}

fn relative(root: &Path, file: &str) -> String {
    Path::new(file)
        .strip_prefix(root)
        .unwrap()
        .to_string_lossy()
        .replace('\\', "/")
}

#[test]
fn normalizes_a_mixed_language_tree() {
    let dir = project();
    let root = dir.path();
    let ir = provider("").normalize_directory(root).unwrap();

    let files: Vec<String> = ir.files.iter().map(|f| relative(root, &f.file)).collect();
    assert_eq!(files, vec!["src/lib.rs", "tools/build.py", "web/app.ts", "web/legacy.js"]);

    let languages: Vec<Language> = ir.files.iter().map(|f| f.language).collect();
    assert_eq!(
        languages,
        vec![Language::Rust, Language::Python, Language::TypeScript, Language::JavaScript]
    );

    assert_eq!(ir.stats.files_normalized, 4);
    assert_eq!(ir.stats.files_failed, 0);
    assert!(ir.failures.is_empty());
    assert_eq!(ir.stats.functions, 3);
    assert_eq!(ir.stats.imports, 2);
    assert_eq!(
        ir.stats.call_chains,
        ir.files.iter().map(|f| f.call_chains.len()).sum::<usize>()
    );

    let ts = &ir.files[2];
    let signatures: Vec<String> = ts.call_chains.iter().map(|c| c.signature()).collect();
    assert_eq!(signatures, vec!["express", "use.listen"]);
    assert!(!ts.has_parse_errors);
}

#[test]
fn language_filter_and_extra_ignores() {
    let dir = project();
    let root = dir.path();
    let ir = provider(
        "[provider]\nlanguages = [\"typescript\", \"javascript\"]\nextra_ignore = [\"*.js\"]\n",
    )
    .normalize_directory(root)
    .unwrap();
    let files: Vec<String> = ir.files.iter().map(|f| relative(root, &f.file)).collect();
    assert_eq!(files, vec!["web/app.ts"]);
}

#[test]
fn driftignore_is_honoured() {
    let dir = project();
    let root = dir.path();
    write(root, ".driftignore", "tools/\n");
    let ir = provider("").normalize_directory(root).unwrap();
    assert!(ir.files.iter().all(|f| !f.file.contains("tools")));
    assert_eq!(ir.stats.files_normalized, 3);
}

#[test]
fn oversized_files_are_skipped_by_normalize_file() {
    let dir = tempfile::tempdir().unwrap();
    let big = write(dir.path(), "big.py", &"x = 1\n".repeat(64));
    let provider = provider("[provider]\nmax_file_size = 16\n");

    let err = provider.normalize_file(&big).unwrap_err();
    assert!(matches!(err, ParseError::FileTooLarge { size, limit: 16, .. } if size > 16));
    assert_eq!(err.error_code(), "FILE_TOO_LARGE");
    assert!(err.is_skip());

    let ir = provider.normalize_directory(dir.path()).unwrap();
    assert!(ir.files.is_empty());
}

#[test]
fn missing_files_report_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = provider("")
        .normalize_file(&dir.path().join("gone.ts"))
        .unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(!err.is_skip());
}

#[test]
fn unchanged_files_hit_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "a.ts", "a.b();\n");
    let provider = provider("");

    let first = provider.normalize_file(&path).unwrap();
    let second = provider.normalize_file(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(provider.cache().entry_count() >= 1);

    fs::write(&path, "a.c();\n").unwrap();
    let third = provider.normalize_file(&path).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.call_chains[0].signature(), "c");
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let dir = project();
    let root = dir.path();
    let parallel = provider("[provider]\ncache_capacity = 0\n")
        .normalize_directory(root)
        .unwrap();
    let sequential = provider("[provider]\ncache_capacity = 0\nthreads = 1\n")
        .normalize_directory(root)
        .unwrap();

    assert_eq!(parallel.files.len(), sequential.files.len());
    for (a, b) in parallel.files.iter().zip(&sequential.files) {
        assert_eq!(a.as_ref(), b.as_ref());
    }
    let mut p = parallel.stats;
    let mut s = sequential.stats;
    p.duration_ms = 0;
    s.duration_ms = 0;
    assert_eq!(p, s);
}

#[test]
fn strict_mode_still_returns_results() {
    let provider = provider("[normalizer]\nstrict = true\n");
    let ir = provider
        .normalize_source(Path::new("a.ts"), "f(() => 1, ...xs);")
        .unwrap();
    assert_eq!(ir.fallbacks.unknown_args, 2);
    assert_eq!(ir.call_chains.len(), 1);
}

#[test]
fn file_ir_serializes_as_camel_case_json() {
    let ir = provider("")
        .normalize_source(Path::new("a.py"), "import os\nos.getcwd()\n")
        .unwrap();
    let json = serde_json::to_value(ir.as_ref()).unwrap();
    assert_eq!(json["language"], "python");
    assert_eq!(json["callChains"][0]["segments"][0]["name"], "getcwd");
    assert_eq!(json["callChains"][0]["segments"][0]["isCall"], true);
    assert_eq!(json["imports"][0]["source"], "os");
    assert!(json["hasParseErrors"].is_boolean());
}
