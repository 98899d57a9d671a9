//! Depth guards: an over-deep chain, argument or subtree is dropped on its
//! own, its siblings are still extracted, and nothing overflows a default
//! 2 MiB thread stack.

use std::path::{Path, PathBuf};
use std::thread;

use drift_normalize::{normalizer_for, ArgKind, NormalizedFile, ParserManager, SyntaxNode, UnifiedProvider};
use drift_normalize_core::{DriftConfig, NormalizerConfig};

/// Stack size of spawned test threads and rayon workers.
const DEFAULT_STACK: usize = 2 * 1024 * 1024;

fn normalize_with(file: &str, source: &str, config: &NormalizerConfig) -> NormalizedFile {
    let (lang, tree) = ParserManager::new().parse(source, Path::new(file)).unwrap();
    let root = SyntaxNode::new(tree.root_node(), source);
    normalizer_for(lang).normalize(root, file, config)
}

fn normalize(file: &str, source: &str) -> NormalizedFile {
    normalize_with(file, source, &NormalizerConfig::default())
}

fn on_default_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    thread::Builder::new()
        .stack_size(DEFAULT_STACK)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

fn signatures(ir: &NormalizedFile) -> Vec<String> {
    ir.call_chains.iter().map(|c| c.signature()).collect()
}

fn long_chain(links: usize) -> String {
    format!("a{}", ".m()".repeat(links))
}

// ---- max_chain_depth ----

#[test]
fn over_deep_chain_is_dropped_and_siblings_survive() {
    let config = NormalizerConfig {
        max_chain_depth: 8,
        ..Default::default()
    };
    let chain = long_chain(20);
    let cases = [
        ("a.ts", format!("{chain};\nsibling.ok();\n")),
        ("a.py", format!("{chain}\nsibling.ok()\n")),
        ("a.rs", format!("fn f() {{ {chain}; sibling.ok(); }}\n")),
    ];
    for (file, source) in cases {
        let ir = normalize_with(file, &source, &config);
        assert_eq!(signatures(&ir), vec!["ok"], "{file}");
        assert_eq!(ir.fallbacks.depth_limited_chains, 1, "{file}");
    }
}

#[test]
fn chains_within_the_limit_are_kept() {
    let config = NormalizerConfig {
        max_chain_depth: 8,
        ..Default::default()
    };
    let ir = normalize_with("a.ts", &format!("{};\n", long_chain(7)), &config);
    assert_eq!(ir.call_chains.len(), 1);
    assert_eq!(ir.call_chains[0].segments.len(), 7);
    assert!(ir.fallbacks.is_clean());
}

// ---- max_arg_depth ----

#[test]
fn over_deep_argument_degrades_and_siblings_survive() {
    let config = NormalizerConfig {
        max_arg_depth: 2,
        ..Default::default()
    };
    let cases = [
        ("a.ts", "f([[[[1]]]]);\ng(1);\n"),
        ("a.py", "f([[[[1]]]])\ng(1)\n"),
        ("a.rs", "fn h() { f([[[[1]]]]); g(1); }\n"),
    ];
    for (file, source) in cases {
        let ir = normalize_with(file, source, &config);
        assert_eq!(signatures(&ir), vec!["f", "g"], "{file}");
        assert_eq!(ir.fallbacks.depth_limited_args, 1, "{file}");

        // Three levels survive, the fourth keeps only its text.
        let mut arg = &ir.call_chains[0].segments[0].args[0];
        for _ in 0..3 {
            let ArgKind::Array { elements } = &arg.kind else {
                panic!("{file}: expected array, got {:?}", arg.kind);
            };
            arg = &elements[0];
        }
        assert_eq!(arg.kind, ArgKind::Unknown { label: None }, "{file}");
        assert_eq!(arg.text, "[1]", "{file}");

        let sibling = &ir.call_chains[1].segments[0].args[0];
        assert_eq!(sibling.kind, ArgKind::Number { value: 1.0 }, "{file}");
    }
}

// ---- max_tree_depth / max_scope_depth on a default-sized stack ----

#[test]
fn deeply_parenthesized_expression_truncates_quietly() {
    let ir = on_default_stack(|| {
        let n = 2_000;
        let source = format!("{}x.y(){};\nz.w();\n", "(".repeat(n), ")".repeat(n));
        normalize("a.ts", &source)
    });
    assert_eq!(signatures(&ir), vec!["w"]);
    assert!(ir.fallbacks.truncated_subtrees >= 1);
}

#[test]
fn very_long_chain_is_dropped_on_a_default_stack() {
    let ir = on_default_stack(|| {
        let chain = format!("a.first(inner.call()){}", ".m()".repeat(3_000));
        normalize("a.ts", &format!("{chain};\nsibling.ok();\n"))
    });
    assert_eq!(signatures(&ir), vec!["ok"]);
    assert_eq!(ir.fallbacks.depth_limited_chains, 1);

    let ir = on_default_stack(|| {
        normalize("a.rs", &format!("fn f() {{ {}; sibling.ok(); }}\n", long_chain(3_000)))
    });
    assert_eq!(signatures(&ir), vec!["ok"]);
    assert_eq!(ir.fallbacks.depth_limited_chains, 1);
}

#[test]
fn nested_callbacks_stay_one_chain() {
    let ir = on_default_stack(|| {
        let n = 600;
        let source = format!("{}x.y(){};\nsibling.ok();\n", "f(() => ".repeat(n), ")".repeat(n));
        normalize("a.ts", &source)
    });
    assert_eq!(signatures(&ir), vec!["f", "ok"]);
    assert_eq!(ir.fallbacks.unknown_args, 1);
}

#[test]
fn nested_scopes_stop_at_the_scope_limit() {
    let ir = on_default_stack(|| {
        let mut source = String::new();
        for i in 0..200 {
            source.push_str(&format!("{}def f{i}():\n", " ".repeat(i)));
        }
        source.push_str(&format!("{}pass\n", " ".repeat(200)));
        source.push_str("sibling.ok()\n");
        normalize("a.py", &source)
    });
    let max = NormalizerConfig::default().max_scope_depth;
    assert_eq!(ir.functions.len(), max + 1);
    assert_eq!(ir.functions[0].qualified_name, "f0");
    assert_eq!(ir.functions[max].name, format!("f{max}"));
    assert!(ir.fallbacks.truncated_subtrees >= 1);
    assert!(signatures(&ir).contains(&"ok".to_string()));

    let ir = on_default_stack(|| {
        let n = 300;
        let source = format!("{}fn leaf() {{}}{}\npub fn top() {{}}\n", "mod m { ".repeat(n), " }".repeat(n));
        normalize("a.rs", &source)
    });
    let names: Vec<&str> = ir.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["top"]);
    assert!(ir.fallbacks.truncated_subtrees >= 1);
}

#[test]
fn provider_survives_deep_files_on_worker_threads() {
    let provider = UnifiedProvider::new(DriftConfig::default()).unwrap();
    let n = 2_000;
    let sources: Vec<(PathBuf, String)> = vec![
        (
            PathBuf::from("deep.ts"),
            format!("{}x.y(){};\nz.w();\n", "(".repeat(n), ")".repeat(n)),
        ),
        (PathBuf::from("long.ts"), format!("{};\nsibling.ok();\n", long_chain(3_000))),
        (PathBuf::from("plain.py"), "a.b()\n".to_string()),
    ];
    let ir = provider.normalize_files(&sources);
    assert_eq!(ir.stats.files_normalized, 3);
    assert_eq!(ir.stats.files_failed, 0);
    assert!(ir.stats.fallbacks.truncated_subtrees >= 1);
    assert_eq!(ir.stats.fallbacks.depth_limited_chains, 1);
}
