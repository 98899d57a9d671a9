//! Behavioural properties every language normalizer must satisfy.
//!
//! Each property is checked against every language that can express it.

use std::path::Path;

use drift_normalize::{
    normalizer_for, ArgKind, Language, NormalizeScope, NormalizedFile, ParserManager, SyntaxNode,
    UnifiedCallChain,
};
use drift_normalize_core::NormalizerConfig;

fn normalize(file: &str, source: &str) -> NormalizedFile {
    let (lang, tree) = ParserManager::new().parse(source, Path::new(file)).unwrap();
    let root = SyntaxNode::new(tree.root_node(), source);
    normalizer_for(lang).normalize(root, file, &NormalizerConfig::default())
}

fn number(value: f64) -> ArgKind {
    ArgKind::Number { value }
}

fn names(chain: &UnifiedCallChain) -> Vec<&str> {
    chain.segments.iter().map(|s| s.name.as_str()).collect()
}

// ---- Segment ordering ----

#[test]
fn segments_are_ordered_left_to_right() {
    let cases = [
        ("a.ts", "a.b(1).c(2).d();"),
        ("a.js", "a.b(1).c(2).d();"),
        ("a.py", "a.b(1).c(2).d()\n"),
        ("a.rs", "fn f() { a.b(1).c(2).d(); }"),
    ];
    for (file, source) in cases {
        let ir = normalize(file, source);
        assert_eq!(ir.call_chains.len(), 1, "{file}");
        let chain = &ir.call_chains[0];
        assert_eq!(chain.receiver, "a", "{file}");
        assert_eq!(names(chain), vec!["b", "c", "d"], "{file}");
        assert!(chain.segments.iter().all(|s| s.is_call), "{file}");
        assert_eq!(chain.segments[0].args.len(), 1);
        assert_eq!(chain.segments[0].args[0].kind, number(1.0), "{file}");
        assert_eq!(chain.segments[1].args[0].kind, number(2.0), "{file}");
        assert!(chain.segments[2].args.is_empty(), "{file}");
    }
}

#[test]
fn property_access_segments_are_not_calls() {
    let ir = normalize("a.ts", "this.repo.users.find(id);");
    let chain = &ir.call_chains[0];
    assert_eq!(chain.receiver, "this");
    assert_eq!(names(chain), vec!["repo", "users", "find"]);
    let calls: Vec<bool> = chain.segments.iter().map(|s| s.is_call).collect();
    assert_eq!(calls, vec![false, false, true]);
    assert!(chain.segments[0].args.is_empty());
}

// ---- No duplicate emission ----

#[test]
fn one_chain_per_top_level_expression() {
    let cases = [
        ("a.ts", "a.b().c();"),
        ("a.py", "a.b().c()\n"),
        ("a.rs", "fn f() { a.b().c(); }"),
    ];
    for (file, source) in cases {
        let ir = normalize(file, source);
        assert_eq!(ir.call_chains.len(), 1, "{file} emitted {:?}", ir.call_chains);
        assert_eq!(ir.call_chains[0].raw, "a.b().c()");
    }
}

#[test]
fn calls_in_argument_position_are_not_reemitted() {
    let ir = normalize("a.ts", "a.b(c.d(), e()).f();\ng();");
    let signatures: Vec<String> = ir.call_chains.iter().map(|c| c.signature()).collect();
    assert_eq!(signatures, vec!["b.f", "g"]);
    let args = &ir.call_chains[0].segments[0].args;
    assert_eq!(args.len(), 2);
    assert!(args.iter().all(|a| a.is_unknown()));
    assert_eq!(args[0].text, "c.d()");
}

#[test]
fn field_only_expressions_are_not_chains() {
    let ir = normalize("a.ts", "const x = a.b.c;");
    assert!(ir.call_chains.is_empty());
}

// ---- Argument fidelity ----

#[test]
fn literal_arguments_keep_their_shape() {
    let cases = [
        ("a.ts", "f(1, \"x\", true, [1,2], {k: 1});"),
        ("a.js", "f(1, 'x', true, [1,2], {k: 1});"),
        ("a.py", "f(1, \"x\", True, [1,2], {\"k\": 1})\n"),
    ];
    for (file, source) in cases {
        let ir = normalize(file, source);
        let args = &ir.call_chains[0].segments[0].args;
        assert_eq!(args.len(), 5, "{file}");
        let kinds: Vec<&str> = args.iter().map(|a| a.kind_name()).collect();
        assert_eq!(kinds, vec!["number", "string", "boolean", "array", "object"], "{file}");

        assert_eq!(args[1].kind, ArgKind::String { value: "x".into() }, "{file}");
        match &args[3].kind {
            ArgKind::Array { elements } => assert_eq!(elements.len(), 2, "{file}"),
            other => panic!("{file}: expected array, got {other:?}"),
        }
        match &args[4].kind {
            ArgKind::Object { properties } => {
                assert_eq!(properties.len(), 1, "{file}");
                assert_eq!(properties["k"].kind, number(1.0), "{file}");
            }
            other => panic!("{file}: expected object, got {other:?}"),
        }
        assert!(ir.fallbacks.is_clean(), "{file}: {:?}", ir.fallbacks);
    }
}

#[test]
fn argument_positions_follow_source() {
    let ir = normalize("a.ts", "f(\n  1,\n  x\n);");
    let args = &ir.call_chains[0].segments[0].args;
    assert_eq!(args[0].position.line, 2);
    assert_eq!(args[0].position.column, 2);
    assert_eq!(args[1].position.line, 3);
    assert_eq!(args[1].kind, ArgKind::Identifier { name: "x".into() });
}

// ---- Unknown fallback ----

#[test]
fn unrecognised_node_becomes_unknown_with_its_text() {
    // A Python lambda means nothing to the TypeScript grammar.
    let source = "lambda q: q + 1\n";
    let tree = ParserManager::new().parse_source(source, Language::Python, None).unwrap();
    let root = SyntaxNode::new(tree.root_node(), source);
    let lambda = root
        .first_named_child()
        .and_then(|stmt| stmt.first_named_child())
        .unwrap();
    assert_eq!(lambda.kind(), "lambda");

    let config = NormalizerConfig::default();
    let mut scope = NormalizeScope::new("x.py", &config);
    let arg = normalizer_for(Language::TypeScript).normalize_argument(lambda, &mut scope);
    assert!(arg.is_unknown());
    assert_eq!(arg.text, "lambda q: q + 1");
    assert_eq!(scope.stats.unknown_args, 1);
}

#[test]
fn closures_and_spreads_are_unknown_not_dropped() {
    let ir = normalize("a.ts", "f(() => 1, ...rest, `a${b}`);");
    let args = &ir.call_chains[0].segments[0].args;
    assert_eq!(args.len(), 3);
    assert!(args.iter().all(|a| a.is_unknown()));
    assert_eq!(args[1].text, "...rest");
    assert_eq!(ir.fallbacks.unknown_args, 3);
}

// ---- Await placement ----

#[test]
fn await_follows_the_call_it_wraps() {
    let cases = [
        ("a.ts", "async function g() { await foo.bar(); }"),
        ("a.py", "async def g():\n    await foo.bar()\n"),
        ("a.rs", "async fn g() { foo.bar().await; }"),
    ];
    for (file, source) in cases {
        let ir = normalize(file, source);
        assert_eq!(ir.call_chains.len(), 1, "{file}");
        let chain = &ir.call_chains[0];
        assert_eq!(chain.receiver, "foo", "{file}");
        assert_eq!(names(chain), vec!["bar", "await"], "{file}");
        let await_segment = &chain.segments[1];
        assert!(!await_segment.is_call, "{file}");
        assert!(await_segment.args.is_empty(), "{file}");
    }
}

// ---- Method export/static detection ----

#[test]
fn receiver_decides_static() {
    let rust = normalize(
        "a.rs",
        "pub struct S;\nimpl S {\n    pub fn get(&self) -> u32 { 1 }\n    pub fn make() -> S { S }\n}\n",
    );
    let ts = normalize(
        "a.ts",
        "export class S {\n  get(): number { return 1; }\n  static make(): S { return new S(); }\n}\n",
    );
    let py = normalize(
        "a.py",
        "class S:\n    def get(self):\n        return 1\n\n    @staticmethod\n    def make():\n        return S()\n",
    );

    for (label, ir) in [("rust", &rust), ("typescript", &ts), ("python", &py)] {
        let get = ir.functions.iter().find(|f| f.name == "get").unwrap();
        let make = ir.functions.iter().find(|f| f.name == "make").unwrap();
        for f in [get, make] {
            assert!(f.is_method, "{label}: {} should be a method", f.name);
            assert!(f.is_exported, "{label}: {} should be exported", f.name);
            assert_eq!(f.class_name.as_deref(), Some("S"), "{label}");
        }
        assert!(!get.is_static, "{label}");
        assert!(make.is_static, "{label}");
    }
}

// ---- Idempotence ----

#[test]
fn normalizing_twice_is_deep_equal() {
    let cases = [
        (
            "a.ts",
            "import { a } from './a';\nexport class C { async m(x: number = 1) { await a.b(x, {y}).c; } }\n",
        ),
        (
            "a.py",
            "from .m import a\n\nclass C(Base):\n    async def m(self, x=1):\n        await a.b(x, y=2)\n",
        ),
        (
            "a.rs",
            "use crate::a::{b, c as d};\npub struct C;\nimpl C { pub async fn m(&self) -> Result<(), E> { b::run(1).await?; Ok(()) } }\n",
        ),
    ];
    for (file, source) in cases {
        let first = normalize(file, source);
        let second = normalize(file, source);
        assert_eq!(first, second, "{file}");
        assert!(!first.call_chains.is_empty(), "{file}");
    }
}

#[test]
fn empty_input_yields_empty_collections() {
    for file in ["a.ts", "a.js", "a.py", "a.rs"] {
        let ir = normalize(file, "");
        assert_eq!(ir, NormalizedFile::default(), "{file}");
    }
}
