//! Property-based tests over generated call chains.
//!
//! For any receiver and any sequence of method calls and field accesses,
//! every language must report the segments in written order with their
//! arguments intact, and normalizing twice must give identical IR.

use std::path::Path;

use drift_normalize::{normalizer_for, ArgKind, NormalizedFile, ParserManager, SyntaxNode};
use drift_normalize_core::NormalizerConfig;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Step {
    name: String,
    /// `None` is a field access.
    args: Option<Vec<u32>>,
}

fn ident() -> impl Strategy<Value = String> {
    // Prefixed so generated names never collide with keywords.
    "[a-z][a-z0-9]{0,6}".prop_map(|s| format!("v_{s}"))
}

fn step() -> impl Strategy<Value = Step> {
    (ident(), prop::option::weighted(0.75, prop::collection::vec(0u32..10_000, 0..4)))
        .prop_map(|(name, args)| Step { name, args })
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step(), 1..8)
        // A chain needs at least one call to be emitted.
        .prop_filter("at least one call", |s| s.iter().any(|st| st.args.is_some()))
}

fn render(receiver: &str, steps: &[Step]) -> String {
    let mut out = receiver.to_string();
    for step in steps {
        out.push('.');
        out.push_str(&step.name);
        if let Some(args) = &step.args {
            let rendered: Vec<String> = args.iter().map(u32::to_string).collect();
            out.push('(');
            out.push_str(&rendered.join(", "));
            out.push(')');
        }
    }
    out
}

fn wrap(file: &str, expr: &str) -> String {
    match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("rs") => format!("fn f() {{ {expr}; }}\n"),
        Some("py") => format!("{expr}\n"),
        _ => format!("{expr};\n"),
    }
}

fn normalize(file: &str, source: &str) -> NormalizedFile {
    let (lang, tree) = ParserManager::new().parse(source, Path::new(file)).unwrap();
    let root = SyntaxNode::new(tree.root_node(), source);
    normalizer_for(lang).normalize(root, file, &NormalizerConfig::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn segments_follow_written_order(receiver in ident(), steps in steps()) {
        let expr = render(&receiver, &steps);
        for file in ["a.ts", "a.py", "a.rs"] {
            let source = wrap(file, &expr);
            let ir = normalize(file, &source);
            prop_assert_eq!(ir.call_chains.len(), 1, "{} in {}", expr, file);

            let chain = &ir.call_chains[0];
            prop_assert_eq!(&chain.receiver, &receiver);
            prop_assert_eq!(&chain.raw, &expr);
            prop_assert_eq!(chain.segments.len(), steps.len());

            for (segment, step) in chain.segments.iter().zip(&steps) {
                prop_assert_eq!(&segment.name, &step.name);
                prop_assert_eq!(segment.is_call, step.args.is_some());
                let expected = step.args.clone().unwrap_or_default();
                let actual: Vec<ArgKind> = segment.args.iter().map(|a| a.kind.clone()).collect();
                let expected: Vec<ArgKind> = expected
                    .into_iter()
                    .map(|v| ArgKind::Number { value: f64::from(v) })
                    .collect();
                prop_assert_eq!(actual, expected);
            }
            prop_assert!(ir.fallbacks.is_clean());
        }
    }

    #[test]
    fn normalization_is_idempotent(receiver in ident(), chains in prop::collection::vec(steps(), 1..4)) {
        let exprs: Vec<String> = chains.iter().map(|s| render(&receiver, s)).collect();
        for file in ["a.ts", "a.js", "a.py", "a.rs"] {
            let body: String = exprs.iter().map(|e| wrap(file, e)).collect();
            let first = normalize(file, &body);
            let second = normalize(file, &body);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.call_chains.len(), exprs.len());
        }
    }

    #[test]
    fn arbitrary_text_never_panics(source in "\\PC{0,200}") {
        for file in ["a.ts", "a.py", "a.rs"] {
            let ir = normalize(file, &source);
            for chain in &ir.call_chains {
                prop_assert!(!chain.segments.is_empty());
            }
        }
    }
}
