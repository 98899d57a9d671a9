//! Argument Normalizer: one call argument node to a [`NormalizedArg`].

use std::collections::BTreeMap;

use crate::syntax::SyntaxNode;
use crate::unified::{ArgKind, NormalizedArg, NULL_LABEL};

use super::context::NormalizeScope;
use super::grammar::{ArgShape, Grammar, ObjectEntry};
use super::helpers::parse_number;

/// Normalize one argument. Never fails: shapes the grammar does not know
/// become `Unknown` carrying the node's text.
pub fn normalize_argument(
    grammar: &dyn Grammar,
    node: SyntaxNode<'_>,
    scope: &mut NormalizeScope<'_>,
) -> NormalizedArg {
    normalize_at(grammar, node, scope, 0)
}

/// Normalize every argument of an argument-list node, in source order.
pub fn normalize_arguments(
    grammar: &dyn Grammar,
    args: SyntaxNode<'_>,
    scope: &mut NormalizeScope<'_>,
) -> Vec<NormalizedArg> {
    grammar
        .argument_nodes(args)
        .into_iter()
        .map(|arg| normalize_at(grammar, arg, scope, 0))
        .collect()
}

fn normalize_at(
    grammar: &dyn Grammar,
    node: SyntaxNode<'_>,
    scope: &mut NormalizeScope<'_>,
    depth: usize,
) -> NormalizedArg {
    let position = node.start();
    let text = node.text().to_string();

    if depth > scope.config.max_arg_depth {
        scope.stats.depth_limited_args += 1;
        tracing::trace!(file = scope.file, line = position.line, "argument nesting limit reached");
        return NormalizedArg::unknown(position, text);
    }

    let kind = match grammar.classify_arg(node) {
        ArgShape::Str(value) => ArgKind::String { value },
        ArgShape::Num(literal) => match parse_number(literal) {
            Some(value) => ArgKind::Number { value },
            None => unknown(scope),
        },
        ArgShape::Bool(value) => ArgKind::Boolean { value },
        ArgShape::Null => ArgKind::Unknown {
            label: Some(NULL_LABEL.to_string()),
        },
        ArgShape::Ident(name) => ArgKind::Identifier {
            name: name.to_string(),
        },
        ArgShape::Object(entries) => {
            let mut properties = BTreeMap::new();
            for entry in entries {
                let (key, value) = match entry {
                    ObjectEntry::Pair { key, value } => {
                        (key, normalize_at(grammar, value, scope, depth + 1))
                    }
                    ObjectEntry::Shorthand { name, node } => (
                        name.to_string(),
                        NormalizedArg {
                            kind: ArgKind::Identifier {
                                name: name.to_string(),
                            },
                            position: node.start(),
                            text: node.text().to_string(),
                        },
                    ),
                    ObjectEntry::Opaque { node } => {
                        scope.stats.unknown_args += 1;
                        (
                            node.text().to_string(),
                            NormalizedArg::unknown(node.start(), node.text()),
                        )
                    }
                };
                properties.insert(key, value);
            }
            ArgKind::Object { properties }
        }
        ArgShape::Array(items) => ArgKind::Array {
            elements: items
                .into_iter()
                .map(|item| normalize_at(grammar, item, scope, depth + 1))
                .collect(),
        },
        ArgShape::Keyword { name, value } => {
            let mut properties = BTreeMap::new();
            properties.insert(name.to_string(), normalize_at(grammar, value, scope, depth + 1));
            ArgKind::Object { properties }
        }
        ArgShape::Wrapped(inner) => {
            // The wrapper keeps its own span; only the shape comes from inside.
            let inner = normalize_at(grammar, inner, scope, depth + 1);
            inner.kind
        }
        ArgShape::Opaque => unknown(scope),
    };

    NormalizedArg {
        kind,
        position,
        text,
    }
}

fn unknown(scope: &mut NormalizeScope<'_>) -> ArgKind {
    scope.stats.unknown_args += 1;
    ArgKind::Unknown { label: None }
}
