//! Call-Chain Walker and the file-level chain driver.

use std::collections::VecDeque;

use drift_normalize_core::FxHashSet;

use crate::syntax::SyntaxNode;
use crate::unified::{CallChainSegment, UnifiedCallChain};

use super::args::normalize_arguments;
use super::context::NormalizeScope;
use super::grammar::{ChainStep, Grammar};
use super::helpers::walk_preorder;

/// Walk one chained expression from its outermost node down to the
/// receiver. Returns `None` when nothing chain-like was found or the chain
/// is deeper than `max_chain_depth`.
pub fn extract_call_chain(
    grammar: &dyn Grammar,
    node: SyntaxNode<'_>,
    scope: &mut NormalizeScope<'_>,
) -> Option<UnifiedCallChain> {
    let mut segments: VecDeque<CallChainSegment> = VecDeque::new();
    let mut receiver = String::new();
    let mut current = Some(node);
    let mut steps = 0usize;

    while let Some(cur) = current {
        steps += 1;
        if steps > scope.config.max_chain_depth {
            scope.stats.depth_limited_chains += 1;
            tracing::trace!(
                file = scope.file,
                line = node.line(),
                steps,
                "chain depth limit reached, chain dropped"
            );
            return None;
        }

        current = match grammar.classify_chain(cur) {
            ChainStep::MethodCall {
                name,
                arguments,
                receiver: next,
            } => {
                let args = call_args(grammar, arguments, scope);
                segments.push_front(CallChainSegment::call(name.text(), args, name.start()));
                Some(next)
            }
            ChainStep::FreeCall { name, arguments } => {
                let args = call_args(grammar, arguments, scope);
                segments.push_front(CallChainSegment::call(name.text(), args, name.start()));
                None
            }
            ChainStep::PathCall {
                path,
                name,
                arguments,
            } => {
                let args = call_args(grammar, arguments, scope);
                segments.push_front(CallChainSegment::call(name.text(), args, name.start()));
                receiver = path.map(|p| p.text().to_string()).unwrap_or_default();
                None
            }
            ChainStep::MacroCall { path, name } => {
                segments.push_front(CallChainSegment::call(
                    format!("{}!", name.text()),
                    Vec::new(),
                    name.start(),
                ));
                receiver = path.map(|p| p.text().to_string()).unwrap_or_default();
                None
            }
            ChainStep::Invoke { callee, arguments } => {
                let position = arguments.map(|a| a.start()).unwrap_or_else(|| cur.end());
                let args = call_args(grammar, arguments, scope);
                segments.push_front(CallChainSegment::call("()", args, position));
                Some(callee)
            }
            ChainStep::Field { name, base } => {
                segments.push_front(CallChainSegment::access(name.text(), name.start()));
                Some(base)
            }
            ChainStep::Suspend { marker, operand } => {
                let position = cur
                    .child_of_kind(&[marker])
                    .map(|token| token.start())
                    .unwrap_or_else(|| cur.start());
                segments.push_front(CallChainSegment::access(marker, position));
                Some(operand)
            }
            ChainStep::Transparent { inner } => Some(inner),
            ChainStep::Terminal => {
                receiver = cur.text().to_string();
                None
            }
            ChainStep::Opaque => {
                scope.stats.opaque_receivers += 1;
                receiver = cur.text().to_string();
                None
            }
        };
    }

    if segments.is_empty() {
        return None;
    }

    Some(UnifiedCallChain {
        receiver,
        segments: segments.into(),
        raw: node.text().to_string(),
        file: scope.file.to_string(),
        start: node.start(),
        end: node.end(),
    })
}

fn call_args(
    grammar: &dyn Grammar,
    arguments: Option<SyntaxNode<'_>>,
    scope: &mut NormalizeScope<'_>,
) -> Vec<crate::unified::NormalizedArg> {
    match arguments {
        Some(args) => normalize_arguments(grammar, args, scope),
        None => Vec::new(),
    }
}

/// Every top-level call chain in the tree, in source order.
///
/// A chain is discovered at its outermost link only. Once emitted, every
/// chain node beneath it (including calls inside its arguments) is marked
/// processed so it is never emitted again. Chains made only of field
/// accesses are not emitted.
pub fn extract_call_chains(
    grammar: &dyn Grammar,
    root: SyntaxNode<'_>,
    scope: &mut NormalizeScope<'_>,
) -> Vec<UnifiedCallChain> {
    let mut processed: FxHashSet<usize> = FxHashSet::default();
    let mut chains = Vec::new();
    walk_preorder(root, 0, scope, |node, _, scope| {
        if is_chain_start(grammar, node, &processed) {
            if let Some(chain) = extract_call_chain(grammar, node, scope) {
                if chain.has_call() {
                    mark_processed(grammar, node, &mut processed);
                    chains.push(chain);
                }
            }
        }
        true
    });
    chains
}

fn is_chain_start(grammar: &dyn Grammar, node: SyntaxNode<'_>, processed: &FxHashSet<usize>) -> bool {
    if !grammar.is_chain_root(node.kind()) || processed.contains(&node.id()) {
        return false;
    }
    !node
        .parent()
        .is_some_and(|parent| grammar.is_chain_link(parent.kind()))
}

fn mark_processed(grammar: &dyn Grammar, node: SyntaxNode<'_>, processed: &mut FxHashSet<usize>) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if grammar.is_chain_root(current.kind()) {
            processed.insert(current.id());
        }
        stack.extend(current.named_children());
    }
}
