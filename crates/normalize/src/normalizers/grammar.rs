//! Per-language node-kind strategy.
//!
//! The argument normalizer and the call-chain walker are written once, over
//! the closed [`ChainStep`] and [`ArgShape`] enums. Each language supplies a
//! [`Grammar`] that maps its tree-sitter node kinds onto those enums; any kind
//! it does not recognize lands in the `Opaque` arm and degrades to the
//! documented fallback.

use crate::syntax::SyntaxNode;

/// How the chain walker should treat one node.
#[derive(Debug, Clone, Copy)]
pub enum ChainStep<'t> {
    /// `receiver.name(args)`. The walk continues into `receiver`.
    MethodCall {
        name: SyntaxNode<'t>,
        arguments: Option<SyntaxNode<'t>>,
        receiver: SyntaxNode<'t>,
    },
    /// `name(args)`. Ends the walk with an empty receiver.
    FreeCall {
        name: SyntaxNode<'t>,
        arguments: Option<SyntaxNode<'t>>,
    },
    /// `path::name(args)`. Ends the walk; `path` becomes the receiver.
    PathCall {
        path: Option<SyntaxNode<'t>>,
        name: SyntaxNode<'t>,
        arguments: Option<SyntaxNode<'t>>,
    },
    /// `path::name!(...)`. Macro bodies are token trees, so no arguments.
    MacroCall {
        path: Option<SyntaxNode<'t>>,
        name: SyntaxNode<'t>,
    },
    /// `(expr)(args)` and other calls of a computed callee.
    Invoke {
        callee: SyntaxNode<'t>,
        arguments: Option<SyntaxNode<'t>>,
    },
    /// `base.name` without a call.
    Field {
        name: SyntaxNode<'t>,
        base: SyntaxNode<'t>,
    },
    /// `await`, `?` and friends. Recorded as a pseudo-segment.
    Suspend {
        marker: &'static str,
        operand: SyntaxNode<'t>,
    },
    /// Indexing, parentheses, non-null assertions: skipped without a segment.
    Transparent { inner: SyntaxNode<'t> },
    /// An identifier or path that starts the chain.
    Terminal,
    /// Anything else. Its text becomes the receiver.
    Opaque,
}

/// The literal shape of a call argument.
#[derive(Debug, Clone)]
pub enum ArgShape<'t> {
    /// Already unquoted.
    Str(String),
    /// Numeric literal text, possibly with a leading `-`.
    Num(&'t str),
    Bool(bool),
    Null,
    Ident(&'t str),
    Object(Vec<ObjectEntry<'t>>),
    Array(Vec<SyntaxNode<'t>>),
    /// `name=value` keyword argument.
    Keyword { name: &'t str, value: SyntaxNode<'t> },
    /// A wrapper (`&x`, `(x)`, `x!`) around the real argument.
    Wrapped(SyntaxNode<'t>),
    Opaque,
}

#[derive(Debug, Clone)]
pub enum ObjectEntry<'t> {
    Pair { key: String, value: SyntaxNode<'t> },
    /// `{ x }`, bound as `x: x`.
    Shorthand { name: &'t str, node: SyntaxNode<'t> },
    /// Spreads, computed keys, methods.
    Opaque { node: SyntaxNode<'t> },
}

pub trait Grammar: Send + Sync {
    /// Separator for qualified names and import paths.
    fn path_separator(&self) -> &'static str;

    /// Call and field-access kinds. A chain is only discovered at its
    /// outermost link: a link node whose parent is another link is skipped.
    fn chain_link_kinds(&self) -> &'static [&'static str];

    /// Suspension kinds (`await`, `?`) that may also start a chain.
    fn suspend_kinds(&self) -> &'static [&'static str];

    fn comment_kinds(&self) -> &'static [&'static str];

    fn decorator_kinds(&self) -> &'static [&'static str];

    fn classify_chain<'t>(&self, node: SyntaxNode<'t>) -> ChainStep<'t>;

    fn classify_arg<'t>(&self, node: SyntaxNode<'t>) -> ArgShape<'t>;

    /// Argument expressions of an argument-list node, in source order.
    fn argument_nodes<'t>(&self, args: SyntaxNode<'t>) -> Vec<SyntaxNode<'t>> {
        args.named_children()
            .into_iter()
            .filter(|n| !self.is_comment(n.kind()))
            .collect()
    }

    fn is_comment(&self, kind: &str) -> bool {
        self.comment_kinds().contains(&kind)
    }

    fn is_decorator(&self, kind: &str) -> bool {
        self.decorator_kinds().contains(&kind)
    }

    fn is_chain_link(&self, kind: &str) -> bool {
        self.chain_link_kinds().contains(&kind)
    }

    fn is_chain_root(&self, kind: &str) -> bool {
        self.is_chain_link(kind) || self.suspend_kinds().contains(&kind)
    }
}
