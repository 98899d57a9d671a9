//! Syntax Tree Adapter.
//!
//! A thin, copyable view over a tree-sitter node paired with the source it
//! was parsed from. The normalizers only talk to the tree through this type;
//! they never mutate it and never keep a node past the pass that produced it.

use tree_sitter::Node;

use crate::unified::types::SourcePosition;

#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> SyntaxNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    fn wrap(&self, node: Node<'t>) -> Self {
        Self {
            node,
            source: self.source,
        }
    }

    /// Grammar node type, e.g. `call_expression`.
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Source text covered by this node. Empty if the byte range does not
    /// land on char boundaries.
    pub fn text(&self) -> &'t str {
        self.source.get(self.node.byte_range()).unwrap_or("")
    }

    /// Stable identity of this node within its tree.
    pub fn id(&self) -> usize {
        self.node.id()
    }

    pub fn start(&self) -> SourcePosition {
        let p = self.node.start_position();
        SourcePosition::from_row_column(p.row, p.column)
    }

    pub fn end(&self) -> SourcePosition {
        let p = self.node.end_position();
        SourcePosition::from_row_column(p.row, p.column)
    }

    /// 1-based start line.
    pub fn line(&self) -> u32 {
        self.start().line
    }

    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    pub fn has_error(&self) -> bool {
        self.node.has_error()
    }

    pub fn children(&self) -> Vec<SyntaxNode<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|n| self.wrap(n))
            .collect()
    }

    pub fn named_children(&self) -> Vec<SyntaxNode<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|n| self.wrap(n))
            .collect()
    }

    pub fn first_named_child(&self) -> Option<SyntaxNode<'t>> {
        let mut cursor = self.node.walk();
        let first = self.node.named_children(&mut cursor).next();
        first.map(|n| self.wrap(n))
    }

    /// Child stored under a grammar field name.
    pub fn field(&self, name: &str) -> Option<SyntaxNode<'t>> {
        self.node.child_by_field_name(name).map(|n| self.wrap(n))
    }

    /// All children stored under a (repeated) grammar field name.
    pub fn fields(&self, name: &str) -> Vec<SyntaxNode<'t>> {
        let mut cursor = self.node.walk();
        self.node
            .children_by_field_name(name, &mut cursor)
            .map(|n| self.wrap(n))
            .collect()
    }

    /// Text of a field child, if present.
    pub fn field_text(&self, name: &str) -> Option<&'t str> {
        self.field(name).map(|n| n.text())
    }

    /// First direct child (named or anonymous) of one of the given kinds.
    pub fn child_of_kind(&self, kinds: &[&str]) -> Option<SyntaxNode<'t>> {
        self.children().into_iter().find(|c| kinds.contains(&c.kind()))
    }

    /// Whether any direct child (including keywords) has this kind.
    pub fn has_child_kind(&self, kind: &str) -> bool {
        let mut cursor = self.node.walk();
        let found = self.node.children(&mut cursor).any(|c| c.kind() == kind);
        found
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.node.parent().map(|n| self.wrap(n))
    }

    pub fn prev_sibling(&self) -> Option<SyntaxNode<'t>> {
        self.node.prev_sibling().map(|n| self.wrap(n))
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'t>> {
        self.node.next_sibling().map(|n| self.wrap(n))
    }
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.kind())
            .field("start", &self.start())
            .field("text", &self.text())
            .finish()
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for SyntaxNode<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parsers::manager::ParserManager;

    #[test]
    fn exposes_kind_text_and_links() {
        let source = "fn main() { run(); }\n";
        let tree = ParserManager::new()
            .parse_source(source, Language::Rust, None)
            .unwrap();
        let root = SyntaxNode::new(tree.root_node(), source);
        assert_eq!(root.kind(), "source_file");

        let func = root.first_named_child().unwrap();
        assert_eq!(func.kind(), "function_item");
        assert_eq!(func.field_text("name"), Some("main"));
        assert_eq!(func.start(), SourcePosition { line: 1, column: 0 });
        assert_eq!(func.parent(), Some(root));
        assert!(func.prev_sibling().is_none());
        assert!(func.has_child_kind("fn"));
    }
}
