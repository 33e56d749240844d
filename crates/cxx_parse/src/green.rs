//! Scratch trees built during parsing.
//!
//! Candidate exploration needs cheap rollback: a rejected candidate's nodes
//! must vanish without a trace. Parse routines therefore build owned
//! [`GreenNode`]s that are dropped wholesale when a candidate loses, and
//! only the winning tree is lowered into the flat [`SyntaxTree`] arena.
//! Aliasing happens at lowering time, so internal node kinds never reach a
//! finished tree.

use cxx_grammar::ParseTables;
use cxx_ir::{FieldName, NodeId, NodeKind, Span, SyntaxTree};

/// One node of a scratch tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct GreenNode {
    pub kind: NodeKind,
    pub field: Option<FieldName>,
    pub span: Span,
    pub children: Vec<GreenNode>,
}

impl GreenNode {
    /// A childless node.
    pub(crate) fn leaf(kind: NodeKind, span: Span) -> Self {
        GreenNode {
            kind,
            field: None,
            span,
            children: Vec::new(),
        }
    }

    /// An interior node spanning its children.
    ///
    /// With no children the span is empty at offset zero; callers that know
    /// better set the span explicitly via [`GreenNode::with_span`].
    pub(crate) fn node(kind: NodeKind, children: Vec<GreenNode>) -> Self {
        let span = children
            .iter()
            .map(|c| c.span)
            .reduce(Span::merge)
            .unwrap_or(Span::DUMMY);
        GreenNode {
            kind,
            field: None,
            span,
            children,
        }
    }

    #[must_use]
    pub(crate) fn with_field(mut self, field: FieldName) -> Self {
        self.field = Some(field);
        self
    }

    #[must_use]
    pub(crate) fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Error and missing markers in this subtree.
    pub(crate) fn error_count(&self) -> usize {
        let own = usize::from(self.kind.is_error());
        own + self
            .children
            .iter()
            .map(GreenNode::error_count)
            .sum::<usize>()
    }

    /// Lower this tree into the arena, applying the alias table. Children
    /// are added before parents so arena order is a postorder walk.
    pub(crate) fn lower(&self, tree: &mut SyntaxTree, tables: &ParseTables) -> NodeId {
        let children: Vec<NodeId> = self
            .children
            .iter()
            .map(|child| child.lower(tree, tables))
            .collect();
        tree.add_node(tables.alias_for(self.kind), self.field, self.span, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxx_grammar::{build, cpp};
    use pretty_assertions::assert_eq;

    #[test]
    fn node_span_covers_children() {
        let node = GreenNode::node(
            NodeKind::Declaration,
            vec![
                GreenNode::leaf(NodeKind::PrimitiveType, Span::new(0, 3)),
                GreenNode::leaf(NodeKind::Identifier, Span::new(4, 5)),
            ],
        );
        assert_eq!(node.span, Span::new(0, 5));
    }

    #[test]
    fn error_count_is_recursive() {
        let node = GreenNode::node(
            NodeKind::Declaration,
            vec![
                GreenNode::leaf(NodeKind::Identifier, Span::new(0, 1)),
                GreenNode::node(
                    NodeKind::InitDeclarator,
                    vec![GreenNode::leaf(NodeKind::Missing, Span::point(2))],
                ),
            ],
        );
        assert_eq!(node.error_count(), 1);
    }

    #[test]
    fn lowering_applies_aliases() {
        let tables = build(&cpp()).unwrap();
        let green = GreenNode::node(
            NodeKind::ConstructorOrDestructorDefinition,
            vec![GreenNode::leaf(NodeKind::Identifier, Span::new(0, 1))],
        );
        let mut tree = SyntaxTree::new();
        let root = green.lower(&mut tree, &tables);
        tree.set_root(root);
        assert_eq!(
            tree.root().map(|n| n.kind()),
            Some(NodeKind::FunctionDefinition)
        );
    }
}
