//! The concrete syntax tree arena.
//!
//! Nodes live in one flat arena addressed by [`NodeId`]; consumers navigate
//! through the borrowing [`NodeRef`] view. Trees are built bottom-up during
//! parsing and read-only afterwards, except for [`SyntaxTree::edit`], which
//! shifts spans so a caller can line an old tree up against edited text.

use crate::{FieldName, NodeKind, Span};
use smallvec::SmallVec;
use std::fmt;

/// Arena index of a node.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node: kind, optional field tag, span, ordered children.
#[derive(Clone, Eq, PartialEq, Debug)]
struct NodeData {
    kind: NodeKind,
    field: Option<FieldName>,
    span: Span,
    children: SmallVec<[NodeId; 4]>,
}

/// A parsed document's tree.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

/// A text edit, for shifting an existing tree's spans before re-parse.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct InputEdit {
    /// Byte offset where the edit begins.
    pub start: u32,
    /// Exclusive end of the replaced range in the old text.
    pub old_end: u32,
    /// Exclusive end of the replacement in the new text.
    pub new_end: u32,
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree::default()
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node whose children were already added.
    ///
    /// Children keep their own field tags; the parent only orders them.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        field: Option<FieldName>,
        span: Span,
        children: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(NodeData {
            kind,
            field,
            span,
            children: children.into_iter().collect(),
        });
        id
    }

    /// Add a childless node.
    pub fn add_leaf(&mut self, kind: NodeKind, field: Option<FieldName>, span: Span) -> NodeId {
        self.add_node(kind, field, span, [])
    }

    /// Mark the root. Called once, at the end of a parse.
    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Root node, if a parse completed far enough to produce one.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| NodeRef { tree: self, id })
    }

    /// Borrowed view of a node.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Retag the field of an existing node. Used when a parsed piece turns
    /// out to play a different role in the enclosing construct.
    pub fn set_field(&mut self, id: NodeId, field: Option<FieldName>) {
        self.nodes[id.index()].field = field;
    }

    /// All error and missing nodes, in arena order.
    pub fn errors(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind.is_error())
            .map(|(i, _)| NodeRef {
                tree: self,
                id: NodeId(u32::try_from(i).unwrap_or(u32::MAX)),
            })
    }

    /// Whether any error or missing node exists.
    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.kind.is_error())
    }

    /// Shift spans to account for a text edit.
    ///
    /// Spans entirely before the edit are untouched; spans entirely after
    /// shift by the edit delta; spans straddling the edit stretch over the
    /// replacement. All spans stay well formed (`start <= end`).
    pub fn edit(&mut self, edit: &InputEdit) {
        for node in &mut self.nodes {
            node.span = shift_span(node.span, edit);
        }
    }
}

fn shift_span(span: Span, edit: &InputEdit) -> Span {
    let shift = |offset: u32| -> u32 {
        if offset <= edit.start {
            offset
        } else if offset >= edit.old_end {
            offset - edit.old_end + edit.new_end
        } else {
            // Inside the replaced range: clamp to the replacement end.
            edit.new_end
        }
    };
    let start = shift(span.start);
    let end = shift(span.end).max(start);
    Span::new(start, end)
}

/// Read-only view of a node.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    #[inline]
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// The field tag this node carries in its parent, if any.
    #[inline]
    pub fn field_name(&self) -> Option<FieldName> {
        self.data().field
    }

    /// Ordered children.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + '_ {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        self.data()
            .children
            .get(index)
            .map(|&id| NodeRef { tree, id })
    }

    /// First child tagged with `field`.
    pub fn field(&self, field: FieldName) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.field_name() == Some(field))
    }

    /// All children tagged with `field`, in order.
    pub fn fields(&self, field: FieldName) -> impl Iterator<Item = NodeRef<'t>> + '_ {
        self.children()
            .filter(move |c| c.field_name() == Some(field))
    }

    /// First child of the given kind, in order.
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.kind() == kind)
    }

    /// First descendant (preorder, self included) of the given kind.
    pub fn descendant_of_kind(&self, kind: NodeKind) -> Option<NodeRef<'t>> {
        if self.kind() == kind {
            return Some(*self);
        }
        for child in self.children() {
            if let Some(found) = child.descendant_of_kind(kind) {
                return Some(found);
            }
        }
        None
    }

    /// S-expression rendering of the named structure, for tests and debug.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out);
        out
    }

    fn dump_into(&self, out: &mut String) {
        out.push('(');
        if let Some(field) = self.field_name() {
            out.push_str(&format!("{field}: "));
        }
        out.push_str(&format!("{}", self.kind()));
        for child in self.children() {
            out.push(' ');
            child.dump_into(out);
        }
        out.push(')');
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.kind(), self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_level_tree() -> SyntaxTree {
        let mut tree = SyntaxTree::new();
        let name = tree.add_leaf(NodeKind::Identifier, Some(FieldName::Name), Span::new(4, 5));
        let ty = tree.add_leaf(NodeKind::PrimitiveType, Some(FieldName::Type), Span::new(0, 3));
        let decl = tree.add_node(NodeKind::Declaration, None, Span::new(0, 6), [ty, name]);
        let root = tree.add_node(NodeKind::TranslationUnit, None, Span::new(0, 6), [decl]);
        tree.set_root(root);
        tree
    }

    #[test]
    fn navigation_by_kind_and_field() {
        let tree = two_level_tree();
        let root = tree.root().unwrap();
        assert_eq!(root.kind(), NodeKind::TranslationUnit);
        let decl = root.child(0).unwrap();
        assert_eq!(decl.kind(), NodeKind::Declaration);
        assert_eq!(decl.child_count(), 2);
        let name = decl.field(FieldName::Name).unwrap();
        assert_eq!(name.kind(), NodeKind::Identifier);
        assert_eq!(name.span(), Span::new(4, 5));
    }

    #[test]
    fn missing_field_is_absent_not_renamed() {
        let tree = two_level_tree();
        let decl = tree.root().unwrap().child(0).unwrap();
        assert!(decl.field(FieldName::Declarator).is_none());
    }

    #[test]
    fn descendant_search() {
        let tree = two_level_tree();
        let root = tree.root().unwrap();
        assert!(root.descendant_of_kind(NodeKind::Identifier).is_some());
        assert!(root.descendant_of_kind(NodeKind::LambdaExpression).is_none());
    }

    #[test]
    fn errors_iterator() {
        let mut tree = SyntaxTree::new();
        let err = tree.add_leaf(NodeKind::ErrorNode, None, Span::new(0, 2));
        let root = tree.add_node(NodeKind::TranslationUnit, None, Span::new(0, 2), [err]);
        tree.set_root(root);
        assert!(tree.has_errors());
        assert_eq!(tree.errors().count(), 1);
    }

    #[test]
    fn edit_shifts_spans_after_the_edit() {
        let mut tree = two_level_tree();
        // Insert 3 bytes at offset 2.
        tree.edit(&InputEdit {
            start: 2,
            old_end: 2,
            new_end: 5,
        });
        let root = tree.root().unwrap();
        // Root straddles the edit and stretches.
        assert_eq!(root.span(), Span::new(0, 9));
        let decl = root.child(0).unwrap();
        let name = decl.field(FieldName::Name).unwrap();
        // Name was entirely after the edit and shifted by +3.
        assert_eq!(name.span(), Span::new(7, 8));
    }

    #[test]
    fn edit_keeps_spans_well_formed() {
        let mut tree = SyntaxTree::new();
        let id = tree.add_leaf(NodeKind::Identifier, None, Span::new(5, 8));
        // Delete bytes 4..10, swallowing the node.
        tree.edit(&InputEdit {
            start: 4,
            old_end: 10,
            new_end: 4,
        });
        let node = tree.node(id);
        assert!(node.span().start <= node.span().end);
    }

    #[test]
    fn dump_renders_fields() {
        let tree = two_level_tree();
        let decl = tree.root().unwrap().child(0).unwrap();
        assert_eq!(
            decl.dump(),
            "(Declaration (Type: PrimitiveType) (Name: Identifier))"
        );
    }
}
