//! Visitor traits for traversing the AST.
//!
//! Default implementations walk into every child in source order. Override
//! `visit_node` to act on nodes and call the matching `walk_*` function to
//! keep descending.

use crate::node::Node;

/// A read-only visitor over the AST.
pub trait Visitor {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }
}

/// Visit every direct child of `node`.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) {
    node.for_each_child(&mut |child| visitor.visit_node(child));
}

/// A visitor that may rewrite nodes in place.
pub trait VisitorMut {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }
}

/// Visit every direct child of `node` mutably.
pub fn walk_node_mut<V: VisitorMut + ?Sized>(visitor: &mut V, node: &mut Node) {
    node.for_each_child_mut(&mut |child| visitor.visit_node_mut(child));
}
