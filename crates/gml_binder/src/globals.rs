//! Names declared with global reach.

use gml_ast::{Node, NodeKind, VisitorMut};
use rustc_hash::FxHashSet;

/// Names declared through `globalvar` or `#macro`, owned by one parse.
///
/// Marking happens when the declaration is visited; applying happens on every
/// identifier visit and once more over the finished tree, so identifiers that
/// appear before their declaration are stamped too.
#[derive(Debug, Clone, Default)]
pub struct GlobalIdentifierRegistry {
    names: FxHashSet<String>,
}

impl GlobalIdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the identifier's name and stamp the node itself.
    pub fn mark_global_identifier(&mut self, node: &mut Node) {
        if let NodeKind::Identifier {
            name,
            is_global_identifier,
            ..
        } = &mut node.kind
        {
            self.names.insert(name.clone());
            *is_global_identifier = true;
        }
    }

    /// Stamp the node if its name has been registered. Idempotent.
    pub fn apply_global_identifiers_to_node(&self, node: &mut Node) {
        if let NodeKind::Identifier {
            name,
            is_global_identifier,
            ..
        } = &mut node.kind
        {
            if self.names.contains(name.as_str()) {
                *is_global_identifier = true;
            }
        }
    }

    /// Stamp every identifier in the tree rooted at `root`.
    pub fn apply_to_tree(&self, root: &mut Node) {
        if self.names.is_empty() {
            return;
        }
        let mut stamp = GlobalStamp { registry: self };
        stamp.visit_node_mut(root);
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

struct GlobalStamp<'a> {
    registry: &'a GlobalIdentifierRegistry,
}

impl VisitorMut for GlobalStamp<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        self.registry.apply_global_identifiers_to_node(node);
        gml_ast::visitor::walk_node_mut(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_stamped(node: &Node) -> bool {
        matches!(
            node.kind,
            NodeKind::Identifier {
                is_global_identifier: true,
                ..
            }
        )
    }

    #[test]
    fn test_mark_then_apply() {
        let mut registry = GlobalIdentifierRegistry::new();
        let mut decl = Node::identifier("score", None, None);
        registry.mark_global_identifier(&mut decl);
        assert!(is_stamped(&decl));

        let mut other = Node::identifier("score", None, None);
        registry.apply_global_identifiers_to_node(&mut other);
        assert!(is_stamped(&other));

        let mut unrelated = Node::identifier("lives", None, None);
        registry.apply_global_identifiers_to_node(&mut unrelated);
        assert!(!is_stamped(&unrelated));
    }

    #[test]
    fn test_apply_to_tree_reaches_nested_identifiers() {
        let mut registry = GlobalIdentifierRegistry::new();
        registry.mark_global_identifier(&mut Node::identifier("score", None, None));
        let mut tree = Node::new(
            NodeKind::Program {
                body: vec![Node::identifier("score", None, None).into_parenthesized(false)],
            },
            None,
            None,
        );
        registry.apply_to_tree(&mut tree);
        let NodeKind::Program { body } = &tree.kind else {
            panic!("program");
        };
        let NodeKind::ParenthesizedExpression { expression, .. } = &body[0].kind else {
            panic!("parenthesized");
        };
        assert!(is_stamped(expression));
    }
}
