//! Binder integration tests.
//!
//! Drives the scope tracker and the global registry the way the AST builder
//! does, over hand-made identifier nodes.

use gml_ast::{Node, NodeKind};
use gml_binder::{GlobalIdentifierRegistry, IdentifierKind, Role, ScopeKind, ScopeTracker};
use gml_core::Location;

/// Helper: an identifier spanning `name` at `index` on line 1.
fn ident(name: &str, index: u32) -> Node {
    Node::identifier(
        name,
        Some(Location::new(1, index)),
        Some(Location::new(1, index + name.len() as u32 - 1)),
    )
}

/// Helper: visit `name` under the active role and return the annotated node.
fn visit(tracker: &mut ScopeTracker, name: &str, index: u32) -> Node {
    let mut node = ident(name, index);
    tracker.record_identifier(&mut node);
    node
}

fn annotations(node: &Node) -> (Option<u32>, Option<u32>, Vec<String>) {
    match &node.kind {
        NodeKind::Identifier {
            scope_id,
            declaration,
            classifications,
            ..
        } => (
            *scope_id,
            declaration.and_then(|d| d.start).map(|l| l.index),
            classifications.clone(),
        ),
        _ => panic!("expected an identifier"),
    }
}

// ============================================================================
// Scope kinds
// ============================================================================

#[test]
fn test_every_scope_kind_nests() {
    let mut tracker = ScopeTracker::new(true);
    tracker.with_scope(ScopeKind::Program, |t| {
        t.with_scope(ScopeKind::Function, |t| {
            t.with_scope(ScopeKind::With, |t| {
                t.with_scope(ScopeKind::Catch, |t| {
                    t.with_scope(ScopeKind::Struct, |t| {
                        assert_eq!(t.current_scope(), Some(4));
                    });
                });
            });
        });
    });
    let kinds: Vec<ScopeKind> = tracker.scopes().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ScopeKind::Program,
            ScopeKind::Function,
            ScopeKind::With,
            ScopeKind::Catch,
            ScopeKind::Struct
        ]
    );
    let parents: Vec<Option<u32>> = tracker.scopes().iter().map(|s| s.parent).collect();
    assert_eq!(parents, vec![None, Some(0), Some(1), Some(2), Some(3)]);
    assert_eq!(tracker.current_scope(), None);
}

#[test]
fn test_catch_parameter_visible_only_in_catch() {
    let mut tracker = ScopeTracker::new(true);
    tracker.with_scope(ScopeKind::Program, |t| {
        let catch = t.with_scope(ScopeKind::Catch, |t| {
            let role = Role::declaration(IdentifierKind::Variable).with_tag("catchParameter");
            let declared = t.with_role(role, |t| visit(t, "err", 20));
            let (_, _, tags) = annotations(&declared);
            assert!(tags.iter().any(|tag| tag == "catchParameter"));

            let used = visit(t, "err", 40);
            assert_eq!(annotations(&used).1, Some(20));
            t.current_scope()
        });
        let outside = visit(t, "err", 60);
        assert_eq!(annotations(&outside).1, None);
        assert!(catch.is_some());
    });
}

// ============================================================================
// Declarations and references
// ============================================================================

#[test]
fn test_parameters_shadow_program_variables() {
    let mut tracker = ScopeTracker::new(true);
    tracker.with_scope(ScopeKind::Program, |t| {
        t.with_role(Role::declaration(IdentifierKind::Variable), |t| visit(t, "speed", 4));
        t.with_scope(ScopeKind::Function, |t| {
            t.with_role(Role::declaration(IdentifierKind::Parameter), |t| visit(t, "speed", 30));
            let used = visit(t, "speed", 50);
            let (scope, declared_at, _) = annotations(&used);
            assert_eq!(scope, Some(1));
            assert_eq!(declared_at, Some(30));
        });
        let used = visit(t, "speed", 80);
        assert_eq!(annotations(&used).1, Some(4));
    });
}

#[test]
fn test_classifications_shape() {
    let mut tracker = ScopeTracker::new(true);
    tracker.with_scope(ScopeKind::Program, |t| {
        let role = Role::declaration(IdentifierKind::EnumMember).with_tag("enum");
        let node = t.with_role(role, |t| visit(t, "Idle", 0));
        let (_, _, tags) = annotations(&node);
        assert_eq!(tags[0], "identifier");
        assert_eq!(tags[1], "declaration");
        assert!(tags.contains(&"enum".to_string()));
    });
}

#[test]
fn test_unresolved_references_recorded_in_active_scope() {
    let mut tracker = ScopeTracker::new(true);
    tracker.with_scope(ScopeKind::Program, |t| {
        t.with_scope(ScopeKind::With, |t| {
            visit(t, "hp", 10);
            visit(t, "mana", 14);
        });
    });
    let with_scope = tracker.scope(1).expect("with scope");
    let names: Vec<&str> = with_scope.unresolved().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["hp", "mana"]);
    assert!(tracker.references(0).is_empty());
}

#[test]
fn test_resolve_walks_parent_chain() {
    let mut tracker = ScopeTracker::new(true);
    tracker.with_scope(ScopeKind::Program, |t| {
        t.with_role(Role::declaration(IdentifierKind::Variable), |t| visit(t, "total", 0));
        t.with_scope(ScopeKind::Function, |t| {
            t.with_scope(ScopeKind::Struct, |_| {});
        });
    });
    let (scope, binding) = tracker.resolve(2, "total").expect("resolved");
    assert_eq!(scope, 0);
    assert_eq!(binding.kind, IdentifierKind::Variable);
    assert!(tracker.resolve(2, "missing").is_none());
}

// ============================================================================
// Global identifiers
// ============================================================================

#[test]
fn test_registry_stamps_earlier_identifiers() {
    let mut registry = GlobalIdentifierRegistry::new();
    let mut early = Node::new(
        NodeKind::Program {
            body: vec![ident("score", 0), ident("lives", 10)],
        },
        None,
        None,
    );

    let mut declared = ident("score", 30);
    registry.mark_global_identifier(&mut declared);
    assert!(registry.is_global("score"));
    assert_eq!(registry.len(), 1);

    registry.apply_to_tree(&mut early);
    registry.apply_to_tree(&mut early);
    let NodeKind::Program { body } = &early.kind else {
        unreachable!()
    };
    let flags: Vec<bool> = body
        .iter()
        .map(|n| matches!(n.kind, NodeKind::Identifier { is_global_identifier: true, .. }))
        .collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn test_registry_works_without_tracker() {
    let mut tracker = ScopeTracker::disabled();
    let mut registry = GlobalIdentifierRegistry::new();
    let mut node = tracker.with_role(Role::declaration(IdentifierKind::Macro).global(), |t| {
        visit(t, "LIMIT", 7)
    });
    registry.mark_global_identifier(&mut node);
    assert!(matches!(node.kind, NodeKind::Identifier { is_global_identifier: true, .. }));
    assert_eq!(annotations(&node).0, None);
}
