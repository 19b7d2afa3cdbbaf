//! The scope and role stack machine.

use crate::role::{Role, ScopeOverride};
use crate::scope::{BindingInfo, Reference, Scope, ScopeId, ScopeKind};
use gml_ast::{DeclarationRange, Node, NodeKind};

/// Tracks lexical scopes and identifier roles during one AST build.
///
/// A disabled tracker keeps no state: every operation is a passthrough.
#[derive(Debug, Clone)]
pub struct ScopeTracker {
    enabled: bool,
    /// Every scope ever opened, indexed by [`ScopeId`].
    scopes: Vec<Scope>,
    /// Open scopes, innermost last.
    stack: Vec<ScopeId>,
    /// Active roles, innermost last.
    roles: Vec<Role>,
}

impl ScopeTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            scopes: Vec::new(),
            stack: Vec::new(),
            roles: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Open a scope nested in the current one.
    pub fn push_scope(&mut self, kind: ScopeKind) -> Option<ScopeId> {
        if !self.enabled {
            return None;
        }
        let id = self.scopes.len() as ScopeId;
        self.scopes.push(Scope::new(id, kind, self.stack.last().copied()));
        self.stack.push(id);
        tracing::trace!(id, ?kind, "push_scope");
        Some(id)
    }

    pub fn pop_scope(&mut self) {
        if self.enabled {
            self.stack.pop();
        }
    }

    /// Run `body` inside a new scope of `kind`.
    pub fn with_scope<R>(&mut self, kind: ScopeKind, body: impl FnOnce(&mut Self) -> R) -> R {
        if !self.enabled {
            return body(self);
        }
        self.push_scope(kind);
        let result = body(self);
        self.pop_scope();
        result
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.stack.last().copied()
    }

    // ========================================================================
    // Roles
    // ========================================================================

    pub fn push_role(&mut self, role: Role) {
        if self.enabled {
            self.roles.push(role);
        }
    }

    pub fn pop_role(&mut self) {
        if self.enabled {
            self.roles.pop();
        }
    }

    /// Run `body` with `role` active.
    pub fn with_role<R>(&mut self, role: Role, body: impl FnOnce(&mut Self) -> R) -> R {
        if !self.enabled {
            return body(self);
        }
        self.push_role(role);
        let result = body(self);
        self.pop_role();
        result
    }

    pub fn current_role(&self) -> Option<&Role> {
        self.roles.last()
    }

    /// A copy of `role` whose tags can be changed without touching the original.
    pub fn clone_role(role: &Role) -> Role {
        role.clone()
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Record a visited identifier as a declaration or a reference, depending
    /// on the active role.
    pub fn record_identifier(&mut self, node: &mut Node) {
        if !self.enabled {
            return;
        }
        let Some(name) = node.identifier_name().map(str::to_string) else {
            return;
        };
        match self.roles.last().cloned() {
            Some(role) if role.is_declaration() => self.declare(&name, node, &role),
            role => self.reference(&name, node, role.as_ref()),
        }
    }

    /// Record a declaration of `name` and annotate the identifier node.
    pub fn declare(&mut self, name: &str, node: &mut Node, role: &Role) {
        if !self.enabled {
            return;
        }
        let target = match role.scope_override() {
            Some(ScopeOverride::Global) => self.stack.first().copied(),
            None => self.current_scope(),
        };
        let Some(scope_id) = target else {
            return;
        };
        let range = DeclarationRange {
            start: node.start,
            end: node.end,
        };
        let scope = &mut self.scopes[scope_id as usize];
        let binding = scope
            .bindings
            .entry(name.to_string())
            .or_insert_with(|| BindingInfo {
                name: name.to_string(),
                kind: role.kind(),
                tags: role.tags().to_vec(),
                declaration: range,
                scope_id,
            });
        let declaration = binding.declaration;
        tracing::trace!(name, scope_id, "declare");
        annotate(node, scope_id, Some(declaration), role.classifications());
    }

    /// Record a use of `name`, resolving it through the enclosing scopes.
    pub fn reference(&mut self, name: &str, node: &mut Node, role: Option<&Role>) {
        if !self.enabled {
            return;
        }
        let Some(current) = self.current_scope() else {
            return;
        };
        let role = role
            .cloned()
            .unwrap_or_else(|| Role::reference(crate::role::IdentifierKind::Variable));
        let resolved = self
            .resolve(current, name)
            .map(|(id, binding)| (id, binding.declaration));
        self.scopes[current as usize].references.push(Reference {
            name: name.to_string(),
            kind: role.kind(),
            range: DeclarationRange {
                start: node.start,
                end: node.end,
            },
            resolved: resolved.map(|(id, _)| id),
        });
        match resolved {
            Some((id, declaration)) => annotate(node, id, Some(declaration), role.classifications()),
            None => annotate(node, current, None, role.classifications()),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id as usize)
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Find the binding for `name` visible from `scope_id`.
    pub fn resolve(&self, scope_id: ScopeId, name: &str) -> Option<(ScopeId, &BindingInfo)> {
        let mut next = Some(scope_id);
        while let Some(id) = next {
            let scope = self.scopes.get(id as usize)?;
            if let Some(binding) = scope.binding(name) {
                return Some((id, binding));
            }
            next = scope.parent;
        }
        None
    }

    pub fn references(&self, scope_id: ScopeId) -> &[Reference] {
        self.scope(scope_id).map_or(&[], |scope| scope.references.as_slice())
    }

    /// Hand the recorded scopes to the caller.
    pub fn into_scopes(self) -> Vec<Scope> {
        self.scopes
    }
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self::disabled()
    }
}

fn annotate(node: &mut Node, id: ScopeId, range: Option<DeclarationRange>, tags: Vec<String>) {
    if let NodeKind::Identifier {
        scope_id,
        declaration,
        classifications,
        ..
    } = &mut node.kind
    {
        *scope_id = Some(id);
        *declaration = range;
        *classifications = tags;
    }
}
