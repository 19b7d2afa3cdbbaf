//! Scopes and the bindings recorded in them.

use crate::role::IdentifierKind;
use gml_ast::DeclarationRange;
use indexmap::IndexMap;

/// Index of a scope in the tracker's arena.
pub type ScopeId = u32;

/// The construct that opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Program,
    Function,
    Struct,
    With,
    Catch,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub name: String,
    pub kind: IdentifierKind,
    pub tags: Vec<String>,
    pub declaration: DeclarationRange,
    pub scope_id: ScopeId,
}

/// A use of a name, resolved at the point it was visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub kind: IdentifierKind,
    pub range: DeclarationRange,
    /// The scope holding the binding, `None` when the name resolved nowhere.
    pub resolved: Option<ScopeId>,
}

/// A lexical region bounding name resolution.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Bindings in declaration order. The first declaration of a name wins.
    pub bindings: IndexMap<String, BindingInfo>,
    pub references: Vec<Reference>,
}

impl Scope {
    pub fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            parent,
            bindings: IndexMap::new(),
            references: Vec::new(),
        }
    }

    pub fn binding(&self, name: &str) -> Option<&BindingInfo> {
        self.bindings.get(name)
    }

    /// References that found no binding.
    pub fn unresolved(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.resolved.is_none())
    }
}
