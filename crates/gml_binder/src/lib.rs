//! gml_binder: Scope and identifier-role tracking.
//!
//! The AST builder drives a [`ScopeTracker`] while it visits the parse tree:
//! scopes are pushed for programs, functions, structs, `with` blocks and
//! `catch` clauses, and roles say whether the identifier being visited is a
//! declaration or a reference. Names declared with global reach (`globalvar`,
//! `#macro`) are kept in a [`GlobalIdentifierRegistry`].

mod globals;
mod role;
mod scope;
mod tracker;

pub use globals::GlobalIdentifierRegistry;
pub use role::{IdentifierKind, Role, ScopeOverride};
pub use scope::{BindingInfo, Reference, Scope, ScopeId, ScopeKind};
pub use tracker::ScopeTracker;
