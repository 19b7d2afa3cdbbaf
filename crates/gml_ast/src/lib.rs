//! gml_ast: AST node definitions for GML.
//!
//! Defines the node tagged union produced by the AST builder, the comment and
//! whitespace side nodes collected from hidden tokens, and visitor traits for
//! traversal. Every node serializes as `{ type, ...fields, start, end }`.

pub mod node;
pub mod trivia;
pub mod visitor;

pub use node::{DeclarationRange, Node, NodeKind};
pub use trivia::{Comment, CommentKind, Whitespace};
pub use visitor::{Visitor, VisitorMut};
