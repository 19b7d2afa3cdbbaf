//! gml_builder: Parse tree to AST construction.
//!
//! Walks a [`gml_parser::ParseTree`] and produces the located [`gml_ast::Node`]
//! tree, driving the scope tracker and the global identifier registry as it
//! goes. Binary expressions go through a precedence-aware resolver that adds
//! synthetic parentheses where grouping would otherwise be lost.

mod binary;
mod builder;

pub use binary::{needs_parentheses, operand_precedence};
pub use builder::{build, AstBuilder, BuildOptions, BuildOutput};
