//! gml_sourcemap: Source sanitizing and location remapping.
//!
//! The sanitizer rewrites bare `=` inside `if (...)` conditions to `==` and
//! records where characters were inserted. The remapper turns positions in
//! the sanitized text back into positions in the original text, for the AST,
//! the comment and whitespace side lists, and syntax errors.

mod remap;
mod sanitize;

pub use remap::{remap_locations, IndexMapper};
pub use sanitize::{sanitize_conditional_assignments, SanitizedSource};
