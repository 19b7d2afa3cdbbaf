//! gml_frontend: Source text to located AST.
//!
//! Runs the whole front end in order: sanitize, scan, parse, build, remap.
//! The first lexical or syntax error ends the parse; positions in errors and
//! in the output always refer to the caller's original text.

mod output;
mod pipeline;

pub use gml_diagnostics::{ParseError, ParseResult, SyntaxError};
pub use gml_options::ParserOptions;
pub use output::ParseOutput;
pub use pipeline::parse;
