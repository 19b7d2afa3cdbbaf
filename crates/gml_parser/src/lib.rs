//! gml_parser: Recursive descent parser for GML.
//!
//! Consumes the scanner's full token stream and produces a grammar-shaped
//! [`ParseTree`] that the AST builder walks. Parsing stops at the first
//! syntax error.

mod parse_tree;
mod parser;
pub mod precedence;

pub use parse_tree::{ParseChild, ParseNode, ParseNodeKind, ParseTree};
pub use parser::{is_addressable, is_call, parse, Parser, DEFAULT_MAX_DEPTH};
pub use precedence::{binary_operator_info, operator_info, Associativity, OperatorClass, OperatorInfo};
