//! gml_scanner: Lexer for GML source code.
//!
//! Produces the complete token stream, including the hidden channel
//! (whitespace, line terminators and comments), with support for:
//! - Word operators (`and`, `or`, `xor`, `not`, `div`, `mod`)
//! - Hex (`0x`, `$`) and binary literals
//! - Verbatim (`@"..."`) and template (`$"...{expr}..."`) strings
//! - Accessor openers (`[|`, `[?`, `[#`, `[@`, `[$`)
//! - `#macro`, `#region`, `#endregion` and `#define` directives
//!
//! The hidden-token classifier that turns the hidden channel into comment
//! and whitespace nodes lives in [`trivia`].

mod char_codes;
mod scanner;
mod token;
pub mod trivia;

pub use scanner::{tokenize, Scanner};
pub use token::{keyword_kind, Token, TokenKind};
pub use trivia::HiddenTokenProcessor;
