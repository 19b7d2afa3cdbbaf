//! gml_diagnostics: Syntax error reporting for the GML front end.
//!
//! Converts raw recognizer failures from the lexer and parser into a single
//! structured [`SyntaxError`] with line, column, offending symbol and the
//! grammar rule that was being matched. Parsing fails fast: the first error
//! produced here ends the parse.

mod error;
mod listener;

pub use error::{BuildError, ParseError, ParseResult, SyntaxError};
pub use listener::{OffendingSymbol, Recognizer, SyntaxErrorListener, TokenPosition};

/// A diagnostic message template with a code.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    /// The diagnostic code.
    pub code: u32,
    /// The message template string. May contain `{0}`, `{1}` placeholders.
    pub message: &'static str,
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// The `Syntax Error (line L, column C): ` prefix every message starts with.
pub fn location_prefix(line: u32, column: u32) -> String {
    format!("Syntax Error (line {}, column {}): ", line, column)
}

/// Convert a camel-case rule name into space-separated lowercase words.
///
/// `parameterList` becomes `parameter list`, `lValueExpression` becomes
/// `l value expression`. Runs of capitals stay together.
pub fn format_rule_name(rule: &str) -> String {
    let chars: Vec<char> = rule.chars().collect();
    let mut out = String::with_capacity(rule.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev_lower || (next_lower && chars[i - 1].is_uppercase()) {
                out.push(' ');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $msg:expr) => {
            DiagnosticMessage { code: $code, message: $msg }
        };
    }

    // Lexer errors (1000-1099)
    pub const UNRECOGNIZED_SYMBOL_0: DiagnosticMessage = diag!(1001, "unexpected {0}");

    // Parser errors (1100-1199)
    pub const MISSING_CLOSING_BRACE: DiagnosticMessage = diag!(1101, "missing associated closing brace for this block");
    pub const INVALID_INC_DEC_TARGET: DiagnosticMessage = diag!(1102, "++, -- can only be used on a variable-addressing expression");
    pub const UNEXPECTED_0_IN_EXPRESSION: DiagnosticMessage = diag!(1103, "unexpected {0} in expression");
    pub const UNEXPECTED_0: DiagnosticMessage = diag!(1104, "unexpected {0}");
    pub const UNEXPECTED_0_IN_PARAMETERS: DiagnosticMessage = diag!(1105, "unexpected {0} in function parameters, expected an identifier");
    pub const UNEXPECTED_0_WHILE_MATCHING_RULE_1: DiagnosticMessage = diag!(1106, "unexpected {0} while matching rule {1}");
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: DiagnosticMessage = diag!(1107, "maximum nesting depth exceeded while matching rule {0}");
}
