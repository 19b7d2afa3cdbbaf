//! Turns recognizer failures into [`SyntaxError`]s.

use crate::messages::{self, *};
use crate::{format_message, format_rule_name, DiagnosticMessage, SyntaxError};
use gml_core::TextPos;
use regex::Regex;
use std::sync::LazyLock;

/// Pulls the offending text out of a raw lexer message such as
/// `token recognition error at: '§'`.
static LEXER_OFFENDING_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)at: '(.*)'$").expect("static pattern"));

/// A reported source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPosition {
    /// 1-based line.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
    /// Character offset.
    pub index: TextPos,
}

/// What the recognizer was looking at when it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffendingSymbol {
    /// A token object. `text` is `None` when the token carries no text.
    Token { text: Option<String>, is_eof: bool },
    /// Raw input text.
    Text(String),
    /// A single input code point.
    CodePoint(u32),
}

impl OffendingSymbol {
    /// Resolve the offending text: token text, then literal text, then code point.
    pub fn text(&self) -> Option<String> {
        match self {
            OffendingSymbol::Token { text, .. } => text.clone(),
            OffendingSymbol::Text(text) => Some(text.clone()),
            OffendingSymbol::CodePoint(cp) => char::from_u32(*cp).map(String::from),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, OffendingSymbol::Token { is_eof: true, .. })
    }
}

/// The narrow view of a parser the error listener needs.
pub trait Recognizer {
    /// Names of the rules being matched, innermost first.
    fn rule_invocation_stack(&self) -> Vec<&'static str>;

    /// Position of the first token of the rule context `depth` levels above
    /// the innermost one (`0` is the innermost).
    fn context_start(&self, depth: usize) -> Option<TokenPosition>;
}

/// Builds structured errors from recognizer callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxErrorListener;

impl SyntaxErrorListener {
    pub fn new() -> Self {
        Self
    }

    /// Called by the parser on its first recognition failure.
    pub fn syntax_error(
        &self,
        recognizer: &dyn Recognizer,
        offending: Option<&OffendingSymbol>,
        at: TokenPosition,
        _message: &str,
    ) -> SyntaxError {
        let offending_text = offending.and_then(OffendingSymbol::text);
        let wrong_symbol = describe_symbol(offending, offending_text.as_deref());
        let stack = recognizer.rule_invocation_stack();
        let rule = stack.first().copied().unwrap_or("program");

        let (message, args, pos): (DiagnosticMessage, Vec<String>, TokenPosition) = match rule {
            "closeBlock" => {
                // Point at the brace that opened the block.
                let open = recognizer.context_start(1).unwrap_or(at);
                (MISSING_CLOSING_BRACE, vec![], open)
            }
            "incDecStatement" | "incDecExpression" => (INVALID_INC_DEC_TARGET, vec![], at),
            "expression" => (UNEXPECTED_0_IN_EXPRESSION, vec![wrong_symbol.clone()], at),
            "statement" | "program" => (UNEXPECTED_0, vec![wrong_symbol.clone()], at),
            "parameterList" => (UNEXPECTED_0_IN_PARAMETERS, vec![wrong_symbol.clone()], at),
            other => (
                UNEXPECTED_0_WHILE_MATCHING_RULE_1,
                vec![wrong_symbol.clone(), format_rule_name(other)],
                at,
            ),
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        SyntaxError::new(
            message.code,
            format_message(message.message, &args),
            pos.line,
            pos.column,
            Some(pos.index),
            wrong_symbol,
            offending_text,
            Some(rule.to_string()),
        )
    }

    /// Called by the parser when nesting exceeds its depth limit.
    pub fn depth_exceeded(
        &self,
        recognizer: &dyn Recognizer,
        offending: Option<&OffendingSymbol>,
        at: TokenPosition,
    ) -> SyntaxError {
        let offending_text = offending.and_then(OffendingSymbol::text);
        let wrong_symbol = describe_symbol(offending, offending_text.as_deref());
        let rule = recognizer
            .rule_invocation_stack()
            .first()
            .copied()
            .unwrap_or("program");
        let detail = format_message(MAXIMUM_NESTING_DEPTH_EXCEEDED.message, &[&format_rule_name(rule)]);
        SyntaxError::new(
            MAXIMUM_NESTING_DEPTH_EXCEEDED.code,
            detail,
            at.line,
            at.column,
            Some(at.index),
            wrong_symbol,
            offending_text,
            Some(rule.to_string()),
        )
    }

    /// Called by the lexer on an unrecognised character. When no token
    /// object exists the offending text is recovered from `message`.
    pub fn lexer_error(
        &self,
        offending: Option<&OffendingSymbol>,
        at: TokenPosition,
        message: &str,
    ) -> SyntaxError {
        let offending_text = offending
            .and_then(OffendingSymbol::text)
            .or_else(|| extract_offending_text(message));
        let wrong_symbol = describe_symbol(offending, offending_text.as_deref());
        SyntaxError::new(
            messages::UNRECOGNIZED_SYMBOL_0.code,
            format_message(messages::UNRECOGNIZED_SYMBOL_0.message, &[&wrong_symbol]),
            at.line,
            at.column,
            Some(at.index),
            wrong_symbol,
            offending_text,
            None,
        )
    }
}

/// Extract the quoted offending text from a raw lexer message.
pub fn extract_offending_text(message: &str) -> Option<String> {
    LEXER_OFFENDING_TEXT
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn describe_symbol(offending: Option<&OffendingSymbol>, text: Option<&str>) -> String {
    if offending.is_some_and(OffendingSymbol::is_eof) {
        return "end of file".to_string();
    }
    match text {
        Some(text) => format!("symbol '{}'", text),
        None => "unknown symbol".to_string(),
    }
}
