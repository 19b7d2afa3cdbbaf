//! Error types surfaced by a parse.

use crate::location_prefix;
use gml_core::{LineMap, TextPos};
use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use thiserror::Error;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A lexical or syntax error. The first one raised ends the parse.
///
/// Serializes as `{ name: "SyntaxError", message, line, column, wrongSymbol,
/// offendingText, rule }`.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[error("{message}")]
#[diagnostic(code(gml::syntax_error))]
#[serde(tag = "name", rename = "SyntaxError", rename_all = "camelCase")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line of the reported position.
    pub line: u32,
    /// 0-based column of the reported position.
    pub column: u32,
    /// Human readable form of the offending symbol, e.g. `symbol ')'` or `end of file`.
    pub wrong_symbol: String,
    pub offending_text: Option<String>,
    /// The grammar rule being matched. `None` for lexer errors.
    pub rule: Option<String>,
    #[serde(skip)]
    pub code: u32,
    /// Character offset of the reported position, when known.
    #[serde(skip)]
    pub index: Option<TextPos>,
    /// The message without its location prefix.
    #[serde(skip)]
    pub detail: String,
    #[serde(skip)]
    #[label]
    pub span: Option<SourceSpan>,
}

impl SyntaxError {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: u32,
        detail: String,
        line: u32,
        column: u32,
        index: Option<TextPos>,
        wrong_symbol: String,
        offending_text: Option<String>,
        rule: Option<String>,
    ) -> Self {
        Self {
            message: format!("{}{}", location_prefix(line, column), detail),
            line,
            column,
            wrong_symbol,
            offending_text,
            rule,
            code,
            index,
            detail,
            span: None,
        }
    }

    /// Move the reported position to `index` in the text described by
    /// `line_map`, recomputing line, column and the message prefix.
    pub fn relocate(&mut self, index: TextPos, line_map: &LineMap) {
        let lc = line_map.line_and_column_of(index);
        self.index = Some(index);
        self.line = lc.line;
        self.column = lc.column;
        self.message = format!("{}{}", location_prefix(lc.line, lc.column), self.detail);
    }

    /// Attach a byte span into `text` for report rendering.
    pub fn with_source(mut self, text: &str) -> Self {
        if let Some(index) = self.index {
            let start = text
                .char_indices()
                .nth(index as usize)
                .map_or(text.len(), |(byte, _)| byte);
            let len = self.offending_text.as_deref().map_or(0, str::len);
            self.span = Some(SourceSpan::new(start.into(), len.min(text.len() - start)));
        }
        self
    }
}

/// A builder invariant violation: the parse tree did not have the shape the
/// AST builder expects. This indicates a bug in the tool, not in the source.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum BuildError {
    #[error("internal error: `{rule}` is missing its expected {expected} (at offset {index})")]
    #[diagnostic(code(gml::internal::missing_child))]
    MissingChild {
        rule: &'static str,
        expected: &'static str,
        index: TextPos,
    },

    #[error("internal error: unexpected `{found}` while building `{rule}` (at offset {index})")]
    #[diagnostic(code(gml::internal::unexpected_node))]
    UnexpectedNode {
        rule: &'static str,
        found: &'static str,
        index: TextPos,
    },
}

impl BuildError {
    pub fn index(&self) -> TextPos {
        match self {
            BuildError::MissingChild { index, .. } => *index,
            BuildError::UnexpectedNode { index, .. } => *index,
        }
    }
}

/// The single failure signal of a parse.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// The source is invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    /// The tool has a bug.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),
}

impl ParseError {
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }

    pub fn as_syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            ParseError::Build(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxError {
        SyntaxError::new(
            1104,
            "unexpected symbol ')'".to_string(),
            1,
            4,
            Some(4),
            "symbol ')'".to_string(),
            Some(")".to_string()),
            Some("expression".to_string()),
        )
    }

    #[test]
    fn test_syntax_error_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["name"], "SyntaxError");
        assert_eq!(json["message"], "Syntax Error (line 1, column 4): unexpected symbol ')'");
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 4);
        assert_eq!(json["wrongSymbol"], "symbol ')'");
        assert_eq!(json["offendingText"], ")");
        assert_eq!(json["rule"], "expression");
        assert!(json.get("detail").is_none());
        assert!(json.get("index").is_none());
    }

    #[test]
    fn test_relocate_rewrites_prefix() {
        let mut err = sample();
        let map = LineMap::new("a\nbcdef");
        err.relocate(4, &map);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 2);
        assert_eq!(err.message, "Syntax Error (line 2, column 2): unexpected symbol ')'");
    }

    #[test]
    fn test_with_source_sets_span() {
        let err = sample().with_source("if (a)");
        let span = err.span.unwrap();
        assert_eq!(span.offset(), 4);
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn test_parse_error_distinguishes_bugs() {
        let syntax: ParseError = sample().into();
        assert!(syntax.is_syntax_error());
        let build: ParseError = BuildError::MissingChild {
            rule: "ifStatement",
            expected: "condition",
            index: 0,
        }
        .into();
        assert!(!build.is_syntax_error());
        assert!(build.as_syntax_error().is_none());
        assert!(build.to_string().contains("ifStatement"));
    }
}
