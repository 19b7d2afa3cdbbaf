//! Comment and whitespace nodes collected from hidden tokens.
//!
//! These are not part of the tree. They are gathered into two ordered side
//! lists during a parse and merged back by position in the printer.

use gml_core::Location;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    /// A `//` comment.
    CommentLine,
    /// A `/* */` comment.
    CommentBlock,
}

/// A comment with its surrounding-text metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// The comment text without its delimiters.
    pub value: String,
    pub start: Location,
    pub end: Location,
    /// Whitespace seen between the previous significant token and this comment.
    #[serde(rename = "leadingWS")]
    pub leading_ws: String,
    /// Whitespace seen right after this comment.
    #[serde(rename = "trailingWS")]
    pub trailing_ws: String,
    /// Last character of the previous significant token.
    pub leading_char: String,
    /// First character of the significant token directly after this comment.
    pub trailing_char: String,
    pub is_top_comment: bool,
    pub is_bottom_comment: bool,
}

impl Comment {
    pub fn new(kind: CommentKind, value: String, start: Location, end: Location) -> Self {
        Self {
            kind,
            value,
            start,
            end,
            leading_ws: String::new(),
            trailing_ws: String::new(),
            leading_char: String::new(),
            trailing_char: String::new(),
            is_top_comment: false,
            is_bottom_comment: false,
        }
    }
}

/// A run of whitespace or a single line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "Whitespace", rename_all = "camelCase")]
pub struct Whitespace {
    pub value: String,
    pub start: Location,
    pub end: Location,
    pub line: u32,
    pub is_newline: bool,
}
