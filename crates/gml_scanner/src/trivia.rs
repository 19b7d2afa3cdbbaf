//! Hidden-token classification.
//!
//! Buckets comment and whitespace tokens into [`Comment`] and [`Whitespace`]
//! nodes as the token stream is consumed in order, recording what text and
//! characters sit around each comment.

use crate::token::{Token, TokenKind};
use gml_ast::{Comment, CommentKind, Whitespace};

/// Per-parse state of the classifier.
#[derive(Debug, Default)]
struct HiddenProcessorState {
    reached_eof: bool,
    /// Index of the comment still waiting for its trailing text.
    prev_comment: Option<usize>,
    /// Index of the most recent comment not yet followed by a significant token.
    final_comment: Option<usize>,
    prev_ws: String,
    prev_significant_char: String,
    found_first_significant_token: bool,
}

/// Consumes tokens in stream order and appends to two caller-owned lists.
pub struct HiddenTokenProcessor<'a> {
    comments: &'a mut Vec<Comment>,
    whitespaces: &'a mut Vec<Whitespace>,
    state: HiddenProcessorState,
}

impl<'a> HiddenTokenProcessor<'a> {
    pub fn new(comments: &'a mut Vec<Comment>, whitespaces: &'a mut Vec<Whitespace>) -> Self {
        Self {
            comments,
            whitespaces,
            state: HiddenProcessorState::default(),
        }
    }

    /// Whether the end-of-file token has been processed.
    pub fn has_reached_end(&self) -> bool {
        self.state.reached_eof
    }

    /// Process every token of a stream in order.
    pub fn process_all<'t>(&mut self, tokens: impl IntoIterator<Item = &'t Token>) {
        for token in tokens {
            self.process(token);
        }
    }

    pub fn process(&mut self, token: &Token) {
        match token.kind {
            TokenKind::EndOfFile => self.handle_eof(),
            kind if kind.is_comment() => self.handle_comment(token),
            kind if kind.is_whitespace() => self.handle_whitespace(token),
            _ => self.handle_significant(token),
        }
    }

    fn handle_comment(&mut self, token: &Token) {
        let (kind, value) = if token.kind == TokenKind::SingleLineComment {
            (CommentKind::CommentLine, token.text.strip_prefix("//").unwrap_or(&token.text))
        } else {
            let inner = token.text.strip_prefix("/*").unwrap_or(&token.text);
            (CommentKind::CommentBlock, inner.strip_suffix("*/").unwrap_or(inner))
        };
        let mut comment = Comment::new(kind, value.to_string(), token.start_location(), token.end_location());
        comment.leading_ws = std::mem::take(&mut self.state.prev_ws);
        comment.leading_char = self.state.prev_significant_char.clone();
        comment.is_top_comment = !self.state.found_first_significant_token;

        let index = self.comments.len();
        self.comments.push(comment);
        self.state.prev_comment = Some(index);
        self.state.final_comment = Some(index);
    }

    fn handle_whitespace(&mut self, token: &Token) {
        let is_newline = token.kind == TokenKind::LineTerminator;
        self.whitespaces.push(Whitespace {
            value: token.text.clone(),
            start: token.start_location(),
            end: token.end_location(),
            line: token.line,
            is_newline,
        });
        if let Some(index) = self.state.prev_comment.take() {
            self.comments[index].trailing_ws.push_str(&token.text);
        }
        self.state.prev_ws.push_str(&token.text);
    }

    fn handle_significant(&mut self, token: &Token) {
        if let Some(index) = self.state.prev_comment.take() {
            self.comments[index].trailing_char = token.text.chars().next().map(String::from).unwrap_or_default();
        }
        self.state.prev_ws.clear();
        self.state.final_comment = None;
        self.state.prev_significant_char = token.text.chars().last().map(String::from).unwrap_or_default();
        self.state.found_first_significant_token = true;
    }

    fn handle_eof(&mut self) {
        self.state.reached_eof = true;
        if let Some(index) = self.state.final_comment.take() {
            self.comments[index].is_bottom_comment = true;
        }
    }
}
