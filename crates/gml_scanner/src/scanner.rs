//! The GML scanner.
//!
//! Converts source text into the full token stream, hidden channel
//! included: whitespace runs, line terminators and comments are emitted as
//! tokens so the hidden-token classifier can see them. The first
//! unrecognised input ends the scan with a [`SyntaxError`].

use crate::char_codes::*;
use crate::token::{keyword_kind, Token, TokenKind};
use gml_core::{LineMap, TextPos};
use gml_diagnostics::{SyntaxError, SyntaxErrorListener, TokenPosition};

/// Scan the whole text, ending with an `EndOfFile` token.
pub fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxError> {
    Scanner::new(text).scan_all()
}

/// Where the scanner is inside a `#macro` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MacroState {
    None,
    ExpectName,
    ExpectBody,
}

/// The scanner converts GML source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: Vec<char>,
    /// Current position in the text.
    pos: usize,
    line_map: LineMap,
    /// Brace depth of each open template-string expression, innermost last.
    template_stack: Vec<u32>,
    /// Whether the next token is template-string text.
    in_template_text: bool,
    macro_state: MacroState,
    listener: SyntaxErrorListener,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            pos: 0,
            line_map: LineMap::new(text),
            template_stack: Vec::new(),
            in_template_text: false,
            macro_state: MacroState::None,
            listener: SyntaxErrorListener::new(),
        }
    }

    /// Scan every token, hidden ones included, through `EndOfFile`.
    pub fn scan_all(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::with_capacity(self.text.len() / 3 + 1);
        loop {
            let token = self.scan()?;
            let eof = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if eof {
                tracing::trace!(count = tokens.len(), "tokenized");
                return Ok(tokens);
            }
        }
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    fn make(&self, kind: TokenKind, start: usize) -> Token {
        let lc = self.line_map.line_and_column_of(start as TextPos);
        let text: String = self.text[start..self.pos].iter().collect();
        Token {
            kind,
            text,
            line: lc.line,
            column: lc.column,
            start_index: start as TextPos,
            stop_index: (self.pos.max(start + 1) - 1) as TextPos,
        }
    }

    fn error(&self, start: usize) -> SyntaxError {
        let end = self.pos.max(start + 1).min(self.text.len());
        let text: String = self.text[start..end].iter().collect();
        let lc = self.line_map.line_and_column_of(start as TextPos);
        let at = TokenPosition {
            line: lc.line,
            column: lc.column,
            index: start as TextPos,
        };
        self.listener
            .lexer_error(None, at, &format!("token recognition error at: '{}'", text))
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        if self.is_eof() {
            if self.in_template_text {
                return Err(self.error(start.saturating_sub(1)));
            }
            let lc = self.line_map.line_and_column_of(start as TextPos);
            return Ok(Token {
                kind: TokenKind::EndOfFile,
                text: "<EOF>".to_string(),
                line: lc.line,
                column: lc.column,
                start_index: start as TextPos,
                stop_index: start as TextPos,
            });
        }
        if self.in_template_text {
            return self.scan_template_text(start);
        }

        let ch = self.text[self.pos];
        if self.macro_state == MacroState::ExpectBody
            && !is_white_space_single_line(ch)
            && !is_line_break(ch)
        {
            return Ok(self.scan_macro_body(start));
        }

        let kind = match ch {
            CARRIAGE_RETURN => {
                self.pos += 1;
                if self.current_char() == Some(LINE_FEED) {
                    self.pos += 1;
                }
                self.macro_state = MacroState::None;
                TokenKind::LineTerminator
            }
            c if is_line_break(c) => {
                self.pos += 1;
                self.macro_state = MacroState::None;
                TokenKind::LineTerminator
            }
            c if is_white_space_single_line(c) => {
                while self.current_char().is_some_and(is_white_space_single_line) {
                    self.pos += 1;
                }
                TokenKind::WhiteSpaces
            }
            SLASH => match self.char_at(1) {
                Some(SLASH) => {
                    self.pos += 2;
                    while self.current_char().is_some_and(|c| !is_line_break(c)) {
                        self.pos += 1;
                    }
                    TokenKind::SingleLineComment
                }
                Some(ASTERISK) => {
                    self.pos += 2;
                    loop {
                        match self.current_char() {
                            None => {
                                self.pos = start + 2;
                                return Err(self.error(start));
                            }
                            Some(ASTERISK) if self.char_at(1) == Some(SLASH) => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                    TokenKind::MultiLineComment
                }
                Some(EQUALS) => self.advance(2, TokenKind::DivideAssign),
                _ => self.advance(1, TokenKind::Divide),
            },
            DOUBLE_QUOTE => return self.scan_string(start),
            AT => match self.char_at(1) {
                Some(quote @ (DOUBLE_QUOTE | SINGLE_QUOTE)) => {
                    self.pos += 2;
                    while self.current_char().is_some_and(|c| c != quote) {
                        self.pos += 1;
                    }
                    if self.is_eof() {
                        return Err(self.error(start));
                    }
                    self.pos += 1;
                    TokenKind::VerbatimStringLiteral
                }
                _ => {
                    self.pos += 1;
                    return Err(self.error(start));
                }
            },
            DOLLAR_SIGN => match self.char_at(1) {
                Some(DOUBLE_QUOTE) => {
                    self.pos += 2;
                    self.in_template_text = true;
                    TokenKind::TemplateStringStart
                }
                Some(c) if c.is_ascii_hexdigit() => {
                    self.pos += 1;
                    self.scan_digits(|c| c.is_ascii_hexdigit());
                    TokenKind::HexIntegerLiteral
                }
                _ => {
                    self.pos += 1;
                    return Err(self.error(start));
                }
            },
            '0' if matches!(self.char_at(1), Some(X_LOWER | X_UPPER)) => {
                self.pos += 2;
                self.scan_digits(|c| c.is_ascii_hexdigit());
                TokenKind::HexIntegerLiteral
            }
            '0' if matches!(self.char_at(1), Some(B_LOWER | B_UPPER)) => {
                self.pos += 2;
                self.scan_digits(|c| c == '0' || c == '1');
                TokenKind::BinaryLiteral
            }
            c if c.is_ascii_digit() => {
                self.scan_number();
                TokenKind::DecimalLiteral
            }
            DOT if self.char_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number();
                TokenKind::DecimalLiteral
            }
            HASH => return self.scan_directive(start),
            c if is_identifier_start(c) => {
                self.pos += 1;
                while self.current_char().is_some_and(is_identifier_part) {
                    self.pos += 1;
                }
                let word: String = self.text[start..self.pos].iter().collect();
                if self.macro_state == MacroState::ExpectName {
                    self.macro_state = MacroState::ExpectBody;
                    TokenKind::MacroName
                } else {
                    keyword_kind(&word).unwrap_or(TokenKind::Identifier)
                }
            }
            OPEN_BRACE => {
                if let Some(depth) = self.template_stack.last_mut() {
                    *depth += 1;
                }
                self.advance(1, TokenKind::OpenBrace)
            }
            CLOSE_BRACE => match self.template_stack.last().copied() {
                Some(0) => {
                    self.template_stack.pop();
                    self.in_template_text = true;
                    self.advance(1, TokenKind::TemplateStringEndExpression)
                }
                Some(_) => {
                    if let Some(depth) = self.template_stack.last_mut() {
                        *depth -= 1;
                    }
                    self.advance(1, TokenKind::CloseBrace)
                }
                None => self.advance(1, TokenKind::CloseBrace),
            },
            _ => match self.scan_operator() {
                Some(kind) => kind,
                None => {
                    self.pos += 1;
                    return Err(self.error(start));
                }
            },
        };
        Ok(self.make(kind, start))
    }

    #[inline]
    fn advance(&mut self, len: usize, kind: TokenKind) -> TokenKind {
        self.pos += len;
        kind
    }

    fn scan_digits(&mut self, is_digit: impl Fn(char) -> bool) {
        while self
            .current_char()
            .is_some_and(|c| is_digit(c) || c == UNDERSCORE)
        {
            self.pos += 1;
        }
    }

    fn scan_number(&mut self) {
        self.scan_digits(|c| c.is_ascii_digit());
        if self.current_char() == Some(DOT) && self.char_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            self.scan_digits(|c| c.is_ascii_digit());
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<Token, SyntaxError> {
        self.pos += 1;
        loop {
            match self.current_char() {
                None => return Err(self.error(start)),
                Some(c) if is_line_break(c) => return Err(self.error(start)),
                Some(DOUBLE_QUOTE) => {
                    self.pos += 1;
                    break;
                }
                Some(BACKSLASH) => {
                    self.pos += 1;
                    // A backslash before a line break continues the string.
                    if self.current_char() == Some(CARRIAGE_RETURN) && self.char_at(1) == Some(LINE_FEED) {
                        self.pos += 1;
                    }
                    if !self.is_eof() {
                        self.pos += 1;
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
        Ok(self.make(TokenKind::StringLiteral, start))
    }

    fn scan_template_text(&mut self, start: usize) -> Result<Token, SyntaxError> {
        match self.current_char() {
            Some(DOUBLE_QUOTE) => {
                self.pos += 1;
                self.in_template_text = false;
                return Ok(self.make(TokenKind::TemplateStringEnd, start));
            }
            Some(OPEN_BRACE) => {
                self.pos += 1;
                self.in_template_text = false;
                self.template_stack.push(0);
                return Ok(self.make(TokenKind::TemplateStringStartExpression, start));
            }
            _ => {}
        }
        loop {
            match self.current_char() {
                None => return Err(self.error(start)),
                Some(c) if is_line_break(c) => return Err(self.error(start)),
                Some(DOUBLE_QUOTE | OPEN_BRACE) => break,
                Some(BACKSLASH) => {
                    self.pos += 1;
                    if !self.is_eof() {
                        self.pos += 1;
                    }
                }
                Some(_) => self.pos += 1,
            }
        }
        Ok(self.make(TokenKind::TemplateStringText, start))
    }

    fn scan_directive(&mut self, start: usize) -> Result<Token, SyntaxError> {
        self.pos += 1;
        while self.current_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word: String = self.text[start + 1..self.pos].iter().collect();
        let kind = match word.as_str() {
            "macro" => {
                self.macro_state = MacroState::ExpectName;
                return Ok(self.make(TokenKind::Macro, start));
            }
            "region" => TokenKind::Region,
            "endregion" => TokenKind::EndRegion,
            "define" => TokenKind::Define,
            _ => return Err(self.error(start)),
        };
        while self.current_char().is_some_and(|c| !is_line_break(c)) {
            self.pos += 1;
        }
        Ok(self.make(kind, start))
    }

    /// The macro body runs to the end of the line. A trailing backslash
    /// continues it onto the next line.
    fn scan_macro_body(&mut self, start: usize) -> Token {
        while let Some(c) = self.current_char() {
            if is_line_break(c) {
                let continued = self.pos > start && self.text[self.pos - 1] == BACKSLASH;
                if !continued {
                    break;
                }
                if c == CARRIAGE_RETURN && self.char_at(1) == Some(LINE_FEED) {
                    self.pos += 1;
                }
            }
            self.pos += 1;
        }
        self.macro_state = MacroState::None;
        self.make(TokenKind::MacroBody, start)
    }

    fn scan_operator(&mut self) -> Option<TokenKind> {
        let ch = self.current_char()?;
        let next = self.char_at(1);
        let third = self.char_at(2);
        let (len, kind) = match (ch, next) {
            (PLUS, Some(PLUS)) => (2, TokenKind::PlusPlus),
            (PLUS, Some(EQUALS)) => (2, TokenKind::PlusAssign),
            (PLUS, _) => (1, TokenKind::Plus),
            (MINUS, Some(MINUS)) => (2, TokenKind::MinusMinus),
            (MINUS, Some(EQUALS)) => (2, TokenKind::MinusAssign),
            (MINUS, _) => (1, TokenKind::Minus),
            (ASTERISK, Some(EQUALS)) => (2, TokenKind::MultiplyAssign),
            (ASTERISK, _) => (1, TokenKind::Multiply),
            (PERCENT, Some(EQUALS)) => (2, TokenKind::ModulusAssign),
            (PERCENT, _) => (1, TokenKind::Modulo),
            (EXCLAMATION, Some(EQUALS)) => (2, TokenKind::NotEquals),
            (EXCLAMATION, _) => (1, TokenKind::Not),
            (TILDE, _) => (1, TokenKind::BitNot),
            (LESS_THAN, Some(LESS_THAN)) if third == Some(EQUALS) => (3, TokenKind::LeftShiftAssign),
            (LESS_THAN, Some(LESS_THAN)) => (2, TokenKind::LeftShift),
            (LESS_THAN, Some(EQUALS)) => (2, TokenKind::LessThanEquals),
            (LESS_THAN, Some(GREATER_THAN)) => (2, TokenKind::NotEquals),
            (LESS_THAN, _) => (1, TokenKind::LessThan),
            (GREATER_THAN, Some(GREATER_THAN)) if third == Some(EQUALS) => (3, TokenKind::RightShiftAssign),
            (GREATER_THAN, Some(GREATER_THAN)) => (2, TokenKind::RightShift),
            (GREATER_THAN, Some(EQUALS)) => (2, TokenKind::GreaterThanEquals),
            (GREATER_THAN, _) => (1, TokenKind::MoreThan),
            (EQUALS, Some(EQUALS)) => (2, TokenKind::Equals),
            (EQUALS, _) => (1, TokenKind::Assign),
            (AMPERSAND, Some(AMPERSAND)) => (2, TokenKind::And),
            (AMPERSAND, Some(EQUALS)) => (2, TokenKind::BitAndAssign),
            (AMPERSAND, _) => (1, TokenKind::BitAnd),
            (BAR, Some(BAR)) => (2, TokenKind::Or),
            (BAR, Some(EQUALS)) => (2, TokenKind::BitOrAssign),
            (BAR, _) => (1, TokenKind::BitOr),
            (CARET, Some(CARET)) => (2, TokenKind::Xor),
            (CARET, Some(EQUALS)) => (2, TokenKind::BitXorAssign),
            (CARET, _) => (1, TokenKind::BitXOr),
            (QUESTION, Some(QUESTION)) if third == Some(EQUALS) => (3, TokenKind::NullCoalescingAssign),
            (QUESTION, Some(QUESTION)) => (2, TokenKind::NullCoalesce),
            (QUESTION, _) => (1, TokenKind::QuestionMark),
            (COLON, Some(EQUALS)) => (2, TokenKind::Assign),
            (COLON, _) => (1, TokenKind::Colon),
            (OPEN_BRACKET, Some(BAR)) => (2, TokenKind::ListAccessor),
            (OPEN_BRACKET, Some(QUESTION)) => (2, TokenKind::MapAccessor),
            (OPEN_BRACKET, Some(HASH)) => (2, TokenKind::GridAccessor),
            (OPEN_BRACKET, Some(AT)) => (2, TokenKind::ArrayAccessor),
            (OPEN_BRACKET, Some(DOLLAR_SIGN)) => (2, TokenKind::StructAccessor),
            (OPEN_BRACKET, _) => (1, TokenKind::OpenBracket),
            (CLOSE_BRACKET, _) => (1, TokenKind::CloseBracket),
            (OPEN_PAREN, _) => (1, TokenKind::OpenParen),
            (CLOSE_PAREN, _) => (1, TokenKind::CloseParen),
            (SEMICOLON, _) => (1, TokenKind::SemiColon),
            (COMMA, _) => (1, TokenKind::Comma),
            (DOT, _) => (1, TokenKind::Dot),
            _ => return None,
        };
        self.pos += len;
        Some(kind)
    }
}
