//! Tokens produced by the scanner.

use gml_core::{count_line_breaks, Location, TextPos};
use std::fmt;

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // -- Hidden channel --
    WhiteSpaces,
    LineTerminator,
    SingleLineComment,
    MultiLineComment,

    EndOfFile,

    // -- Literals --
    Identifier,
    DecimalLiteral,
    HexIntegerLiteral,
    BinaryLiteral,
    StringLiteral,
    VerbatimStringLiteral,
    TemplateStringStart,
    TemplateStringText,
    TemplateStringStartExpression,
    TemplateStringEndExpression,
    TemplateStringEnd,
    BooleanLiteral,
    Undefined,
    NoOne,

    // -- Punctuation --
    OpenBracket,
    ListAccessor,
    MapAccessor,
    GridAccessor,
    ArrayAccessor,
    StructAccessor,
    CloseBracket,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Begin,
    End,
    SemiColon,
    Comma,
    Colon,
    Dot,
    QuestionMark,

    // -- Operators --
    Plus,
    Minus,
    Multiply,
    Divide,
    IntegerDivide,
    Modulo,
    PlusPlus,
    MinusMinus,
    Not,
    BitNot,
    LeftShift,
    RightShift,
    LessThan,
    MoreThan,
    LessThanEquals,
    GreaterThanEquals,
    Equals,
    NotEquals,
    BitAnd,
    BitXOr,
    BitOr,
    And,
    Or,
    Xor,
    NullCoalesce,

    // -- Assignment --
    Assign,
    MultiplyAssign,
    DivideAssign,
    ModulusAssign,
    PlusAssign,
    MinusAssign,
    LeftShiftAssign,
    RightShiftAssign,
    BitAndAssign,
    BitXorAssign,
    BitOrAssign,
    NullCoalescingAssign,

    // -- Keywords --
    If,
    Then,
    Else,
    While,
    Do,
    Until,
    For,
    Repeat,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Exit,
    With,
    Var,
    GlobalVar,
    Static,
    Function,
    Constructor,
    New,
    Delete,
    Enum,
    Try,
    Catch,
    Finally,
    Throw,

    // -- Directives --
    Macro,
    MacroName,
    MacroBody,
    Region,
    EndRegion,
    Define,
}

impl TokenKind {
    /// Whether tokens of this kind travel on the hidden channel.
    #[inline]
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            TokenKind::WhiteSpaces
                | TokenKind::LineTerminator
                | TokenKind::SingleLineComment
                | TokenKind::MultiLineComment
        )
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::SingleLineComment | TokenKind::MultiLineComment)
    }

    #[inline]
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::WhiteSpaces | TokenKind::LineTerminator)
    }

    /// Whether this kind is a compound or plain assignment operator.
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::MultiplyAssign
                | TokenKind::DivideAssign
                | TokenKind::ModulusAssign
                | TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::LeftShiftAssign
                | TokenKind::RightShiftAssign
                | TokenKind::BitAndAssign
                | TokenKind::BitXorAssign
                | TokenKind::BitOrAssign
                | TokenKind::NullCoalescingAssign
        )
    }

    /// Whether this kind opens an index access.
    pub fn is_accessor_open(self) -> bool {
        matches!(
            self,
            TokenKind::OpenBracket
                | TokenKind::ListAccessor
                | TokenKind::MapAccessor
                | TokenKind::GridAccessor
                | TokenKind::ArrayAccessor
                | TokenKind::StructAccessor
        )
    }
}

/// Look up the keyword (or word operator) kind for an identifier-like word.
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "until" => TokenKind::Until,
        "for" => TokenKind::For,
        "repeat" => TokenKind::Repeat,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "exit" => TokenKind::Exit,
        "with" => TokenKind::With,
        "var" => TokenKind::Var,
        "globalvar" => TokenKind::GlobalVar,
        "static" => TokenKind::Static,
        "function" => TokenKind::Function,
        "constructor" => TokenKind::Constructor,
        "new" => TokenKind::New,
        "delete" => TokenKind::Delete,
        "enum" => TokenKind::Enum,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "throw" => TokenKind::Throw,
        "begin" => TokenKind::Begin,
        "end" => TokenKind::End,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "xor" => TokenKind::Xor,
        "not" => TokenKind::Not,
        "div" => TokenKind::IntegerDivide,
        "mod" => TokenKind::Modulo,
        "true" | "false" => TokenKind::BooleanLiteral,
        "undefined" => TokenKind::Undefined,
        "noone" => TokenKind::NoOne,
        _ => return None,
    };
    Some(kind)
}

/// A scanned token. Indices are character offsets; `stop_index` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line of the first character.
    pub line: u32,
    /// 0-based column of the first character.
    pub column: u32,
    pub start_index: TextPos,
    pub stop_index: TextPos,
}

impl Token {
    /// The location of the first character.
    #[inline]
    pub fn start_location(&self) -> Location {
        Location::new(self.line, self.start_index)
    }

    /// The location of the last character. The line accounts for line
    /// breaks embedded in the token text.
    #[inline]
    pub fn end_location(&self) -> Location {
        Location::new(self.line + count_line_breaks(&self.text), self.stop_index)
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.kind.is_hidden()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::EndOfFile {
            write!(f, "<EOF>")
        } else {
            write!(f, "{}", self.text)
        }
    }
}
