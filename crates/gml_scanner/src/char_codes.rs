//! Character constants and classes for the GML scanner.

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';

pub const EXCLAMATION: char = '!';
pub const DOUBLE_QUOTE: char = '"';
pub const HASH: char = '#';
pub const DOLLAR_SIGN: char = '$';
pub const PERCENT: char = '%';
pub const AMPERSAND: char = '&';
pub const SINGLE_QUOTE: char = '\'';
pub const OPEN_PAREN: char = '(';
pub const CLOSE_PAREN: char = ')';
pub const ASTERISK: char = '*';
pub const PLUS: char = '+';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const DOT: char = '.';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const LESS_THAN: char = '<';
pub const EQUALS: char = '=';
pub const GREATER_THAN: char = '>';
pub const QUESTION: char = '?';
pub const AT: char = '@';
pub const OPEN_BRACKET: char = '[';
pub const BACKSLASH: char = '\\';
pub const CLOSE_BRACKET: char = ']';
pub const CARET: char = '^';
pub const UNDERSCORE: char = '_';
pub const OPEN_BRACE: char = '{';
pub const BAR: char = '|';
pub const CLOSE_BRACE: char = '}';
pub const TILDE: char = '~';

pub const B_LOWER: char = 'b';
pub const B_UPPER: char = 'B';
pub const X_LOWER: char = 'x';
pub const X_UPPER: char = 'X';

/// `\n`, `\r`, U+2028 and U+2029 end a line.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}

/// Whitespace that stays on one line: the `WhiteSpaces` token set.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}')
}

/// ASCII fast path, `XID_Start` beyond it.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    match ch {
        'a'..='z' | 'A'..='Z' | UNDERSCORE => true,
        _ if ch.is_ascii() => false,
        _ => unicode_xid::UnicodeXID::is_xid_start(ch),
    }
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    match ch {
        'a'..='z' | 'A'..='Z' | '0'..='9' | UNDERSCORE => true,
        _ if ch.is_ascii() => false,
        _ => unicode_xid::UnicodeXID::is_xid_continue(ch),
    }
}
