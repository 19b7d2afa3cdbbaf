//! Rewrites assignments in `if` conditions to equality tests.

use gml_core::TextPos;

/// Characters that make a following `=` part of another operator.
const GUARD_CHARS: [char; 13] = ['*', '+', '-', '/', '%', '|', '&', '^', '<', '>', '!', '=', ':'];

/// The sanitized text and where characters were inserted into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSource {
    pub source_text: String,
    /// Offsets, in sanitized coordinates, of every inserted character.
    /// `None` when the text was left unchanged.
    pub index_adjustments: Option<Vec<TextPos>>,
}

#[derive(Debug, Default)]
struct State {
    in_line_comment: bool,
    in_block_comment: bool,
    /// The quote that opened the current string.
    string_quote: Option<char>,
    /// `@"..."` strings have no escapes.
    verbatim: bool,
    escaped: bool,
    /// The last word was `if` and no other symbol has followed yet.
    saw_if: bool,
    /// Paren depth inside an `if (...)` condition; zero outside.
    condition_depth: u32,
}

#[inline]
fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Expand every bare `=` inside an `if (...)` condition to `==`.
///
/// Comments and strings are skipped, nested parens are tracked, and an `=`
/// already part of `==`, `<=`, `+=`, `:=` and similar is left alone.
pub fn sanitize_conditional_assignments(source: &str) -> SanitizedSource {
    let chars: Vec<char> = source.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len() + 8);
    let mut adjustments: Vec<TextPos> = Vec::new();
    let mut state = State::default();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if state.in_line_comment {
            state.in_line_comment = !matches!(c, '\n' | '\r');
            out.push(c);
            i += 1;
            continue;
        }
        if state.in_block_comment {
            if c == '*' && next == Some('/') {
                out.extend(['*', '/']);
                state.in_block_comment = false;
                i += 2;
            } else {
                out.push(c);
                i += 1;
            }
            continue;
        }
        if let Some(quote) = state.string_quote {
            if state.escaped {
                state.escaped = false;
            } else if c == '\\' && !state.verbatim {
                state.escaped = true;
            } else if c == quote {
                state.string_quote = None;
            }
            out.push(c);
            i += 1;
            continue;
        }

        match (c, next) {
            ('/', Some('/')) => {
                state.in_line_comment = true;
                out.extend(['/', '/']);
                i += 2;
                continue;
            }
            ('/', Some('*')) => {
                state.in_block_comment = true;
                out.extend(['/', '*']);
                i += 2;
                continue;
            }
            ('"' | '\'', _) => {
                state.string_quote = Some(c);
                state.verbatim = i > 0 && chars[i - 1] == '@';
                state.saw_if = false;
                out.push(c);
                i += 1;
                continue;
            }
            _ => {}
        }

        if is_word_char(c) {
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            let word = &chars[start..i];
            if state.condition_depth == 0 {
                state.saw_if = word == ['i', 'f'];
            }
            out.extend_from_slice(word);
            continue;
        }
        if c.is_whitespace() {
            out.push(c);
            i += 1;
            continue;
        }

        if state.condition_depth > 0 {
            match c {
                '(' => state.condition_depth += 1,
                ')' => state.condition_depth -= 1,
                '=' if next == Some('=') => {
                    out.extend(['=', '=']);
                    i += 2;
                    continue;
                }
                '=' => {
                    let guarded = i > 0 && GUARD_CHARS.contains(&chars[i - 1]);
                    if !guarded {
                        out.push('=');
                        adjustments.push(out.len() as TextPos);
                        out.push('=');
                        i += 1;
                        continue;
                    }
                }
                _ => {}
            }
        } else if c == '(' && state.saw_if {
            state.condition_depth = 1;
        }
        state.saw_if = false;
        out.push(c);
        i += 1;
    }

    if adjustments.is_empty() {
        return SanitizedSource {
            source_text: source.to_string(),
            index_adjustments: None,
        };
    }
    tracing::debug!(insertions = adjustments.len(), "sanitized");
    SanitizedSource {
        source_text: out.into_iter().collect(),
        index_adjustments: Some(adjustments),
    }
}
