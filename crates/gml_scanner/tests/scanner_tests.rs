//! Scanner integration tests.
//!
//! Verifies that the scanner tokenizes GML constructs, keeps the hidden
//! channel, and reports unrecognised input.

use gml_scanner::{tokenize, HiddenTokenProcessor, TokenKind};

/// Helper: scan all significant tokens and return (kind, text) pairs.
fn scan_all(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .filter(|t| !t.is_hidden() && t.kind != TokenKind::EndOfFile)
        .map(|t| (t.kind, t.text))
        .collect()
}

/// Helper: scan all significant token kinds.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_source() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EndOfFile);
}

#[test]
fn test_hidden_channel_is_kept() {
    let kinds: Vec<_> = tokenize("a // c\n\t/* b */").unwrap().into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Identifier,
            TokenKind::WhiteSpaces,
            TokenKind::SingleLineComment,
            TokenKind::LineTerminator,
            TokenKind::WhiteSpaces,
            TokenKind::MultiLineComment,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("foo\n  bar").unwrap();
    let bar = tokens.iter().find(|t| t.text == "bar").unwrap();
    assert_eq!(bar.line, 2);
    assert_eq!(bar.column, 2);
    assert_eq!(bar.start_index, 6);
    assert_eq!(bar.stop_index, 8);
}

#[test]
fn test_multiline_comment_end_location() {
    let tokens = tokenize("/* a\nb\nc */").unwrap();
    let end = tokens[0].end_location();
    assert_eq!(tokens[0].line, 1);
    assert_eq!(end.line, Some(3));
    assert_eq!(end.index, 10);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numeric_literals() {
    assert_eq!(scan_all("42"), [(TokenKind::DecimalLiteral, "42".to_string())]);
    assert_eq!(scan_all("3.14"), [(TokenKind::DecimalLiteral, "3.14".to_string())]);
    assert_eq!(scan_all(".5"), [(TokenKind::DecimalLiteral, ".5".to_string())]);
    assert_eq!(scan_all("1_000"), [(TokenKind::DecimalLiteral, "1_000".to_string())]);
    assert_eq!(scan_all("0xFF"), [(TokenKind::HexIntegerLiteral, "0xFF".to_string())]);
    assert_eq!(scan_all("$ff00"), [(TokenKind::HexIntegerLiteral, "$ff00".to_string())]);
    assert_eq!(scan_all("0b1010"), [(TokenKind::BinaryLiteral, "0b1010".to_string())]);
}

#[test]
fn test_string_literals() {
    assert_eq!(scan_all(r#""he said \"hi\"""#), [(TokenKind::StringLiteral, r#""he said \"hi\"""#.to_string())]);
    assert_eq!(scan_kinds("@'multi\nline'"), [TokenKind::VerbatimStringLiteral]);
    assert_eq!(scan_kinds("@\"x\""), [TokenKind::VerbatimStringLiteral]);
}

#[test]
fn test_template_string() {
    assert_eq!(
        scan_all(r#"$"hp: {hp + 1}!""#),
        [
            (TokenKind::TemplateStringStart, "$\"".to_string()),
            (TokenKind::TemplateStringText, "hp: ".to_string()),
            (TokenKind::TemplateStringStartExpression, "{".to_string()),
            (TokenKind::Identifier, "hp".to_string()),
            (TokenKind::Plus, "+".to_string()),
            (TokenKind::DecimalLiteral, "1".to_string()),
            (TokenKind::TemplateStringEndExpression, "}".to_string()),
            (TokenKind::TemplateStringText, "!".to_string()),
            (TokenKind::TemplateStringEnd, "\"".to_string()),
        ]
    );
}

#[test]
fn test_template_string_with_struct_inside_expression() {
    let kinds = scan_kinds(r#"$"{ {a: 1}.a }""#);
    assert_eq!(kinds.first(), Some(&TokenKind::TemplateStringStart));
    assert!(kinds.contains(&TokenKind::OpenBrace));
    assert!(kinds.contains(&TokenKind::CloseBrace));
    assert_eq!(kinds.iter().filter(|k| **k == TokenKind::TemplateStringEndExpression).count(), 1);
    assert_eq!(kinds.last(), Some(&TokenKind::TemplateStringEnd));
}

#[test]
fn test_literal_keywords() {
    assert_eq!(
        scan_kinds("true false undefined noone"),
        [TokenKind::BooleanLiteral, TokenKind::BooleanLiteral, TokenKind::Undefined, TokenKind::NoOne]
    );
}

// ============================================================================
// Keywords and operators
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        scan_kinds("if then else while do until for repeat switch case default"),
        [
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Do,
            TokenKind::Until,
            TokenKind::For,
            TokenKind::Repeat,
            TokenKind::Switch,
            TokenKind::Case,
            TokenKind::Default,
        ]
    );
    assert_eq!(
        scan_kinds("globalvar static function constructor new delete enum try catch finally throw"),
        [
            TokenKind::GlobalVar,
            TokenKind::Static,
            TokenKind::Function,
            TokenKind::Constructor,
            TokenKind::New,
            TokenKind::Delete,
            TokenKind::Enum,
            TokenKind::Try,
            TokenKind::Catch,
            TokenKind::Finally,
            TokenKind::Throw,
        ]
    );
}

#[test]
fn test_word_operators_keep_text() {
    assert_eq!(
        scan_all("a and b or c xor d"),
        [
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::And, "and".to_string()),
            (TokenKind::Identifier, "b".to_string()),
            (TokenKind::Or, "or".to_string()),
            (TokenKind::Identifier, "c".to_string()),
            (TokenKind::Xor, "xor".to_string()),
            (TokenKind::Identifier, "d".to_string()),
        ]
    );
    assert_eq!(scan_kinds("7 div 2 mod 3"), [
        TokenKind::DecimalLiteral,
        TokenKind::IntegerDivide,
        TokenKind::DecimalLiteral,
        TokenKind::Modulo,
        TokenKind::DecimalLiteral,
    ]);
}

#[test]
fn test_longest_match_operators() {
    assert_eq!(
        scan_kinds("<<= >>= ??= ?? <> := ^^ ++ --"),
        [
            TokenKind::LeftShiftAssign,
            TokenKind::RightShiftAssign,
            TokenKind::NullCoalescingAssign,
            TokenKind::NullCoalesce,
            TokenKind::NotEquals,
            TokenKind::Assign,
            TokenKind::Xor,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
        ]
    );
}

#[test]
fn test_accessors() {
    assert_eq!(
        scan_kinds("[| [? [# [@ [$ ["),
        [
            TokenKind::ListAccessor,
            TokenKind::MapAccessor,
            TokenKind::GridAccessor,
            TokenKind::ArrayAccessor,
            TokenKind::StructAccessor,
            TokenKind::OpenBracket,
        ]
    );
}

// ============================================================================
// Directives
// ============================================================================

#[test]
fn test_macro_directive() {
    assert_eq!(
        scan_all("#macro SPEED 4 * 2\nx"),
        [
            (TokenKind::Macro, "#macro".to_string()),
            (TokenKind::MacroName, "SPEED".to_string()),
            (TokenKind::MacroBody, "4 * 2".to_string()),
            (TokenKind::Identifier, "x".to_string()),
        ]
    );
}

#[test]
fn test_macro_line_continuation() {
    let tokens = scan_all("#macro LONG 1 + \\\n 2\ny");
    assert_eq!(tokens[2], (TokenKind::MacroBody, "1 + \\\n 2".to_string()));
    assert_eq!(tokens[3], (TokenKind::Identifier, "y".to_string()));
}

#[test]
fn test_region_directives() {
    assert_eq!(
        scan_all("#region Movement\n#endregion"),
        [
            (TokenKind::Region, "#region Movement".to_string()),
            (TokenKind::EndRegion, "#endregion".to_string()),
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unrecognised_character() {
    let err = tokenize("x = 1;\ny = §;").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 4);
    assert_eq!(err.offending_text.as_deref(), Some("§"));
    assert_eq!(err.rule, None);
    assert!(err.message.starts_with("Syntax Error (line 2, column 4)"));
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("s = \"abc\n").unwrap_err();
    assert_eq!(err.column, 4);
    assert_eq!(err.offending_text.as_deref(), Some("\"abc"));
}

// ============================================================================
// Hidden-token classification
// ============================================================================

#[test]
fn test_top_and_bottom_comments() {
    let tokens = tokenize("// header\n/* more */\nx = 1;\n// footer\n").unwrap();
    let mut comments = Vec::new();
    let mut whitespaces = Vec::new();
    HiddenTokenProcessor::new(&mut comments, &mut whitespaces).process_all(&tokens);

    assert_eq!(comments.len(), 3);
    assert!(comments[0].is_top_comment);
    assert!(comments[1].is_top_comment);
    assert!(!comments[2].is_top_comment);
    assert!(comments[2].is_bottom_comment);
    assert!(!comments[0].is_bottom_comment);
    assert_eq!(comments[2].leading_char, ";");
}

#[test]
fn test_no_bottom_comment_when_code_follows() {
    let tokens = tokenize("// a\nx = 1;").unwrap();
    let mut comments = Vec::new();
    let mut whitespaces = Vec::new();
    HiddenTokenProcessor::new(&mut comments, &mut whitespaces).process_all(&tokens);
    assert!(!comments[0].is_bottom_comment);
}

#[test]
fn test_hidden_token_counts() {
    let source = "a = 1; // one\n\n  b = 2; /* two */\n// three\n";
    let tokens = tokenize(source).unwrap();
    let comment_tokens = tokens.iter().filter(|t| t.kind.is_comment()).count();
    let ws_tokens = tokens.iter().filter(|t| t.kind.is_whitespace()).count();

    let mut comments = Vec::new();
    let mut whitespaces = Vec::new();
    HiddenTokenProcessor::new(&mut comments, &mut whitespaces).process_all(&tokens);

    assert_eq!(comment_tokens, 3);
    assert_eq!(comments.len(), comment_tokens);
    assert_eq!(whitespaces.len(), ws_tokens);
    assert_eq!(whitespaces.iter().filter(|w| w.is_newline).count(), 4);
}
