//! Sanitizer and remapper integration tests.
//!
//! Checks that every character the sanitizer kept maps back to the same
//! character in the original text.

use gml_ast::{Comment, CommentKind, Node, NodeKind, Whitespace};
use gml_core::{LineMap, Location, TextPos};
use gml_sourcemap::{remap_locations, sanitize_conditional_assignments, IndexMapper};

/// Helper: assert that every non-inserted sanitized char maps to an equal
/// original char.
fn assert_maps_back(original: &str) {
    let sanitized = sanitize_conditional_assignments(original);
    let adjustments = sanitized.index_adjustments.clone().unwrap_or_default();
    let mapper = IndexMapper::new(Some(&adjustments));
    let original_chars: Vec<char> = original.chars().collect();

    for (i, ch) in sanitized.source_text.chars().enumerate() {
        let i = i as TextPos;
        if adjustments.contains(&i) {
            continue;
        }
        let mapped = mapper.map_index(i) as usize;
        assert_eq!(original_chars[mapped], ch, "offset {} in {:?}", i, sanitized.source_text);
    }
    assert_eq!(
        sanitized.source_text.chars().count(),
        original_chars.len() + adjustments.len()
    );
}

fn located(line: u32, index: TextPos) -> Option<Location> {
    Some(Location::new(line, index))
}

// ============================================================================
// Sanitizer + mapper agreement
// ============================================================================

#[test]
fn test_single_condition_maps_back() {
    assert_maps_back("if (a = b) { x = 1; }");
}

#[test]
fn test_many_conditions_map_back() {
    assert_maps_back(
        "if (a = 1) {\n    b = 2;\n}\nelse if ((c = 3) || d = 4) {\n    // if (e = 5)\n    f = \"if (g = 6)\";\n}\n",
    );
}

#[test]
fn test_unicode_source_maps_back() {
    assert_maps_back("var é = \"ü\";\nif (é = 1) { show(\"✓\"); }");
}

#[test]
fn test_untouched_source_is_identity() {
    let source = "x = 1;\nif (x == 1) {}\n";
    let sanitized = sanitize_conditional_assignments(source);
    assert_eq!(sanitized.index_adjustments, None);
    let mapper = IndexMapper::new(sanitized.index_adjustments.as_deref());
    assert!(mapper.is_identity());
    for i in 0..64 {
        assert_eq!(mapper.map_index(i), i);
    }
}

// ============================================================================
// Full remap
// ============================================================================

#[test]
fn test_remap_locations_moves_tree_and_side_lists() {
    // if (a == b) { x = 1; } with the second '=' inserted at 7
    let mut program = Node::new(
        NodeKind::Program {
            body: vec![Node::identifier("x", located(1, 15), located(1, 15))],
        },
        located(1, 0),
        located(1, 22),
    );
    let mut comments = vec![Comment {
        kind: CommentKind::CommentLine,
        value: " c".to_string(),
        start: Location::new(1, 23),
        end: Location::new(1, 26),
        leading_ws: " ".to_string(),
        trailing_ws: String::new(),
        leading_char: "}".to_string(),
        trailing_char: String::new(),
        is_top_comment: false,
        is_bottom_comment: true,
    }];
    let mut whitespaces = vec![Whitespace {
        value: " ".to_string(),
        start: Location::new(1, 14),
        end: Location::new(1, 14),
        line: 1,
        is_newline: false,
    }];

    remap_locations(&mut program, &mut comments, &mut whitespaces, Some(&[7]));

    assert_eq!(program.end, located(1, 21));
    let NodeKind::Program { body } = &program.kind else {
        unreachable!()
    };
    assert_eq!(body[0].start, located(1, 14));
    assert_eq!(comments[0].start.index, 22);
    assert_eq!(comments[0].end.index, 25);
    assert_eq!(whitespaces[0].start.index, 13);
    assert_eq!(whitespaces[0].line, 1);
}

#[test]
fn test_remap_locations_without_adjustments_is_bit_identical() {
    let original = Node::new(
        NodeKind::Program {
            body: vec![Node::identifier("a", located(2, 9), located(2, 9))],
        },
        located(1, 0),
        located(2, 9),
    );
    let mut program = original.clone();
    remap_locations(&mut program, &mut [], &mut [], None);
    assert_eq!(program, original);
}

#[test]
fn test_remap_error_uses_original_lines() {
    let original = "if (a = b) {\n  x = ;\n}";
    let sanitized = sanitize_conditional_assignments(original);
    let mapper = IndexMapper::new(sanitized.index_adjustments.as_deref());
    // ';' sits at sanitized offset 20, original offset 19 (line 2, column 6)
    let mut error = gml_diagnostics::SyntaxError::new(
        1001,
        "unexpected symbol ';' in expression".to_string(),
        2,
        6,
        Some(20),
        "symbol ';'".to_string(),
        Some(";".to_string()),
        Some("expression".to_string()),
    );
    mapper.remap_syntax_error(&mut error, &LineMap::new(original));
    assert_eq!(error.index, Some(19));
    assert_eq!((error.line, error.column), (2, 6));
}
