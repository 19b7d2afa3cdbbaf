//! Maps sanitized-text offsets back to the original text.

use gml_ast::visitor::walk_node_mut;
use gml_ast::{Comment, DeclarationRange, Node, NodeKind, VisitorMut, Whitespace};
use gml_binder::Scope;
use gml_core::{LineMap, Location, TextPos};
use gml_diagnostics::{ParseError, SyntaxError};

/// Translates offsets in sanitized text to offsets in the original.
///
/// Built from the insertion offsets the sanitizer reports. An offset `i`
/// maps to `i` minus the number of insertions at or before `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMapper {
    /// Sorted, deduplicated insertion offsets.
    offsets: Vec<TextPos>,
}

impl IndexMapper {
    pub fn new(adjustments: Option<&[TextPos]>) -> Self {
        let mut offsets = adjustments.map(<[TextPos]>::to_vec).unwrap_or_default();
        offsets.sort_unstable();
        offsets.dedup();
        Self { offsets }
    }

    /// A mapper that leaves every offset alone.
    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.offsets.is_empty()
    }

    #[inline]
    pub fn map_index(&self, index: TextPos) -> TextPos {
        let shift = self.offsets.partition_point(|&offset| offset <= index) as TextPos;
        index.saturating_sub(shift)
    }

    #[inline]
    pub fn map_location(&self, location: Location) -> Location {
        location.map_index(|index| self.map_index(index))
    }

    /// Rewrite every location in the tree rooted at `root`, including the
    /// declaration ranges stored on identifiers.
    pub fn remap_tree(&self, root: &mut Node) {
        if self.is_identity() {
            return;
        }
        Remapper { mapper: self }.visit_node_mut(root);
    }

    pub fn remap_comments(&self, comments: &mut [Comment]) {
        if self.is_identity() {
            return;
        }
        for comment in comments {
            comment.start = self.map_location(comment.start);
            comment.end = self.map_location(comment.end);
        }
    }

    /// Whitespace keeps its `line`; only offsets move.
    pub fn remap_whitespaces(&self, whitespaces: &mut [Whitespace]) {
        if self.is_identity() {
            return;
        }
        for whitespace in whitespaces {
            whitespace.start = self.map_location(whitespace.start);
            whitespace.end = self.map_location(whitespace.end);
        }
    }

    /// Rewrite the binding and reference ranges recorded in `scopes`.
    pub fn remap_scopes(&self, scopes: &mut [Scope]) {
        if self.is_identity() {
            return;
        }
        for scope in scopes {
            for binding in scope.bindings.values_mut() {
                binding.declaration = self.map_range(binding.declaration);
            }
            for reference in &mut scope.references {
                reference.range = self.map_range(reference.range);
            }
        }
    }

    fn map_range(&self, range: DeclarationRange) -> DeclarationRange {
        DeclarationRange {
            start: range.start.map(|l| self.map_location(l)),
            end: range.end.map(|l| self.map_location(l)),
        }
    }

    /// Move a syntax error to its original offset, recomputing line, column
    /// and message against the original text.
    pub fn remap_syntax_error(&self, error: &mut SyntaxError, original: &LineMap) {
        if self.is_identity() {
            return;
        }
        if let Some(index) = error.index {
            error.relocate(self.map_index(index), original);
        }
    }

    /// Remap whatever position `error` carries.
    pub fn remap_error(&self, error: ParseError, original: &LineMap) -> ParseError {
        match error {
            ParseError::Syntax(mut syntax) => {
                self.remap_syntax_error(&mut syntax, original);
                ParseError::Syntax(syntax)
            }
            build @ ParseError::Build(_) => build,
        }
    }
}

/// Remap a finished parse back to original coordinates using the insertion
/// offsets reported by the sanitizer. `None` leaves everything untouched.
pub fn remap_locations(
    program: &mut Node,
    comments: &mut [Comment],
    whitespaces: &mut [Whitespace],
    adjustments: Option<&[TextPos]>,
) {
    let mapper = IndexMapper::new(adjustments);
    if mapper.is_identity() {
        return;
    }
    mapper.remap_tree(program);
    mapper.remap_comments(comments);
    mapper.remap_whitespaces(whitespaces);
    tracing::debug!(
        offsets = mapper.offsets.len(),
        comments = comments.len(),
        whitespaces = whitespaces.len(),
        "remapped"
    );
}

struct Remapper<'a> {
    mapper: &'a IndexMapper,
}

impl Remapper<'_> {
    fn location(&self, location: Option<Location>) -> Option<Location> {
        location.map(|l| self.mapper.map_location(l))
    }
}

impl VisitorMut for Remapper<'_> {
    fn visit_node_mut(&mut self, node: &mut Node) {
        node.start = self.location(node.start);
        node.end = self.location(node.end);
        if let NodeKind::Identifier {
            declaration: Some(declaration),
            ..
        } = &mut node.kind
        {
            *declaration = self.mapper.map_range(*declaration);
        }
        walk_node_mut(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let mapper = IndexMapper::new(None);
        assert!(mapper.is_identity());
        assert_eq!(mapper.map_index(42), 42);
        assert_eq!(IndexMapper::new(Some(&[])), IndexMapper::identity());
    }

    #[test]
    fn test_offsets_at_or_before_shift() {
        let mapper = IndexMapper::new(Some(&[7]));
        assert_eq!(mapper.map_index(6), 6);
        assert_eq!(mapper.map_index(7), 6);
        assert_eq!(mapper.map_index(9), 8);
    }

    #[test]
    fn test_unsorted_duplicate_offsets() {
        let mapper = IndexMapper::new(Some(&[20, 8, 8]));
        assert_eq!(mapper.map_index(10), 9);
        assert_eq!(mapper.map_index(25), 23);
    }

    #[test]
    fn test_remap_tree_updates_declarations() {
        let mut declared = Node::identifier("a", Some(Location::new(1, 9)), Some(Location::new(1, 9)));
        if let NodeKind::Identifier { declaration, .. } = &mut declared.kind {
            *declaration = Some(gml_ast::DeclarationRange {
                start: Some(Location::new(1, 12)),
                end: Some(Location::new(1, 12)),
            });
        }
        let mut root = Node::new(
            NodeKind::Program {
                body: vec![declared],
            },
            Some(Location::new(1, 0)),
            Some(Location::new(1, 15)),
        );
        IndexMapper::new(Some(&[7])).remap_tree(&mut root);

        assert_eq!(root.end.map(|l| l.index), Some(14));
        let NodeKind::Program { body } = &root.kind else {
            unreachable!()
        };
        assert_eq!(body[0].start, Some(Location::new(1, 8)));
        match &body[0].kind {
            NodeKind::Identifier { declaration, .. } => {
                assert_eq!(declaration.and_then(|d| d.start).map(|l| l.index), Some(11));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_remap_scopes_moves_bindings_and_references() {
        use gml_binder::{BindingInfo, IdentifierKind, Reference, ScopeKind};

        let range = |index| DeclarationRange {
            start: Some(Location::new(2, index)),
            end: Some(Location::new(2, index + 1)),
        };
        let mut scope = Scope::new(0, ScopeKind::Program, None);
        scope.bindings.insert(
            "hp".to_string(),
            BindingInfo {
                name: "hp".to_string(),
                kind: IdentifierKind::Variable,
                tags: Vec::new(),
                declaration: range(19),
                scope_id: 0,
            },
        );
        scope.references.push(Reference {
            name: "hp".to_string(),
            kind: IdentifierKind::Variable,
            range: range(30),
            resolved: Some(0),
        });
        scope.references.push(Reference {
            name: "a".to_string(),
            kind: IdentifierKind::Variable,
            range: range(4),
            resolved: None,
        });
        let mut scopes = vec![scope];

        IndexMapper::new(Some(&[7])).remap_scopes(&mut scopes);

        let binding = scopes[0].binding("hp").expect("binding");
        assert_eq!(binding.declaration.start, Some(Location::new(2, 18)));
        assert_eq!(binding.declaration.end, Some(Location::new(2, 19)));
        assert_eq!(scopes[0].references[0].range.start.map(|l| l.index), Some(29));
        assert_eq!(scopes[0].references[1].range.start.map(|l| l.index), Some(4));
    }

    #[test]
    fn test_remap_syntax_error_recomputes_position() {
        let original = "x = 1;\nif (a = ) {}";
        let mut error = SyntaxError::new(
            1001,
            "unexpected symbol ')'".to_string(),
            2,
            9,
            Some(16),
            "symbol ')'".to_string(),
            Some(")".to_string()),
            Some("expression".to_string()),
        );
        IndexMapper::new(Some(&[14])).remap_syntax_error(&mut error, &LineMap::new(original));
        assert_eq!(error.index, Some(15));
        assert_eq!(error.line, 2);
        assert_eq!(error.column, 8);
        assert_eq!(error.message, "Syntax Error (line 2, column 8): unexpected symbol ')'");
    }
}
