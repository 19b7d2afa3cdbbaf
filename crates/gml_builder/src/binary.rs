//! Binary expression resolution.

use crate::builder::AstBuilder;
use gml_diagnostics::ParseResult;
use gml_ast::{Node, NodeKind};
use gml_parser::{binary_operator_info, Associativity, ParseNode, ParseNodeKind};

/// The precedence of `node` as an operand: its operator's precedence when it
/// is a binary expression, otherwise 0.
pub fn operand_precedence(node: &Node) -> u8 {
    node.binary_operator()
        .and_then(binary_operator_info)
        .map_or(0, |info| info.precedence)
}

/// Whether a binary expression built from `operator`, `left` and `right` must
/// be grouped to keep its meaning.
///
/// Left-associative operators need grouping when an operand binds strictly
/// looser, right-associative ones when an operand binds looser or equally.
/// Operands that are not binary expressions never force grouping.
pub fn needs_parentheses(operator: &str, left: &Node, right: &Node) -> bool {
    let Some(info) = binary_operator_info(operator) else {
        return false;
    };
    let forces = |operand: &Node| {
        let precedence = operand_precedence(operand);
        if precedence == 0 {
            return false;
        }
        match info.associativity {
            Associativity::Left => precedence < info.precedence,
            Associativity::Right => precedence <= info.precedence,
        }
    };
    forces(left) || forces(right)
}

impl AstBuilder<'_> {
    /// Build a binary expression subtree. Nested binary operands are resolved
    /// here as `embedded`; an embedded node that needs grouping is wrapped in
    /// a synthetic parenthesized expression.
    ///
    /// Left operands that are themselves binary expressions form the spine of
    /// a left-associative chain. The spine is walked with a loop, so a long
    /// `a + b + c + ...` does not grow the call stack.
    pub(crate) fn handle_binary(&mut self, node: &ParseNode, embedded: bool) -> ParseResult<Node> {
        self.enter(node)?;
        let result = self.handle_binary_inner(node, embedded);
        self.leave();
        result
    }

    fn handle_binary_inner(&mut self, node: &ParseNode, embedded: bool) -> ParseResult<Node> {
        let mut spine = Vec::new();
        let mut current = node;
        let mut built = loop {
            match self.binary_parts(current)? {
                BinaryParts::Pair(left, right, operator) => {
                    spine.push((current, right, operator));
                    if left.kind != ParseNodeKind::BinaryExpression {
                        break self.visit(left)?;
                    }
                    current = left;
                }
                BinaryParts::Single(only) => break self.visit(only)?,
            }
        };
        let depth = spine.len();
        for (level, (parse_node, right, operator)) in spine.into_iter().rev().enumerate() {
            let is_root = level + 1 == depth;
            let right = self.resolve_operand(right)?;
            let operator = self.token(operator).text.clone();
            let grouped = (embedded || !is_root) && needs_parentheses(&operator, &built, &right);
            let node = self.make(
                NodeKind::BinaryExpression {
                    operator,
                    left: Box::new(built),
                    right: Box::new(right),
                },
                parse_node,
            );
            built = if grouped { node.into_parenthesized(true) } else { node };
        }
        Ok(built)
    }

    /// Split a binary parse node into its operands and operator token.
    fn binary_parts<'n>(&self, node: &'n ParseNode) -> ParseResult<BinaryParts<'n>> {
        let operands: Vec<&ParseNode> = node.child_nodes().collect();
        let operator = node.child_tokens().next();
        match (operands.as_slice(), operator) {
            ([left, right], Some(operator)) => Ok(BinaryParts::Pair(*left, *right, operator)),
            ([only], _) => {
                tracing::warn!(
                    index = self.token(node.start).start_index,
                    "binary expression with a single operand"
                );
                Ok(BinaryParts::Single(*only))
            }
            ([], _) | ([_, _], None) => Err(self.missing(node, "operand")),
            ([_, _, extra, ..], _) => {
                tracing::warn!(
                    children = operands.len(),
                    index = self.token(node.start).start_index,
                    "binary expression with extra operands"
                );
                Err(self.unexpected(node, extra))
            }
        }
    }

    fn resolve_operand(&mut self, operand: &ParseNode) -> ParseResult<Node> {
        if operand.kind == ParseNodeKind::BinaryExpression {
            self.handle_binary(operand, true)
        } else {
            self.visit(operand)
        }
    }
}

enum BinaryParts<'n> {
    Pair(&'n ParseNode, &'n ParseNode, usize),
    Single(&'n ParseNode),
}
